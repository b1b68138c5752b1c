//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ServiceConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::listing::{question_loader, ListingQuery, Question};
use crate::pagination::LoadOutcome;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch {
                pages,
                start_page,
                page_size,
                site,
            } => {
                self.fetch(*pages, *start_page, *page_size, site.as_deref())
                    .await
            }
            Commands::Config => self.show_config(),
        }
    }

    /// Load service configuration
    fn load_config(&self) -> Result<ServiceConfig> {
        match &self.cli.config {
            Some(path) => ServiceConfig::from_file(path),
            None => Ok(ServiceConfig::default()),
        }
    }

    /// Print effective configuration
    fn show_config(&self) -> Result<()> {
        let config = self.load_config()?;
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(&config)?);
            }
            OutputFormat::Pretty => {
                print!("{}", config.to_yaml()?);
            }
        }
        Ok(())
    }

    /// Load pages one after another, printing each page as it lands
    async fn fetch(
        &self,
        pages: u32,
        start_page: u32,
        page_size: Option<u32>,
        site: Option<&str>,
    ) -> Result<()> {
        let start = Instant::now();
        let config = self.load_config()?;
        let client = Arc::new(HttpClient::new(config)?);

        let mut template = ListingQuery::default();
        if let Some(size) = page_size {
            template = template.with_page_size(size);
        }
        if let Some(site) = site {
            template = template.with("site", site);
        }

        let loader = question_loader(client, template).starting_at(start_page);
        let mut printed = 0;

        for _ in 0..pages {
            let Some(outcome) = loader.load_next().await else {
                break;
            };

            match outcome {
                LoadOutcome::Loaded { page, count } => {
                    let items = loader.items().await;
                    for question in &items[printed..] {
                        self.output_question(page, question);
                    }
                    printed = items.len();
                    self.output_log("INFO", &format!("Page {page}: {count} items"));
                }
                LoadOutcome::NoData { page } => {
                    self.output_log("INFO", &format!("Page {page}: no more data"));
                    break;
                }
                LoadOutcome::Failed { page, error } => {
                    self.output_log("ERROR", &format!("Page {page}: {error}"));
                    return Err(error);
                }
            }
        }

        self.output_log(
            "INFO",
            &format!(
                "Loaded {printed} items in {:.2}s",
                start.elapsed().as_secs_f64()
            ),
        );
        Ok(())
    }

    /// Output a single question
    fn output_question(&self, page: u32, question: &Question) {
        match self.cli.format {
            OutputFormat::Json => self.output_message(&json!({
                "type": "RECORD",
                "page": page,
                "record": question,
            })),
            OutputFormat::Pretty => println!("{}", render_row(question)),
        }
    }

    /// Output a log line
    fn output_log(&self, level: &str, message: &str) {
        match self.cli.format {
            OutputFormat::Json => self.output_message(&json!({
                "type": "LOG",
                "log": {
                    "level": level,
                    "message": message,
                }
            })),
            OutputFormat::Pretty => eprintln!("[{level}] {message}"),
        }
    }

    /// Output a JSON message
    fn output_message(&self, msg: &Value) {
        println!("{}", serde_json::to_string(msg).unwrap_or_default());
    }
}

/// Two-line human-readable row for a question
fn render_row(question: &Question) -> String {
    format!(
        "TITLE: {}\nLICENCE: {}",
        question.title.as_deref().unwrap_or_default(),
        question.content_license.as_deref().unwrap_or_default()
    )
}
