//! Question listing
//!
//! The concrete resource pagefeed pages through: a StackExchange-style list of
//! questions, each with at least a title and a content license.

use crate::config::ServiceConfig;
use crate::http::HttpClient;
use crate::pagination::{Page, PageLoader};
use crate::request::RequestDescriptor;
use crate::types::{JsonValue, ValueMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One question of the listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content_license: Option<String>,
    #[serde(default)]
    pub question_id: Option<u64>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_answered: Option<bool>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub owner: Option<Owner>,
}

/// Author of a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Decoded page of questions
pub type QuestionPage = Page<Question>;

/// Per-page request parameters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListingQuery {
    /// Page number (1-based)
    pub page: u32,
    /// Items per page; the service default when unset
    pub page_size: Option<u32>,
    /// Overrides for the configured default query
    pub extra: ValueMap,
}

impl ListingQuery {
    /// Query for one page
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Add or override a query parameter
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Query parameters for this page, on top of the configured defaults
    pub fn to_params(&self, config: &ServiceConfig) -> ValueMap {
        let mut params = config.query.clone();
        params.extend(self.extra.clone());
        if let Some(size) = self.page_size {
            params.insert("pagesize".to_string(), JsonValue::from(size));
        }
        params.insert(config.page_param.clone(), JsonValue::from(self.page));
        params
    }
}

/// Descriptor for one page of the configured listing
pub fn listing_request(config: &ServiceConfig, query: &ListingQuery) -> RequestDescriptor<QuestionPage> {
    RequestDescriptor::new(config.resource_path.clone()).queries(query.to_params(config))
}

/// Page loader over the configured listing
pub fn question_loader(client: Arc<HttpClient>, template: ListingQuery) -> PageLoader<QuestionPage> {
    let config = client.config().clone();
    PageLoader::new(client, move |page| {
        let query = ListingQuery {
            page,
            ..template.clone()
        };
        listing_request(&config, &query)
    })
}
