#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # pagefeed
//!
//! Typed HTTP request layer with classified errors and incremental page
//! loading for a single REST listing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pagefeed::config::ServiceConfig;
//! use pagefeed::http::HttpClient;
//! use pagefeed::listing::{question_loader, ListingQuery};
//! use std::sync::Arc;
//!
//! # async fn run() -> pagefeed::Result<()> {
//! let client = Arc::new(HttpClient::new(ServiceConfig::default())?);
//! let loader = question_loader(client, ListingQuery::default());
//!
//! if let Some(outcome) = loader.load_next().await {
//!     println!("{}", outcome.message());
//! }
//! for question in loader.items().await {
//!     println!("{:?}", question.title);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! caller ──trigger(page)──▶ PageLoader ──RequestDescriptor──▶ build_transport_request
//!                              ▲                                        │
//!                              │ merge items                            ▼
//!                              └──────── Result<T, FetchError> ◀── HttpClient::fetch
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: document error variants and listing fields

// ============================================================================
// Module declarations
// ============================================================================

/// Error types and fetch classification
pub mod error;

/// Common types and type aliases
pub mod types;

/// Service configuration
pub mod config;

/// Request descriptors and transport requests
pub mod request;

/// HTTP dispatcher with error classification
pub mod http;

/// Incremental page loading
pub mod pagination;

/// Question listing resource
pub mod listing;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, FetchError, Result};
pub use types::*;

pub use http::HttpClient;
pub use pagination::{LoadOutcome, PageLoader};
pub use request::{build_transport_request, RequestDescriptor, TransportRequest};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
