//! Pagination module
//!
//! Incremental, page-numbered loading of a listing resource.
//!
//! # Overview
//!
//! A [`PageLoader`] owns the accumulated items, the next page number and an
//! in-flight flag. Each trigger builds the request for one page, dispatches it
//! through the shared [`crate::http::HttpClient`] and merges the items in
//! arrival order. Triggers that arrive while a fetch is outstanding are dropped,
//! so pages are merged strictly one after another.

mod loader;
mod types;

pub use loader::PageLoader;
pub use types::{LoadOutcome, Page, Paged, PaginationState};

#[cfg(test)]
mod tests;
