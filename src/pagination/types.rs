//! Pagination types and traits
//!
//! Defines the page envelope abstraction, the loader state and the outcome
//! reported for each accepted trigger.

use crate::error::{Error, FetchError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A decoded response that carries one page of items
pub trait Paged: DeserializeOwned {
    /// The individual item type within a page
    type Item;

    /// Items of this page; `None` when the response had no item list at all
    fn into_items(self) -> Option<Vec<Self::Item>>;
}

/// Standard list envelope: `{"items": [...], "has_more": ..., "quota_*": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<I> {
    /// Items of this page
    pub items: Option<Vec<I>>,
    /// Whether the service has more pages
    pub has_more: Option<bool>,
    /// Request quota of the caller
    pub quota_max: Option<u32>,
    /// Remaining request quota of the caller
    pub quota_remaining: Option<u32>,
}

impl<I> Page<I> {
    /// Create an envelope around a list of items
    pub fn new(items: Vec<I>) -> Self {
        Self {
            items: Some(items),
            has_more: None,
            quota_max: None,
            quota_remaining: None,
        }
    }

    /// Create an envelope with no item list
    pub fn missing() -> Self {
        Self {
            items: None,
            has_more: None,
            quota_max: None,
            quota_remaining: None,
        }
    }
}

impl<I: DeserializeOwned> Paged for Page<I> {
    type Item = I;

    fn into_items(self) -> Option<Vec<I>> {
        self.items
    }
}

impl<I: DeserializeOwned> Paged for Vec<I> {
    type Item = I;

    fn into_items(self) -> Option<Vec<I>> {
        Some(self)
    }
}

/// Snapshot of the loader state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState<I> {
    /// Items merged so far, in arrival order
    pub items: Vec<I>,
    /// Next page number to request (starts at 1)
    pub next_page: u32,
    /// Whether a fetch is outstanding
    pub in_flight: bool,
}

impl<I> PaginationState<I> {
    /// Create an empty state starting at page 1
    pub fn new() -> Self {
        Self::with_page(1)
    }

    /// Create state with a starting page
    pub fn with_page(page: u32) -> Self {
        Self {
            items: Vec::new(),
            next_page: page.max(1),
            in_flight: false,
        }
    }
}

impl<I> Default for PaginationState<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one accepted trigger
#[derive(Debug)]
pub enum LoadOutcome {
    /// A non-empty page was merged
    Loaded {
        /// Page number that was fetched
        page: u32,
        /// Number of items merged
        count: usize,
    },
    /// The page decoded but carried no items
    NoData {
        /// Page number that was fetched
        page: u32,
    },
    /// The page could not be built or fetched
    Failed {
        /// Page number that was requested
        page: u32,
        /// Cause
        error: Error,
    },
}

impl LoadOutcome {
    /// Whether items were merged
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    /// Human-readable description of the outcome
    pub fn message(&self) -> String {
        match self {
            Self::Loaded { .. } => "Data found".to_string(),
            Self::NoData { .. } => "Data not found".to_string(),
            Self::Failed { error, .. } => error.to_string(),
        }
    }

    /// Page number this outcome belongs to
    pub fn page(&self) -> u32 {
        match self {
            Self::Loaded { page, .. } | Self::NoData { page } | Self::Failed { page, .. } => *page,
        }
    }

    /// Classified fetch error, when the failure came from the dispatcher
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed {
                error: Error::Fetch(err),
                ..
            } => Some(err),
            _ => None,
        }
    }
}
