//! Incremental page loader
//!
//! Fetches one page per trigger and appends it to the accumulated items. At
//! most one fetch is ever outstanding: a trigger that arrives while another is
//! in flight is dropped, not queued.

use super::types::{LoadOutcome, Paged, PaginationState};
use crate::error::Result;
use crate::http::HttpClient;
use crate::request::RequestDescriptor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

type RequestFactory<P> = dyn Fn(u32) -> RequestDescriptor<P> + Send + Sync;

/// Accumulated items and the page cursor
#[derive(Debug)]
struct Accumulated<I> {
    items: Vec<I>,
    next_page: u32,
}

impl<I> Accumulated<I> {
    /// Append a non-empty page and advance the cursor by one
    fn merge(&mut self, items: Vec<I>) -> usize {
        let count = items.len();
        if count > 0 {
            self.items.extend(items);
            self.next_page += 1;
        }
        count
    }
}

/// Clears the in-flight flag when the fetch ends, however it ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Sequential page loader over a paged resource
///
/// Clones share state, so a clone handed to another task sees the same items
/// and the same in-flight flag.
pub struct PageLoader<P: Paged> {
    client: Arc<HttpClient>,
    request_for_page: Arc<RequestFactory<P>>,
    state: Arc<RwLock<Accumulated<P::Item>>>,
    in_flight: Arc<AtomicBool>,
}

impl<P> PageLoader<P>
where
    P: Paged + Send + 'static,
    P::Item: Send + Sync,
{
    /// Create a loader that builds the request for page `n` with `request_for_page(n)`
    pub fn new<F>(client: Arc<HttpClient>, request_for_page: F) -> Self
    where
        F: Fn(u32) -> RequestDescriptor<P> + Send + Sync + 'static,
    {
        Self {
            client,
            request_for_page: Arc::new(request_for_page),
            state: Arc::new(RwLock::new(Accumulated {
                items: Vec::new(),
                next_page: 1,
            })),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the cursor at `page` instead of 1
    #[must_use]
    pub fn starting_at(self, page: u32) -> Self {
        Self {
            state: Arc::new(RwLock::new(Accumulated {
                items: Vec::new(),
                next_page: page.max(1),
            })),
            ..self
        }
    }

    /// Fetch `page` and merge it
    ///
    /// Returns `None` when another fetch is still in flight; the trigger is
    /// dropped and state is unchanged. Otherwise the page is fetched once and
    /// the outcome returned after state has been updated.
    pub async fn trigger(&self, page: u32) -> Option<LoadOutcome> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!(page, "Fetch already in flight, dropping trigger");
            return None;
        }
        let _guard = InFlight(&self.in_flight);

        let outcome = match self.fetch_page(page).await {
            Ok(Some(items)) if !items.is_empty() => {
                let mut state = self.state.write().await;
                let count = state.merge(items);
                info!(page, count, total = state.items.len(), "Loaded page");
                LoadOutcome::Loaded { page, count }
            }
            Ok(_) => {
                info!(page, "Page carried no items");
                LoadOutcome::NoData { page }
            }
            Err(error) => {
                warn!(page, "Failed to load page: {error}");
                LoadOutcome::Failed { page, error }
            }
        };

        Some(outcome)
    }

    /// Fetch the page the cursor points at
    pub async fn load_next(&self) -> Option<LoadOutcome> {
        let page = self.next_page().await;
        self.trigger(page).await
    }

    /// Clear items and rewind the cursor to page 1
    ///
    /// Refused (returns `false`) while a fetch is in flight.
    pub async fn reset(&self) -> bool {
        if self.is_loading() {
            return false;
        }
        let mut state = self.state.write().await;
        state.items.clear();
        state.next_page = 1;
        true
    }

    /// Whether a fetch is outstanding
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Next page number the cursor points at
    pub async fn next_page(&self) -> u32 {
        self.state.read().await.next_page
    }

    /// Number of items merged so far
    pub async fn len(&self) -> usize {
        self.state.read().await.items.len()
    }

    /// Whether no items have been merged yet
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.items.is_empty()
    }

    async fn fetch_page(&self, page: u32) -> Result<Option<Vec<P::Item>>> {
        let descriptor = (self.request_for_page)(page);
        let request = self.client.build_request(&descriptor)?;
        let envelope: P = self.client.fetch(request).await?;
        Ok(envelope.into_items())
    }
}

impl<P> PageLoader<P>
where
    P: Paged + Send + 'static,
    P::Item: Clone + Send + Sync,
{
    /// Copy of the items merged so far
    pub async fn items(&self) -> Vec<P::Item> {
        self.state.read().await.items.clone()
    }

    /// Copy of the whole state
    pub async fn snapshot(&self) -> PaginationState<P::Item> {
        let state = self.state.read().await;
        PaginationState {
            items: state.items.clone(),
            next_page: state.next_page,
            in_flight: self.is_loading(),
        }
    }
}

impl<P: Paged> Clone for PageLoader<P> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            request_for_page: Arc::clone(&self.request_for_page),
            state: Arc::clone(&self.state),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<P: Paged> std::fmt::Debug for PageLoader<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageLoader")
            .field("client", &self.client)
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
