//! Network connectivity capability
//!
//! The dispatcher asks this before every call. Detecting reachability is left
//! to the embedding application; these are the two stock answers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Synchronous "is the network there" query
pub trait Connectivity: Send + Sync {
    /// Whether a network connection is currently available
    fn is_connected(&self) -> bool;
}

/// Always reports a connection
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeConnected;

impl Connectivity for AssumeConnected {
    fn is_connected(&self) -> bool {
        true
    }
}

/// Shared, switchable connectivity state
///
/// Clones share the same flag, so one handle can be kept by whatever watches
/// the network while another is handed to the client.
#[derive(Debug, Clone)]
pub struct ConnectivityFlag {
    connected: Arc<AtomicBool>,
}

impl ConnectivityFlag {
    /// Create a flag with an initial state
    pub fn new(connected: bool) -> Self {
        Self {
            connected: Arc::new(AtomicBool::new(connected)),
        }
    }

    /// Update the state
    pub fn set(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

impl Default for ConnectivityFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for ConnectivityFlag {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
