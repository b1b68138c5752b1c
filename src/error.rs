//! Error types for pagefeed
//!
//! Two layers live here:
//! - [`Error`] covers construction, configuration and I/O problems. All public
//!   APIs outside the dispatcher return `Result<T, Error>`.
//! - [`FetchError`] is the closed classification of a single dispatched call.
//!   Every failure of [`crate::http::HttpClient::fetch`] resolves to exactly one
//!   of its variants.

use thiserror::Error;

/// The main error type for pagefeed
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Request Construction Errors
    // ============================================================================
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error(transparent)]
    Fetch(#[from] FetchError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for pagefeed
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

// ============================================================================
// Fetch classification
// ============================================================================

/// Transport-level failure category
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    #[error("A server with the specified hostname could not be found.")]
    HostNotFound,

    #[error("The request timed out, please try again.")]
    TimedOut,

    #[error("Transport failure: {0}")]
    Other(String),
}

/// Classified outcome of a failed fetch
///
/// The set is closed: the dispatcher never produces anything else.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("No internet connection available")]
    NoConnectivity,

    #[error("Bad request (400)")]
    BadRequest,

    #[error("Unauthorized (401)")]
    Unauthorized,

    #[error("Forbidden (403)")]
    Forbidden,

    #[error("Not found (404)")]
    NotFound,

    #[error("Client error ({0})")]
    ClientError(u16),

    #[error("Internal server error (500)")]
    ServerError,

    #[error("Server error ({0})")]
    ServerErrorCode(u16),

    #[error("Failed to decode response: {0}")]
    Decoding(String),

    #[error(transparent)]
    Transport(TransportFailure),

    #[error("Unknown error (status {0})")]
    Unknown(u16),
}

impl FetchError {
    /// Classify a non-2xx HTTP status code
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            402 | 405..=499 => Self::ClientError(status),
            500 => Self::ServerError,
            501..=599 => Self::ServerErrorCode(status),
            _ => Self::Unknown(status),
        }
    }

    /// HTTP status code behind this error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest => Some(400),
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            Self::NotFound => Some(404),
            Self::ServerError => Some(500),
            Self::ClientError(code) | Self::ServerErrorCode(code) | Self::Unknown(code) => {
                Some(*code)
            }
            Self::NoConnectivity | Self::Decoding(_) | Self::Transport(_) => None,
        }
    }

    /// Check if this error was produced by an HTTP status classification
    pub fn is_http_status(&self) -> bool {
        self.status().is_some()
    }
}

impl From<TransportFailure> for FetchError {
    fn from(failure: TransportFailure) -> Self {
        Self::Transport(failure)
    }
}
