//! HTTP dispatch module
//!
//! Executes resolved requests against the configured service and classifies
//! every failure into a [`crate::error::FetchError`].
//!
//! # Features
//!
//! - **Connectivity Gate**: Calls fail fast with `NoConnectivity` when offline
//! - **Single Attempt**: Each request is sent once; retrying is up to the caller
//! - **Status Classification**: Named variants for 400/401/403/404/500, buckets otherwise
//! - **Typed Decoding**: Responses decode into any `DeserializeOwned` type

mod client;
mod connectivity;

pub use client::{HttpClient, RawResponse};
pub use connectivity::{AssumeConnected, Connectivity, ConnectivityFlag};
