//! Request descriptor module
//!
//! Declarative description of a single API call and its resolution into a
//! wire-level request.
//!
//! # Overview
//!
//! - `RequestDescriptor<T>` - path, method, query, body and headers of one call,
//!   tagged with the type `T` the response decodes into
//! - `TransportRequest` - the fully resolved request the dispatcher sends
//! - `build_transport_request` - pure descriptor → transport conversion

mod descriptor;

pub use descriptor::{
    build_transport_request, encode_query_value, RequestDescriptor, TransportRequest,
    JSON_CONTENT_TYPE,
};
