//! Blocking client for the nationalize.io name-nationality prediction API.
//!
//! # Overview
//! `NationalizeClient::predict` and `batch_predict` build a GET request,
//! execute it through a `Transport` and decode either the prediction payload
//! or the service's `{"error": ...}` payload. Rate-limit headers are returned
//! with every response, successful or not.
//!
//! # Design
//! - `NationalizeClient` is immutable after construction and safe to share.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so hosts may run the HTTP round-trip themselves.
//! - No retries, caching or backoff: every error goes straight to the caller.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{ClientBuilder, NationalizeClient};
pub use config::ClientConfig;
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{ApiResponse, Country, Prediction, RateLimit};
