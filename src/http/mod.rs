//! HTTP transport for the Data API command protocol
//!
//! # Overview
//!
//! The Data API exposes a single POST endpoint per collection. Every
//! operation is a JSON command envelope (`{"find": {...}}`,
//! `{"insertOne": {...}}`, ...) and every response is a
//! `{data, status, errors}` envelope. This module owns the transport
//! concerns below that protocol: retries with backoff, rate-limit
//! handling, timeouts, and HTTP error classification.

mod client;
mod protocol;

pub use client::{BackoffType, DataApiClient, DataApiClientConfig, DataApiClientConfigBuilder};
pub use protocol::{ApiError, ApiResponse, ResponseData};
