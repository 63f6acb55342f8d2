//! This module provides the retryable HTTP client shared by HTTP-based
//! notifiers.

mod client;

pub use client::{HttpClientError, create_retryable_http_client};
