//! This module provides the retryable HTTP client shared by the external
//! collaborators (label detector, email relay, notification webhook).

mod client;

pub use client::{HttpClientError, create_retryable_http_client, create_http_client};
