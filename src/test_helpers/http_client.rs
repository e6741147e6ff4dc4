use std::{sync::Arc, time::Duration};

use reqwest::Client;
use reqwest_middleware::ClientWithMiddleware;

use crate::{
    config::{HttpRetryConfig, JitterSetting},
    http_client::create_retryable_http_client,
};

/// Creates an HTTP client with fast retries for testing purposes.
pub fn create_test_http_client() -> Arc<ClientWithMiddleware> {
    let config = HttpRetryConfig {
        max_retries: 1,
        initial_backoff_ms: Duration::from_millis(1),
        max_backoff_secs: Duration::from_millis(5),
        jitter: JitterSetting::None,
        ..Default::default()
    };
    Arc::new(create_retryable_http_client(&config, Client::new()))
}
