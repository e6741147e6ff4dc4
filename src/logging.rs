//! Log subscriber installation and per-invocation spans.

use tracing::{Span, subscriber::SetGlobalDefaultError};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uuid::Uuid;

use crate::config::{LogFormat, LoggingConfig};

/// Length of the request ids attached to invocation spans.
const REQUEST_ID_LEN: usize = 8;

/// Installs the global subscriber. `RUST_LOG` wins over `config.level`.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), SetGlobalDefaultError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => tracing::subscriber::set_global_default(
            FmtSubscriber::builder().with_env_filter(filter).finish(),
        ),
        LogFormat::Json => tracing::subscriber::set_global_default(
            FmtSubscriber::builder().json().with_env_filter(filter).finish(),
        ),
    }
}

/// A short random id identifying one handler invocation in the logs.
pub fn new_request_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(REQUEST_ID_LEN);
    id
}

/// The span every handler invocation runs in.
pub fn invocation_span(handler: &str) -> Span {
    tracing::info_span!("invocation", request_id = %new_request_id(), handler)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_short_and_distinct() {
        let first = new_request_id();
        let second = new_request_id();

        assert_eq!(first.len(), REQUEST_ID_LEN);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }
}
