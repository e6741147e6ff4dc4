//! Configuration module for camwatch.

mod app_config;
mod handlers;
mod helpers;
mod http_retry;
mod store_keys;

pub use app_config::AppConfig;
pub use handlers::{
    AlertConfig, ArchiveConfig, ArchiveTarget, ClassificationConfig, EmailConfig, LogFormat,
    LoggingConfig, NotificationConfig, SeedConfig,
};
pub use helpers::{
    deserialize_duration_from_ms, deserialize_duration_from_seconds, deserialize_trimmed_list,
    serialize_duration_to_ms, serialize_duration_to_seconds,
};
pub use http_retry::{HttpRetryConfig, JitterSetting};
pub use store_keys::StoreKeys;
