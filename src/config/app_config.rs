use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use super::{
    AlertConfig, ArchiveConfig, ClassificationConfig, HttpRetryConfig, LoggingConfig,
    NotificationConfig, SeedConfig, StoreKeys,
};

fn default_object_store_root() -> PathBuf {
    PathBuf::from("data/objects")
}

/// Application configuration for camwatch.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Database URL of the SQLite quota store.
    pub database_url: String,

    /// Root directory of the local object store; each bucket is a
    /// sub-directory.
    #[serde(default = "default_object_store_root")]
    pub object_store_root: PathBuf,

    /// Keys and formats of the quota store entries.
    #[serde(default)]
    pub store_keys: StoreKeys,

    /// Threshold notification settings.
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Classification handler settings.
    pub classification: ClassificationConfig,

    /// Alert handler settings.
    pub alert: AlertConfig,

    /// Archiver settings.
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Retry policy of the HTTP collaborators.
    #[serde(default)]
    pub http_retry: HttpRetryConfig,

    /// Log subscriber settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Operator parameters written by `camwatch seed`.
    #[serde(default)]
    pub seed: SeedConfig,
}

impl AppConfig {
    /// Creates a new `AppConfig` by reading `app.yaml` from the configuration
    /// directory, overridden by `CAMWATCH__*` environment variables.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir_str = config_dir.unwrap_or("configs");
        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/app.yaml", config_dir_str)))
            .add_source(Environment::with_prefix("CAMWATCH").separator("__"))
            .build()?;
        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects seed parameters that would break the gate invariants.
    fn validate(&self) -> Result<(), ConfigError> {
        let seed = &self.seed;
        if seed.alert_period_secs <= 0 {
            return Err(ConfigError::Message(format!(
                "seed.alert_period_secs must be positive, got {}",
                seed.alert_period_secs
            )));
        }
        if !(0 < seed.calls_month_max_50 && seed.calls_month_max_50 < seed.calls_month_max_100) {
            return Err(ConfigError::Message(format!(
                "seed thresholds must satisfy 0 < max_50 < max_100, got {} and {}",
                seed.calls_month_max_50, seed.calls_month_max_100
            )));
        }
        Ok(())
    }
}
