use serde::Deserialize;

fn default_alert_period() -> String {
    "alerts_cams_img_period".to_string()
}

fn default_alert_last() -> String {
    "alerts_cams_img_last".to_string()
}

fn default_calls_month_prefix() -> String {
    "rekognition_api_calls".to_string()
}

fn default_calls_month_max_50() -> String {
    "rekognition_api_calls_month_max_50".to_string()
}

fn default_calls_month_max_100() -> String {
    "rekognition_api_calls_month_max_100".to_string()
}

fn default_disable_until_alert_period() -> String {
    "class_cam_img_disable_until_alert_period".to_string()
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

fn default_month_suffix_format() -> String {
    "_%Y_%m".to_string()
}

/// Names of the entries the gates read and write in the quota store, and the
/// text formats of time-derived values.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StoreKeys {
    /// Cooldown period in seconds.
    #[serde(default = "default_alert_period")]
    pub alert_period: String,

    /// Timestamp of the last alert sent.
    #[serde(default = "default_alert_last")]
    pub alert_last: String,

    /// Prefix of the monthly call counters; the month suffix is appended.
    #[serde(default = "default_calls_month_prefix")]
    pub calls_month_prefix: String,

    /// The 50% threshold of the monthly budget.
    #[serde(default = "default_calls_month_max_50")]
    pub calls_month_max_50: String,

    /// The 100% threshold of the monthly budget.
    #[serde(default = "default_calls_month_max_100")]
    pub calls_month_max_100: String,

    /// Flag that suspends metered calls while the alert cooldown runs.
    #[serde(default = "default_disable_until_alert_period")]
    pub disable_until_alert_period: String,

    /// `chrono` format of stored timestamps.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// `chrono` format of the month suffix of counter keys.
    #[serde(default = "default_month_suffix_format")]
    pub month_suffix_format: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            alert_period: default_alert_period(),
            alert_last: default_alert_last(),
            calls_month_prefix: default_calls_month_prefix(),
            calls_month_max_50: default_calls_month_max_50(),
            calls_month_max_100: default_calls_month_max_100(),
            disable_until_alert_period: default_disable_until_alert_period(),
            timestamp_format: default_timestamp_format(),
            month_suffix_format: default_month_suffix_format(),
        }
    }
}
