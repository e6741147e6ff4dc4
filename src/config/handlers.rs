use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::{deserialize_duration_from_seconds, deserialize_trimmed_list};

fn default_max_labels() -> u32 {
    10
}

fn default_min_confidence() -> f32 {
    75.0
}

fn default_output_folder() -> String {
    "classification/".to_string()
}

fn default_topic() -> String {
    "camwatch-budget".to_string()
}

fn default_alert_labels() -> Vec<String> {
    vec!["Person".to_string()]
}

fn default_subject() -> String {
    "Alert: camera detected a person".to_string()
}

fn default_charset() -> String {
    "utf-8".to_string()
}

fn default_body_text_template() -> String {
    concat!(
        "ALERT - Possible Intruder!!!\r\n",
        "\r\n",
        "This ALERT has been triggered because some labels have been detected:\r\n",
        "  - Labels Alert: {{ labels_alert_found }}\r\n",
        "  - Time (UTC): {{ event_time }}\r\n",
        "Please, see the attached file with the capture of the possible intrusion.\r\n",
        "\r\n",
        "This email has been generated automatically by camwatch",
    )
    .to_string()
}

fn default_body_html_template() -> String {
    concat!(
        "<html>\n<head></head>\n<body>\n",
        "<h1><span style=\"color: #ff0000;\">ALERT - Possible Intruder!!!</span></h1>\n",
        "<p>This ALERT has been triggered because some labels have been detected:</p>\n",
        "<ul>\n",
        "<li>Labels Alert: <strong>{{ labels_alert_found }}</strong></li>\n",
        "<li>Time (UTC): <strong>{{ event_time }}</strong></li>\n",
        "</ul>\n",
        "<p>Please, see the <strong>attached file</strong> with the capture of the possible intrusion.</p>\n",
        "<p><em>This email has been generated automatically by camwatch</em></p>\n",
        "</body>\n</html>\n",
    )
    .to_string()
}

fn default_months_ago() -> Vec<u32> {
    vec![1]
}

fn default_delete_files() -> bool {
    true
}

fn default_alert_period_secs() -> i64 {
    300
}

fn default_calls_month_max_50() -> i64 {
    2500
}

fn default_calls_month_max_100() -> i64 {
    5000
}

fn default_detector_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Settings of the classification handler.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationConfig {
    /// Bucket receiving the classification output documents.
    pub output_bucket: String,

    /// Key prefix of the classification output documents.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Maximum number of labels requested from the detector.
    #[serde(default = "default_max_labels")]
    pub max_labels: u32,

    /// Minimum confidence (percent) of returned labels.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    /// Endpoint of the label detection service.
    pub detector_url: Url,

    /// Timeout of a detection request, configured in seconds.
    #[serde(
        default = "default_detector_timeout",
        deserialize_with = "deserialize_duration_from_seconds"
    )]
    pub detector_timeout: Duration,
}

/// Where threshold notifications are published.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Topic name passed along with every publication.
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Webhook receiving publications. When absent, publications are written
    /// to stdout.
    #[serde(default)]
    pub webhook_url: Option<Url>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { topic: default_topic(), webhook_url: None }
    }
}

/// Settings of the alert email.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// The `From` address.
    pub sender: String,

    /// The `To` addresses.
    #[serde(deserialize_with = "deserialize_trimmed_list")]
    pub recipients: Vec<String>,

    /// Subject line.
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Character set of the text parts.
    #[serde(default = "default_charset")]
    pub charset: String,

    /// Plain text body template.
    #[serde(default = "default_body_text_template")]
    pub body_text_template: String,

    /// HTML body template.
    #[serde(default = "default_body_html_template")]
    pub body_html_template: String,

    /// Email relay accepting the rendered message.
    pub relay_url: Url,
}

/// Settings of the alert handler.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    /// Labels that trigger an alert, compared case-insensitively.
    #[serde(default = "default_alert_labels", deserialize_with = "deserialize_trimmed_list")]
    pub labels: Vec<String>,

    /// The alert email.
    pub email: EmailConfig,
}

/// A bucket and directory the archiver is allowed to process.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ArchiveTarget {
    /// Bucket holding the captures.
    pub bucket_name: String,
    /// Top-level directory of the captures inside the bucket.
    pub main_dir: String,
}

/// Settings of the monthly archiver.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    /// Accepted archive requests.
    #[serde(default)]
    pub targets: Vec<ArchiveTarget>,

    /// Month offsets archived per request, `1` being the previous month.
    #[serde(default = "default_months_ago")]
    pub months_ago: Vec<u32>,

    /// Whether archived originals are deleted.
    #[serde(default = "default_delete_files")]
    pub delete_files: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            months_ago: default_months_ago(),
            delete_files: default_delete_files(),
        }
    }
}

/// Operator parameters written by the `seed` command.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SeedConfig {
    /// Cooldown between two alerts, in seconds.
    #[serde(default = "default_alert_period_secs")]
    pub alert_period_secs: i64,

    /// The 50% threshold of the monthly budget.
    #[serde(default = "default_calls_month_max_50")]
    pub calls_month_max_50: i64,

    /// The 100% threshold of the monthly budget.
    #[serde(default = "default_calls_month_max_100")]
    pub calls_month_max_100: i64,

    /// Suspend metered calls while the alert cooldown runs.
    #[serde(default)]
    pub disable_until_alert_period: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            alert_period_secs: default_alert_period_secs(),
            calls_month_max_50: default_calls_month_max_50(),
            calls_month_max_100: default_calls_month_max_100(),
            disable_until_alert_period: false,
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Settings of the log subscriber.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: LogFormat::default() }
    }
}
