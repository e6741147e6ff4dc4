use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// Custom deserializer for Duration from milliseconds
pub fn deserialize_duration_from_ms<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let ms = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(ms))
}

/// Custom deserializer for Duration from seconds
pub fn deserialize_duration_from_seconds<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = u64::deserialize(deserializer)?;
    Ok(Duration::from_secs(secs))
}

/// Custom serializer for Duration to milliseconds
pub fn serialize_duration_to_ms<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Custom serializer for Duration to seconds
pub fn serialize_duration_to_seconds<S>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_secs())
}

/// Deserializes a list of strings, trimming whitespace and dropping empty
/// entries (environment overrides often carry trailing separators).
pub fn deserialize_trimmed_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<String>::deserialize(deserializer)?;
    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct TestDurationMs {
        #[serde(
            deserialize_with = "deserialize_duration_from_ms",
            serialize_with = "serialize_duration_to_ms"
        )]
        duration: Duration,
    }

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct TestDurationSecs {
        #[serde(
            deserialize_with = "deserialize_duration_from_seconds",
            serialize_with = "serialize_duration_to_seconds"
        )]
        duration: Duration,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestList {
        #[serde(deserialize_with = "deserialize_trimmed_list")]
        items: Vec<String>,
    }

    #[test]
    fn test_duration_from_ms_round_trip() {
        let actual: TestDurationMs = serde_json::from_str(r#"{"duration": 5000}"#).unwrap();
        assert_eq!(actual.duration, Duration::from_millis(5000));
        assert_eq!(serde_json::to_string(&actual).unwrap(), r#"{"duration":5000}"#);
    }

    #[test]
    fn test_duration_from_seconds_round_trip() {
        let actual: TestDurationSecs = serde_json::from_str(r#"{"duration": 5}"#).unwrap();
        assert_eq!(actual.duration, Duration::from_secs(5));
        assert_eq!(serde_json::to_string(&actual).unwrap(), r#"{"duration":5}"#);
    }

    #[test]
    fn test_trimmed_list_drops_blank_entries() {
        let actual: TestList =
            serde_json::from_str(r#"{"items": [" Person ", "", "Car"]}"#).unwrap();
        assert_eq!(actual.items, vec!["Person".to_string(), "Car".to_string()]);
    }
}
