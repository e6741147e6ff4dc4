//! Inbound events: object-created notifications and archive requests.

use serde::{Deserialize, Serialize};

/// An object storage notification. Only the first record is processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectCreatedEvent {
    /// The notification records.
    #[serde(rename = "Records")]
    pub records: Vec<EventRecord>,
}

/// One notification record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// When the object was created, ISO-8601.
    #[serde(rename = "eventTime")]
    pub event_time: String,

    /// The bucket and object the record refers to.
    pub s3: StorageEntity,
}

/// The storage part of a notification record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageEntity {
    /// The bucket holding the object.
    pub bucket: BucketRef,
    /// The created object.
    pub object: ObjectRef,
}

/// A bucket reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketRef {
    /// Bucket name.
    pub name: String,
}

/// An object reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Object key.
    pub key: String,
}

/// Bucket, key and event time of the object an event refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Event time as sent by the storage service.
    pub event_time: String,
}

impl ObjectCreatedEvent {
    /// Builds a single-record event.
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
        event_time: impl Into<String>,
    ) -> Self {
        Self {
            records: vec![EventRecord {
                event_time: event_time.into(),
                s3: StorageEntity {
                    bucket: BucketRef { name: bucket.into() },
                    object: ObjectRef { key: key.into() },
                },
            }],
        }
    }

    /// The object referred to by the first record, if any.
    pub fn first_object(&self) -> Option<ObjectLocation> {
        self.records.first().map(|record| ObjectLocation {
            bucket: record.s3.bucket.name.clone(),
            key: record.s3.object.key.clone(),
            event_time: record.event_time.clone(),
        })
    }
}

/// A request to archive one configured directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveRequest {
    /// The directory to archive.
    pub custom_event: ArchiveTargetRef,
}

/// Bucket and directory named by an archive request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveTargetRef {
    /// Bucket name.
    pub bucket_name: String,
    /// Top-level directory inside the bucket.
    pub main_dir: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_created_event_ignores_unknown_fields() {
        let json = r#"{
            "Records": [{
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "eventTime": "2024-06-15T09:30:00.000Z",
                "s3": {
                    "bucket": {"name": "cams", "arn": "arn:aws:s3:::cams"},
                    "object": {"key": "front/2024-06-15-09-30-00-cam1.jpg", "size": 1024}
                }
            }]
        }"#;

        let event: ObjectCreatedEvent = serde_json::from_str(json).unwrap();
        let location = event.first_object().unwrap();

        assert_eq!(location.bucket, "cams");
        assert_eq!(location.key, "front/2024-06-15-09-30-00-cam1.jpg");
        assert_eq!(location.event_time, "2024-06-15T09:30:00.000Z");
    }

    #[test]
    fn test_event_without_records_has_no_object() {
        let event: ObjectCreatedEvent = serde_json::from_str(r#"{"Records": []}"#).unwrap();
        assert!(event.first_object().is_none());
    }

    #[test]
    fn test_archive_request_rejects_unknown_fields() {
        let ok = r#"{"custom_event": {"bucket_name": "cams", "main_dir": "front"}}"#;
        let extra = r#"{"custom_event": {"bucket_name": "cams", "main_dir": "front", "x": 1}}"#;
        let missing = r#"{"custom_event": {"bucket_name": "cams"}}"#;

        let request: ArchiveRequest = serde_json::from_str(ok).unwrap();
        assert_eq!(request.custom_event.main_dir, "front");
        assert!(serde_json::from_str::<ArchiveRequest>(extra).is_err());
        assert!(serde_json::from_str::<ArchiveRequest>(missing).is_err());
    }
}
