//! Monthly zip bundles of camera captures.

use std::{
    collections::HashSet,
    io::{Cursor, Write},
    sync::Arc,
};

use chrono::{Months, NaiveDateTime};
use regex::Regex;
use serde::Serialize;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{
    archive::{ArchiveError, tags::TaggedTemplate},
    storage::ObjectStore,
};

/// Where to look for files and where to write the bundle, as time-tagged
/// templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveJob {
    /// Bucket holding the files and receiving the bundle.
    pub bucket: TaggedTemplate,
    /// Key prefix of the candidate files.
    pub prefix: TaggedTemplate,
    /// Regex the candidate file names must match.
    pub filename_regex: TaggedTemplate,
    /// Key of the bundle.
    pub zip_key: TaggedTemplate,
}

impl ArchiveJob {
    /// The monthly layout: captures named `YYYY-MM-DD-hh-mm-ss...` directly
    /// under `main_dir`, bundled into `main_dir/zip/YYYY-MM.zip`.
    pub fn monthly(bucket_name: &str, main_dir: &str) -> Self {
        Self {
            bucket: TaggedTemplate::new(bucket_name),
            prefix: TaggedTemplate::new(format!("{main_dir}/{{YYYY}}-{{MM}}-")),
            filename_regex: TaggedTemplate::new(r"^{YYYY}-{MM}-\d{2}-\d{2}-\d{2}-\d{2}.+"),
            zip_key: TaggedTemplate::new(format!("{main_dir}/zip/{{YYYY}}-{{MM}}.zip")),
        }
    }
}

/// What one archiving pass did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveReport {
    /// Bucket the pass ran on.
    pub bucket: String,
    /// Key of the bundle.
    pub zip_key: String,
    /// Keys of the files put in the bundle.
    pub archived: Vec<String>,
    /// Whether the bundle was written.
    pub uploaded: bool,
    /// Whether the archived files were deleted.
    pub deleted: bool,
}

/// Bundles the files of a past month into one zip object.
pub struct MonthlyArchiver {
    store: Arc<dyn ObjectStore>,
}

impl MonthlyArchiver {
    /// Creates a new MonthlyArchiver
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Archives the files of the month `months_ago` calendar months before
    /// `now`.
    ///
    /// Files are listed under the resolved prefix and kept when their base
    /// name matches the resolved regex. The bundle is only written when at
    /// least one file matched; the originals are deleted afterwards when
    /// `delete_files` is set.
    #[tracing::instrument(skip(self, job), level = "info")]
    pub async fn zip_month_ago(
        &self,
        job: &ArchiveJob,
        now: NaiveDateTime,
        months_ago: u32,
        delete_files: bool,
    ) -> Result<ArchiveReport, ArchiveError> {
        let at = now
            .checked_sub_months(Months::new(months_ago))
            .ok_or(ArchiveError::InvalidOffset(months_ago))?;

        let bucket = job.bucket.resolve(at);
        let prefix = job.prefix.resolve(at);
        let zip_key = job.zip_key.resolve(at);
        let pattern = Regex::new(&job.filename_regex.resolve(at))?;
        tracing::info!(bucket, prefix, %pattern, zip_key, delete_files, "Archiving month.");

        let mut names = HashSet::new();
        let mut entries = Vec::new();
        for key in self.store.list(&bucket, &prefix).await? {
            let name = basename(&key);
            if !pattern.is_match(name) {
                continue;
            }
            if !names.insert(name.to_string()) {
                tracing::warn!(key, "Skipping file with a duplicate name.");
                continue;
            }
            let content = self.store.get(&bucket, &key).await?;
            entries.push((key, content));
        }

        let archived: Vec<String> = entries.iter().map(|(key, _)| key.clone()).collect();
        tracing::info!(count = archived.len(), files = ?archived, "Files to archive.");

        if entries.is_empty() {
            tracing::info!("Nothing to archive, bundle not written.");
            return Ok(ArchiveReport {
                bucket,
                zip_key,
                archived,
                uploaded: false,
                deleted: false,
            });
        }

        let bundle = build_zip(&entries)?;
        self.store.put(&bucket, &zip_key, bundle).await?;
        tracing::info!(bucket, zip_key, "Bundle written.");

        if delete_files {
            for key in &archived {
                self.store.delete(&bucket, key).await?;
            }
            tracing::warn!(count = archived.len(), "Archived files deleted.");
        }

        Ok(ArchiveReport { bucket, zip_key, archived, uploaded: true, deleted: delete_files })
    }

    /// Runs [`zip_month_ago`](Self::zip_month_ago) for each offset in turn.
    pub async fn zip_months_ago(
        &self,
        job: &ArchiveJob,
        now: NaiveDateTime,
        months_ago: &[u32],
        delete_files: bool,
    ) -> Result<Vec<ArchiveReport>, ArchiveError> {
        let mut reports = Vec::with_capacity(months_ago.len());
        for &offset in months_ago {
            reports.push(self.zip_month_ago(job, now, offset, delete_files).await?);
        }
        Ok(reports)
    }
}

fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// A deflated zip with one entry per file, named by the key's base name.
fn build_zip(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>, ArchiveError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (key, content) in entries {
        writer.start_file(basename(key), options)?;
        writer.write_all(content)?;
    }
    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use chrono::NaiveDate;
    use mockall::predicate::eq;

    use super::*;
    use crate::storage::{ObjectStoreError, traits::MockObjectStore};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(3, 0, 0).unwrap()
    }

    #[test]
    fn test_monthly_job_resolves_to_previous_month_paths() {
        let job = ArchiveJob::monthly("cams", "front");
        let at = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap().and_hms_opt(3, 0, 0).unwrap();

        assert_eq!(job.prefix.resolve(at), "front/2024-05-");
        assert_eq!(job.zip_key.resolve(at), "front/zip/2024-05.zip");
        assert_eq!(job.filename_regex.resolve(at), r"^2024-05-\d{2}-\d{2}-\d{2}-\d{2}.+");
    }

    #[test]
    fn test_build_zip_uses_base_names() {
        let bundle = build_zip(&[
            ("front/2024-05-01-10-00-00-a.jpg".to_string(), b"first".to_vec()),
            ("front/2024-05-02-10-00-00-b.jpg".to_string(), b"second".to_vec()),
        ])
        .unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bundle)).unwrap();
        assert_eq!(archive.len(), 2);
        let mut file = archive.by_name("2024-05-02-10-00-00-b.jpg").unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        assert_eq!(content, "second");
    }

    #[tokio::test]
    async fn test_nothing_matched_writes_nothing() {
        let mut store = MockObjectStore::new();
        store
            .expect_list()
            .with(eq("cams"), eq("front/2024-05-"))
            .returning(|_, _| Ok(vec!["front/2024-05-notes.txt".to_string()]));
        store.expect_get().never();
        store.expect_put().never();
        store.expect_delete().never();

        let report = MonthlyArchiver::new(Arc::new(store))
            .zip_month_ago(&ArchiveJob::monthly("cams", "front"), now(), 1, true)
            .await
            .unwrap();

        assert!(!report.uploaded);
        assert!(!report.deleted);
        assert!(report.archived.is_empty());
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_originals() {
        let mut store = MockObjectStore::new();
        store
            .expect_list()
            .returning(|_, _| Ok(vec!["front/2024-05-01-10-00-00-a.jpg".to_string()]));
        store.expect_get().returning(|_, _| Ok(b"a".to_vec()));
        store.expect_put().returning(|_, _, _| {
            Err(ObjectStoreError::Io(std::io::Error::other("disk full")))
        });
        store.expect_delete().never();

        let result = MonthlyArchiver::new(Arc::new(store))
            .zip_month_ago(&ArchiveJob::monthly("cams", "front"), now(), 1, true)
            .await;

        assert!(matches!(result, Err(ArchiveError::Storage(_))));
    }

    #[tokio::test]
    async fn test_offsets_cross_year_boundary() {
        let mut store = MockObjectStore::new();
        store.expect_list().with(eq("cams"), eq("front/2023-12-")).times(1).returning(|_, _| Ok(vec![]));
        store.expect_list().with(eq("cams"), eq("front/2023-11-")).times(1).returning(|_, _| Ok(vec![]));

        let january = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let reports = MonthlyArchiver::new(Arc::new(store))
            .zip_months_ago(&ArchiveJob::monthly("cams", "front"), january, &[1, 2], false)
            .await
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].zip_key, "front/zip/2023-12.zip");
        assert_eq!(reports[1].zip_key, "front/zip/2023-11.zip");
    }
}
