//! Monthly archiving of stored captures.

mod archiver;
pub mod tags;

pub use archiver::{ArchiveJob, ArchiveReport, MonthlyArchiver};
use thiserror::Error;

use crate::storage::ObjectStoreError;

/// Errors raised while archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Object storage failed.
    #[error("Object storage error: {0}")]
    Storage(#[from] ObjectStoreError),

    /// The resolved file name pattern is not a valid regex.
    #[error("Invalid file name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The month offset leaves the supported date range.
    #[error("Invalid month offset: {0}")]
    InvalidOffset(u32),

    /// The bundle could not be built.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Writing bundle content failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
