//! # Event handlers
//!
//! One handler per kind of invocation:
//!
//! - [`ClassificationHandler`] classifies a newly stored image, gated by the
//!   monthly call budget.
//! - [`AlertHandler`] emails an alert when a classification holds one of the
//!   configured labels, gated by the alert cooldown.
//! - [`ArchiveHandler`] bundles last month's captures of a configured
//!   directory.
//!
//! Gating outcomes are reported in the [`HandlerResponse`]; a
//! [`HandlerError`] means the invocation failed and nothing was decided.
//!
//! [`HandlerResponse`]: crate::models::HandlerResponse

mod alert;
mod archive;
mod classify;

pub use alert::AlertHandler;
pub use archive::ArchiveHandler;
pub use classify::ClassificationHandler;
use thiserror::Error;

use crate::{
    archive::ArchiveError, engine::GateError, notification::TemplateServiceError,
    storage::ObjectStoreError, vision::VisionError,
};

/// Errors aborting a handler invocation.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The inbound event lacks required data.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// A gate could not decide.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Object storage failed.
    #[error("Object storage error: {0}")]
    Storage(#[from] ObjectStoreError),

    /// Label detection failed.
    #[error("Label detection error: {0}")]
    Vision(#[from] VisionError),

    /// An email body could not be rendered.
    #[error("Template error: {0}")]
    Template(#[from] TemplateServiceError),

    /// Archiving failed.
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// A document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Last `/`-separated segment of an object key.
fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
