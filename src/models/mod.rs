//! This module contains the data models for camwatch.

pub mod classification;
pub mod decision;
pub mod event;
pub mod response;

pub use classification::{ClassificationOutput, ClassificationRecord, DetectedLabel, LabelDetection};
pub use decision::{BudgetBand, BudgetDecision, CooldownStatus, DenyCause, Threshold, Verdict};
pub use event::{ArchiveRequest, ArchiveTargetRef, ObjectCreatedEvent, ObjectLocation};
pub use response::HandlerResponse;
