//! # Notifications
//!
//! Out-of-band publications (budget threshold crossings) go through the
//! [`Notifier`] trait. Two implementations exist: [`WebhookNotifier`] posts a
//! JSON document to an HTTP endpoint and [`StdoutNotifier`] prints to
//! standard output. The [`template`] module renders the alert email bodies.

pub mod error;
mod stdout;
pub mod template;
pub mod traits;
mod webhook;

pub use error::NotificationError;
pub use stdout::StdoutNotifier;
pub use template::{TemplateService, TemplateServiceError};
pub use traits::Notifier;
pub use webhook::WebhookNotifier;
