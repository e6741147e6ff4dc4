//! A set of helpers for testing

mod clock;
mod detector;
mod event;
mod http_client;
mod mailer;
mod notifier;
mod store;

pub use clock::FixedClock;
pub use detector::StubLabelDetector;
pub use event::{ClassificationOutputBuilder, object_created_event};
pub use http_client::create_test_http_client;
pub use mailer::RecordingMailer;
pub use notifier::{Publication, RecordingNotifier};
pub use store::{seed_store, setup_store};
