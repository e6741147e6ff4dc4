use std::path::PathBuf;

use clap::Parser;
use tracing::Instrument;

use crate::{
    cmd::{Error, Services},
    logging::invocation_span,
    models::{HandlerResponse, ObjectCreatedEvent},
};

/// Arguments of a single handler invocation.
#[derive(Parser, Debug)]
pub struct EventArgs {
    /// Path to the JSON event.
    #[arg(short, long)]
    pub event: PathBuf,
}

/// Which handler an invocation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// The classification handler.
    Classify,
    /// The alert handler.
    Alert,
    /// The archive handler.
    Archive,
}

impl HandlerKind {
    fn name(&self) -> &'static str {
        match self {
            HandlerKind::Classify => "classify",
            HandlerKind::Alert => "alert",
            HandlerKind::Archive => "archive",
        }
    }
}

/// Runs one handler invocation on the event read from `args.event`.
pub async fn execute(
    services: &Services,
    kind: HandlerKind,
    args: &EventArgs,
) -> Result<HandlerResponse, Error> {
    let raw = tokio::fs::read(&args.event).await?;

    let invocation = async {
        tracing::info!(event = %args.event.display(), "Invocation started.");
        let response = match kind {
            HandlerKind::Classify => {
                let event: ObjectCreatedEvent = serde_json::from_slice(&raw)?;
                services.classification_handler().handle(&event).await?
            }
            HandlerKind::Alert => {
                let event: ObjectCreatedEvent = serde_json::from_slice(&raw)?;
                services.alert_handler().handle(&event).await?
            }
            HandlerKind::Archive => {
                let event: serde_json::Value = serde_json::from_slice(&raw)?;
                services.archive_handler().handle(&event).await?
            }
        };
        tracing::info!(status_code = response.status_code, "Invocation finished.");
        Ok::<_, Error>(response)
    };

    invocation.instrument(invocation_span(kind.name())).await
}
