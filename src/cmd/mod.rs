//! Command line entry points.

pub mod invoke;
pub mod seed;
mod services;
pub mod status;

pub use invoke::{EventArgs, HandlerKind};
pub use services::Services;
use thiserror::Error;

use crate::{
    engine::GateError, handlers::HandlerError, http_client::HttpClientError,
    persistence::error::PersistenceError,
};

/// Errors surfaced by the command line.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading an input file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The quota store failed.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// A gate could not decide.
    #[error("Gate error: {0}")]
    Gate(#[from] GateError),

    /// A handler invocation failed.
    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] HttpClientError),

    /// The seed parameters cannot be written.
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    /// An event or report could not be encoded or decoded.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
