//! Errors raised while a gate evaluates its decision.

use thiserror::Error;

use crate::persistence::error::PersistenceError;

/// A gate could not determine a decision.
///
/// A denial is never an error; it is reported through the gate's decision
/// type. These variants mean the required state could not be read or is not
/// usable, and the invocation must abort.
#[derive(Debug, Error)]
pub enum GateError {
    /// Error occurred in the quota store.
    #[error("Quota store error: {0}")]
    Store(#[from] PersistenceError),

    /// An operator-configured value violates its invariant.
    #[error("Invalid gate configuration: {0}")]
    InvalidConfiguration(String),
}
