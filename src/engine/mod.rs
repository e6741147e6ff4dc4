//! The gating engine: the alert cooldown gate, the monthly API call budget
//! gate and the policy composing them.

pub mod budget_gate;
pub mod cooldown_gate;
pub mod coordination;
pub mod error;

pub use budget_gate::ApiCallBudgetGate;
pub use cooldown_gate::AlertCooldownGate;
pub use coordination::CoordinationPolicy;
pub use error::GateError;
