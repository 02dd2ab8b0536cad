//! Proposal phase state machine for the accord pipeline.
//!
//! Pipeline: draft → discussion ⇄ revision → voting → resolution → execution,
//! with rejection landing in resolution. Only the seven status/phase pairs in
//! the transition table are ever persisted, and every mutating operation
//! shares its guards with the pure `can_advance_phase` pre-flight.

pub mod error;
pub mod machine;
pub mod transition;

pub use error::GovernanceError;
pub use machine::PhaseStateMachine;
pub use transition::AdvanceCheck;
