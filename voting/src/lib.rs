//! Weighted voting engine for the accord pipeline.
//!
//! Runs one voting session per proposal end-to-end: eligibility snapshot at
//! session start, race-free vote acceptance, per-agent weight computation,
//! consensus calculation, and exactly-once finalization. Every session open
//! and vote cast is recorded in the audit ledger at write time.

pub mod consensus;
pub mod engine;
pub mod error;
pub mod locks;
pub mod weight;

pub use consensus::{DecisionTally, VoteOutcome, VotingResults};
pub use engine::VotingEngine;
pub use error::VotingError;
pub use weight::{vote_weight, MAX_WEIGHT, MIN_WEIGHT};
