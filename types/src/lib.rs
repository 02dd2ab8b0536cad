//! Fundamental types for the accord governance pipeline.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: identifiers, timestamps, hashes, proposal and voting records,
//! agent profiles, and the audit chain entry format.

pub mod agent;
pub mod audit;
pub mod hash;
pub mod id;
pub mod proposal;
pub mod session;
pub mod time;
pub mod vote;

pub use agent::{AgentProfile, AgentRole, PerformanceMetrics};
pub use audit::{AuditChainEntry, EntryKind};
pub use hash::EntryHash;
pub use id::{AgentId, ProposalId, SessionId, VoteId};
pub use proposal::{Proposal, ProposalPhase, ProposalStatus};
pub use session::{
    SessionStatus, TimeoutBehavior, VotingConfig, VotingConfigOverride, VotingSession,
};
pub use time::Timestamp;
pub use vote::{Vote, VoteDecision};
