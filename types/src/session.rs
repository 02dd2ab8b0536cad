//! Voting sessions and their configuration.

use crate::agent::AgentRole;
use crate::id::{AgentId, ProposalId, SessionId};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default voting duration: 48 hours.
pub const DEFAULT_DURATION_SECS: u64 = 48 * 60 * 60;
/// Default quorum threshold: 60% participation.
pub const DEFAULT_QUORUM_THRESHOLD: f64 = 0.6;
/// Default consensus threshold: 70% of cast weight approving.
pub const DEFAULT_CONSENSUS_THRESHOLD: f64 = 0.7;

/// Lifecycle state of a voting session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Accepting votes.
    Active,
    /// Closed with a verdict. Terminal state.
    Finalized,
    /// Closed without a verdict. Terminal state.
    Cancelled,
}

/// What the external scheduler should do when a session's deadline passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeoutBehavior {
    /// Finalize with whatever votes were cast.
    FinalizeWithVotes,
    /// Cancel the session; the proposal returns to the operator's hands.
    Cancel,
}

/// Configuration for a voting session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VotingConfig {
    /// How long the session stays open, in seconds.
    pub duration_secs: u64,
    /// Minimum participation rate (votes cast / eligible), in `[0, 1]`.
    pub quorum_threshold: f64,
    /// Minimum approving share of cast weight, in `[0, 1]`.
    pub consensus_threshold: f64,
    /// Whether the external scheduler should finalize at the deadline.
    pub auto_finalize: bool,
    /// Roles eligible to vote. The eligibility snapshot at session start is
    /// limited to active agents holding at least one of these roles.
    pub allowed_roles: BTreeSet<AgentRole>,
    pub timeout_behavior: TimeoutBehavior,
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            quorum_threshold: DEFAULT_QUORUM_THRESHOLD,
            consensus_threshold: DEFAULT_CONSENSUS_THRESHOLD,
            auto_finalize: true,
            allowed_roles: [AgentRole::Voter, AgentRole::Reviewer, AgentRole::Mediator]
                .into_iter()
                .collect(),
            timeout_behavior: TimeoutBehavior::FinalizeWithVotes,
        }
    }
}

impl VotingConfig {
    /// Apply an override on top of this configuration.
    ///
    /// Named, typed fields only: unknown settings cannot sneak in the way
    /// they could through a string-keyed merge.
    pub fn apply(&self, overrides: &VotingConfigOverride) -> Self {
        Self {
            duration_secs: overrides.duration_secs.unwrap_or(self.duration_secs),
            quorum_threshold: overrides.quorum_threshold.unwrap_or(self.quorum_threshold),
            consensus_threshold: overrides
                .consensus_threshold
                .unwrap_or(self.consensus_threshold),
            auto_finalize: overrides.auto_finalize.unwrap_or(self.auto_finalize),
            allowed_roles: overrides
                .allowed_roles
                .clone()
                .unwrap_or_else(|| self.allowed_roles.clone()),
            timeout_behavior: overrides.timeout_behavior.unwrap_or(self.timeout_behavior),
        }
    }

    /// Check that thresholds and duration are usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.duration_secs == 0 {
            return Err("duration must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.quorum_threshold) {
            return Err(format!(
                "quorum threshold {} outside [0, 1]",
                self.quorum_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.consensus_threshold) {
            return Err(format!(
                "consensus threshold {} outside [0, 1]",
                self.consensus_threshold
            ));
        }
        if self.allowed_roles.is_empty() {
            return Err("allowed roles must not be empty".into());
        }
        Ok(())
    }
}

/// A partial configuration, applied over the defaults at session start.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VotingConfigOverride {
    pub duration_secs: Option<u64>,
    pub quorum_threshold: Option<f64>,
    pub consensus_threshold: Option<f64>,
    pub auto_finalize: Option<bool>,
    pub allowed_roles: Option<BTreeSet<AgentRole>>,
    pub timeout_behavior: Option<TimeoutBehavior>,
}

impl VotingConfigOverride {
    /// Set the duration so the session deadline lands at a given instant,
    /// keeping every other field of this override.
    pub fn with_deadline(self, deadline: Timestamp, now: Timestamp) -> Self {
        Self {
            duration_secs: Some(deadline.as_secs().saturating_sub(now.as_secs())),
            ..self
        }
    }
}

/// One voting round for a proposal.
///
/// The eligibility snapshot is taken once at session start and never changes
/// afterwards; votes live in the session store, keyed by this session's id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VotingSession {
    pub id: SessionId,
    pub proposal: ProposalId,
    pub status: SessionStatus,
    pub config: VotingConfig,
    pub started_at: Timestamp,
    pub deadline: Timestamp,
    /// Agents eligible to vote, snapshotted at session start.
    pub eligible_agents: BTreeSet<AgentId>,
    pub finalized_at: Option<Timestamp>,
}

impl VotingSession {
    pub fn new(
        proposal: ProposalId,
        config: VotingConfig,
        eligible_agents: BTreeSet<AgentId>,
        now: Timestamp,
    ) -> Self {
        let deadline = now.plus_secs(config.duration_secs);
        Self {
            id: SessionId::for_proposal(&proposal, now),
            proposal,
            status: SessionStatus::Active,
            config,
            started_at: now,
            deadline,
            eligible_agents,
            finalized_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Whether the deadline has passed, strictly.
    pub fn deadline_passed(&self, now: Timestamp) -> bool {
        now > self.deadline
    }

    pub fn is_eligible(&self, agent: &AgentId) -> bool {
        self.eligible_agents.contains(agent)
    }
}
