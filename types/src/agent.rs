//! Agent profiles as supplied by the agent directory collaborator.

use crate::id::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Roles an agent can hold. Roles gate voting eligibility and contribute
/// weight multipliers.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AgentRole {
    /// May cast votes.
    Voter,
    /// May cast votes; weight multiplied by 1.2.
    Reviewer,
    /// May cast votes; weight multiplied by 1.1 (composes with Reviewer).
    Mediator,
    /// Read-only participant; never eligible to vote.
    Observer,
}

impl AgentRole {
    /// Human-readable name of this role.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Voter => "voter",
            Self::Reviewer => "reviewer",
            Self::Mediator => "mediator",
            Self::Observer => "observer",
        }
    }
}

/// Historical performance scores for an agent, both in `[0, 1]`.
///
/// Either score may be absent for agents with no history; the weighting rule
/// substitutes 0.5 for missing scores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub quality_score: Option<f64>,
    pub consensus_score: Option<f64>,
}

impl PerformanceMetrics {
    pub fn new(quality_score: f64, consensus_score: f64) -> Self {
        Self {
            quality_score: Some(quality_score),
            consensus_score: Some(consensus_score),
        }
    }
}

/// An active agent as reported by the agent directory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: AgentId,
    pub roles: BTreeSet<AgentRole>,
    pub metrics: PerformanceMetrics,
}

impl AgentProfile {
    pub fn new(id: impl Into<AgentId>, roles: impl IntoIterator<Item = AgentRole>) -> Self {
        Self {
            id: id.into(),
            roles: roles.into_iter().collect(),
            metrics: PerformanceMetrics::default(),
        }
    }

    pub fn with_metrics(mut self, metrics: PerformanceMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn has_role(&self, role: AgentRole) -> bool {
        self.roles.contains(&role)
    }

    /// Whether any of this agent's roles appears in `allowed`.
    pub fn matches_roles(&self, allowed: &BTreeSet<AgentRole>) -> bool {
        self.roles.iter().any(|r| allowed.contains(r))
    }
}
