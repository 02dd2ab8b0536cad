//! Consensus calculation — pure projection from votes to a verdict.

use accord_types::{SessionId, SessionStatus, Vote, VoteDecision, VotingSession};
use serde::{Deserialize, Serialize};

/// Count and accumulated weight for one decision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionTally {
    pub count: u32,
    pub weight: f64,
}

impl DecisionTally {
    fn add(&mut self, weight: f64) {
        self.count += 1;
        self.weight += weight;
    }
}

/// The verdict of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteOutcome {
    /// Session still active; no verdict yet.
    Pending,
    /// Finalized with quorum and consensus both met.
    Approved,
    /// Finalized or cancelled without meeting both thresholds.
    Rejected,
}

/// Full projection of a session's votes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VotingResults {
    pub session: SessionId,
    pub total_eligible: u32,
    pub total_votes: u32,
    /// Votes cast over eligible voters, in `[0, 1]`. Zero when nobody is
    /// eligible.
    pub participation_rate: f64,
    pub approve: DecisionTally,
    pub reject: DecisionTally,
    pub abstain: DecisionTally,
    /// Approving share of all cast weight, in `[0, 100]`. Zero when no
    /// weight has been cast.
    pub consensus_percentage: f64,
    pub quorum_met: bool,
    pub consensus_met: bool,
    pub outcome: VoteOutcome,
}

impl VotingResults {
    pub fn total_weight(&self) -> f64 {
        self.approve.weight + self.reject.weight + self.abstain.weight
    }
}

/// Compute the projection for a session and its votes.
///
/// Pure: no storage access, no mutation. The outcome is `Pending` while the
/// session is active; once the session has terminated, it is `Approved` iff
/// both quorum and consensus were met.
pub fn tally(session: &VotingSession, votes: &[Vote]) -> VotingResults {
    let total_eligible = session.eligible_agents.len() as u32;
    let total_votes = votes.len() as u32;

    let mut approve = DecisionTally::default();
    let mut reject = DecisionTally::default();
    let mut abstain = DecisionTally::default();
    for vote in votes {
        match vote.decision {
            VoteDecision::Approve => approve.add(vote.weight),
            VoteDecision::Reject => reject.add(vote.weight),
            VoteDecision::Abstain => abstain.add(vote.weight),
        }
    }

    let participation_rate = if total_eligible == 0 {
        0.0
    } else {
        f64::from(total_votes) / f64::from(total_eligible)
    };

    let total_weight = approve.weight + reject.weight + abstain.weight;
    let consensus_percentage = if total_weight == 0.0 {
        0.0
    } else {
        100.0 * approve.weight / total_weight
    };

    let quorum_met = participation_rate >= session.config.quorum_threshold;
    let consensus_met = consensus_percentage >= session.config.consensus_threshold * 100.0;

    let outcome = match session.status {
        SessionStatus::Active => VoteOutcome::Pending,
        SessionStatus::Finalized if quorum_met && consensus_met => VoteOutcome::Approved,
        SessionStatus::Finalized | SessionStatus::Cancelled => VoteOutcome::Rejected,
    };

    VotingResults {
        session: session.id.clone(),
        total_eligible,
        total_votes,
        participation_rate,
        approve,
        reject,
        abstain,
        consensus_percentage,
        quorum_met,
        consensus_met,
        outcome,
    }
}
