//! Transition guards, shared by the mutating operations and the pure
//! pre-flight check.
//!
//! Keeping the guard logic in one place is the point: `can_advance_phase`
//! must agree with the mutating operations for every input, so both call
//! these functions rather than re-deriving the rules.

use accord_types::{Proposal, ProposalPhase, ProposalStatus, Timestamp};
use serde::{Deserialize, Serialize};

/// Result of a pre-flight transition check.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdvanceCheck {
    pub can_advance: bool,
    /// Human-readable blockers; empty when `can_advance` is true.
    pub reasons: Vec<String>,
}

impl AdvanceCheck {
    pub fn from_reasons(reasons: Vec<String>) -> Self {
        Self {
            can_advance: reasons.is_empty(),
            reasons,
        }
    }
}

fn status_reason(proposal: &Proposal, allowed: &[ProposalStatus]) -> Option<String> {
    if allowed.contains(&proposal.status) {
        None
    } else {
        let expected = allowed
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(" or ");
        Some(format!(
            "status is {}, must be {}",
            proposal.status, expected
        ))
    }
}

/// All blockers for advancing `proposal` into `target`.
///
/// `deadline` is the proposed voting deadline (only meaningful for the voting
/// phase); `has_active_session` reports whether a voting session is currently
/// open for this proposal.
pub fn advance_reasons(
    proposal: &Proposal,
    target: ProposalPhase,
    deadline: Option<Timestamp>,
    has_active_session: bool,
    now: Timestamp,
) -> Vec<String> {
    let mut reasons = Vec::new();
    match target {
        ProposalPhase::Proposal => {
            reasons.push("a proposal never re-enters the proposal phase".into());
        }
        ProposalPhase::Discussion => {
            // Drafts are submitted; revisions reopen discussion.
            if let Some(r) =
                status_reason(proposal, &[ProposalStatus::Draft, ProposalStatus::Revision])
            {
                reasons.push(r);
            }
        }
        ProposalPhase::Revision => {
            if let Some(r) = status_reason(proposal, &[ProposalStatus::Discussion]) {
                reasons.push(r);
            }
        }
        ProposalPhase::Voting => {
            if let Some(r) = status_reason(
                proposal,
                &[ProposalStatus::Discussion, ProposalStatus::Revision],
            ) {
                reasons.push(r);
            }
            match deadline {
                None => reasons.push("a voting deadline is required".into()),
                Some(d) if d <= now => {
                    reasons.push(format!("deadline {} is not in the future", d))
                }
                Some(_) => {}
            }
            if has_active_session {
                reasons.push("a voting session is already active".into());
            }
        }
        ProposalPhase::Resolution => {
            if let Some(r) = status_reason(proposal, &[ProposalStatus::Voting]) {
                reasons.push(r);
            }
            if !has_active_session {
                reasons.push("no active voting session to finalize".into());
            }
        }
        ProposalPhase::Execution => {
            if let Some(r) = status_reason(proposal, &[ProposalStatus::Approved]) {
                reasons.push(r);
            }
        }
    }
    reasons
}

/// Blocker for deleting a proposal, if any. Only drafts may be deleted.
pub fn delete_reason(proposal: &Proposal) -> Option<String> {
    status_reason(proposal, &[ProposalStatus::Draft])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal_in(status: ProposalStatus) -> Proposal {
        let mut p = Proposal::new("P001", "t", "a", "c", Timestamp::new(100));
        p.set_status(status, Timestamp::new(100));
        p
    }

    #[test]
    fn draft_advances_to_discussion_only() {
        let p = proposal_in(ProposalStatus::Draft);
        let now = Timestamp::new(200);
        assert!(advance_reasons(&p, ProposalPhase::Discussion, None, false, now).is_empty());
        assert!(!advance_reasons(&p, ProposalPhase::Revision, None, false, now).is_empty());
        assert!(!advance_reasons(
            &p,
            ProposalPhase::Voting,
            Some(Timestamp::new(300)),
            false,
            now
        )
        .is_empty());
        assert!(!advance_reasons(&p, ProposalPhase::Execution, None, false, now).is_empty());
    }

    #[test]
    fn discussion_and_revision_swing_both_ways() {
        let now = Timestamp::new(200);
        let discussion = proposal_in(ProposalStatus::Discussion);
        assert!(advance_reasons(&discussion, ProposalPhase::Revision, None, false, now).is_empty());

        let revision = proposal_in(ProposalStatus::Revision);
        assert!(advance_reasons(&revision, ProposalPhase::Discussion, None, false, now).is_empty());
    }

    #[test]
    fn voting_requires_future_deadline() {
        let p = proposal_in(ProposalStatus::Discussion);
        let now = Timestamp::new(200);

        assert!(advance_reasons(&p, ProposalPhase::Voting, Some(Timestamp::new(201)), false, now)
            .is_empty());

        let past = advance_reasons(&p, ProposalPhase::Voting, Some(Timestamp::new(200)), false, now);
        assert_eq!(past.len(), 1);
        assert!(past[0].contains("not in the future"));

        let missing = advance_reasons(&p, ProposalPhase::Voting, None, false, now);
        assert!(missing[0].contains("required"));
    }

    #[test]
    fn voting_blocked_by_existing_session() {
        let p = proposal_in(ProposalStatus::Revision);
        let reasons =
            advance_reasons(&p, ProposalPhase::Voting, Some(Timestamp::new(300)), true, Timestamp::new(200));
        assert!(reasons.iter().any(|r| r.contains("already active")));
    }

    #[test]
    fn resolution_requires_voting_with_session() {
        let now = Timestamp::new(200);
        let p = proposal_in(ProposalStatus::Voting);
        assert!(advance_reasons(&p, ProposalPhase::Resolution, None, true, now).is_empty());
        assert!(!advance_reasons(&p, ProposalPhase::Resolution, None, false, now).is_empty());

        let p = proposal_in(ProposalStatus::Discussion);
        assert!(!advance_reasons(&p, ProposalPhase::Resolution, None, true, now).is_empty());
    }

    #[test]
    fn execution_requires_approved() {
        let now = Timestamp::new(200);
        assert!(advance_reasons(
            &proposal_in(ProposalStatus::Approved),
            ProposalPhase::Execution,
            None,
            false,
            now
        )
        .is_empty());
        assert!(!advance_reasons(
            &proposal_in(ProposalStatus::Rejected),
            ProposalPhase::Execution,
            None,
            false,
            now
        )
        .is_empty());
    }

    #[test]
    fn only_drafts_deletable() {
        assert!(delete_reason(&proposal_in(ProposalStatus::Draft)).is_none());
        for status in [
            ProposalStatus::Discussion,
            ProposalStatus::Voting,
            ProposalStatus::Approved,
            ProposalStatus::Executed,
        ] {
            assert!(delete_reason(&proposal_in(status)).is_some());
        }
    }

    #[test]
    fn proposal_phase_never_reentered() {
        let p = proposal_in(ProposalStatus::Draft);
        let reasons =
            advance_reasons(&p, ProposalPhase::Proposal, None, false, Timestamp::new(200));
        assert!(!reasons.is_empty());
    }
}
