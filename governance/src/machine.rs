//! The phase state machine — mutating operations over proposals.

use crate::error::GovernanceError;
use crate::transition::{self, AdvanceCheck};
use accord_store::{ProposalStore, StoreError};
use accord_types::{
    AgentId, Proposal, ProposalId, ProposalPhase, ProposalStatus, Timestamp,
    VotingConfigOverride, VotingSession,
};
use accord_voting::{VoteOutcome, VotingEngine, VotingResults};
use std::sync::Arc;

/// Enforces the legal status/phase pairs and the transitions between them.
///
/// Every operation loads the proposal, evaluates the shared guards, mutates,
/// and persists before returning. Illegal attempts fail with a typed error
/// naming the unmet precondition; nothing is retried here.
pub struct PhaseStateMachine {
    proposals: Arc<dyn ProposalStore + Send + Sync>,
    engine: Arc<VotingEngine>,
}

impl PhaseStateMachine {
    pub fn new(
        proposals: Arc<dyn ProposalStore + Send + Sync>,
        engine: Arc<VotingEngine>,
    ) -> Self {
        Self { proposals, engine }
    }

    /// Create a new draft proposal in (draft, proposal).
    pub fn create_proposal(
        &self,
        id: impl Into<ProposalId>,
        title: impl Into<String>,
        author: impl Into<AgentId>,
        content: impl Into<String>,
        now: Timestamp,
    ) -> Result<Proposal, GovernanceError> {
        let proposal = Proposal::new(id, title, author, content, now);
        match self.proposals.get_proposal(&proposal.id) {
            Ok(_) => {
                return Err(GovernanceError::InvalidState {
                    id: proposal.id.to_string(),
                    reason: "a proposal with this id already exists".into(),
                })
            }
            Err(StoreError::NotFound(_)) => {}
            Err(other) => return Err(other.into()),
        }
        self.proposals.put_proposal(&proposal)?;
        tracing::info!(proposal = %proposal.id, "proposal created");
        Ok(proposal)
    }

    /// draft → (discussion, discussion).
    pub fn submit_for_discussion(
        &self,
        id: &ProposalId,
        now: Timestamp,
    ) -> Result<Proposal, GovernanceError> {
        self.advance_simple(id, ProposalPhase::Discussion, ProposalStatus::Discussion, now)
    }

    /// discussion → (revision, revision).
    pub fn move_to_revision(
        &self,
        id: &ProposalId,
        now: Timestamp,
    ) -> Result<Proposal, GovernanceError> {
        self.advance_simple(id, ProposalPhase::Revision, ProposalStatus::Revision, now)
    }

    /// revision → (discussion, discussion); the back edge of the
    /// discussion ⇄ revision loop.
    pub fn reopen_discussion(
        &self,
        id: &ProposalId,
        now: Timestamp,
    ) -> Result<Proposal, GovernanceError> {
        let proposal = self.load(id)?;
        if proposal.status != ProposalStatus::Revision {
            return Err(GovernanceError::InvalidTransition {
                id: id.to_string(),
                reason: format!("status is {}, must be revision", proposal.status),
            });
        }
        self.apply_status(proposal, ProposalStatus::Discussion, now)
    }

    /// discussion|revision → (voting, voting); opens a voting session whose
    /// deadline is exactly `deadline`.
    pub fn move_to_voting(
        &self,
        id: &ProposalId,
        deadline: Timestamp,
        overrides: Option<&VotingConfigOverride>,
        now: Timestamp,
    ) -> Result<VotingSession, GovernanceError> {
        let proposal = self.load(id)?;
        let has_session = self.engine.active_session(id)?.is_some();
        self.guard(&proposal, ProposalPhase::Voting, Some(deadline), has_session, now)?;

        let merged = overrides
            .cloned()
            .unwrap_or_default()
            .with_deadline(deadline, now);
        let session = self.engine.initiate(id, Some(&merged), now)?;

        let mut proposal = proposal;
        proposal.voting_deadline = Some(deadline);
        proposal.set_status(ProposalStatus::Voting, now);
        self.proposals.put_proposal(&proposal)?;

        tracing::info!(proposal = %id, session = %session.id, %deadline, "proposal moved to voting");
        Ok(session)
    }

    /// voting → (approved|rejected, resolution), from the session's verdict.
    pub fn finalize_voting(
        &self,
        id: &ProposalId,
        now: Timestamp,
    ) -> Result<VotingResults, GovernanceError> {
        let proposal = self.load(id)?;
        let session = self.engine.active_session(id)?;
        self.guard(
            &proposal,
            ProposalPhase::Resolution,
            None,
            session.is_some(),
            now,
        )?;
        let session = match session {
            Some(s) => s,
            // Unreachable past the guard; keep the error typed anyway.
            None => {
                return Err(GovernanceError::InvalidState {
                    id: id.to_string(),
                    reason: "no active voting session".into(),
                })
            }
        };

        let results = self.engine.finalize(&session.id, now)?;
        let status = match results.outcome {
            VoteOutcome::Approved => ProposalStatus::Approved,
            _ => ProposalStatus::Rejected,
        };
        self.apply_status(proposal, status, now)?;
        Ok(results)
    }

    /// approved → (executed, execution).
    pub fn mark_executed(
        &self,
        id: &ProposalId,
        execution_data: Option<String>,
        now: Timestamp,
    ) -> Result<Proposal, GovernanceError> {
        let proposal = self.load(id)?;
        self.guard(&proposal, ProposalPhase::Execution, None, false, now)?;

        let mut proposal = proposal;
        proposal.execution_data = execution_data;
        self.apply_status(proposal, ProposalStatus::Executed, now)
    }

    /// Delete a draft. Anything past draft is permanent.
    pub fn delete_proposal(&self, id: &ProposalId) -> Result<(), GovernanceError> {
        let proposal = self.load(id)?;
        if let Some(reason) = transition::delete_reason(&proposal) {
            return Err(GovernanceError::InvalidState {
                id: id.to_string(),
                reason,
            });
        }
        self.proposals.delete_proposal(id)?;
        tracing::info!(proposal = %id, "draft proposal deleted");
        Ok(())
    }

    /// Pre-flight a transition without mutating anything.
    ///
    /// Runs exactly the guards the mutating operations run. `deadline` is
    /// the planned voting deadline; only consulted for the voting phase.
    pub fn can_advance_phase(
        &self,
        id: &ProposalId,
        target: ProposalPhase,
        deadline: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<AdvanceCheck, GovernanceError> {
        let proposal = self.load(id)?;
        let has_session = self.engine.active_session(id)?.is_some();
        let reasons = transition::advance_reasons(&proposal, target, deadline, has_session, now);
        Ok(AdvanceCheck::from_reasons(reasons))
    }

    /// The voting engine this machine drives.
    pub fn engine(&self) -> &VotingEngine {
        &self.engine
    }

    fn load(&self, id: &ProposalId) -> Result<Proposal, GovernanceError> {
        self.proposals.get_proposal(id).map_err(|e| match e {
            StoreError::NotFound(_) => GovernanceError::ProposalNotFound(id.to_string()),
            other => GovernanceError::Store(other),
        })
    }

    fn guard(
        &self,
        proposal: &Proposal,
        target: ProposalPhase,
        deadline: Option<Timestamp>,
        has_active_session: bool,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let reasons =
            transition::advance_reasons(proposal, target, deadline, has_active_session, now);
        if reasons.is_empty() {
            Ok(())
        } else {
            Err(GovernanceError::InvalidTransition {
                id: proposal.id.to_string(),
                reason: reasons.join("; "),
            })
        }
    }

    fn advance_simple(
        &self,
        id: &ProposalId,
        target: ProposalPhase,
        status: ProposalStatus,
        now: Timestamp,
    ) -> Result<Proposal, GovernanceError> {
        let proposal = self.load(id)?;
        self.guard(&proposal, target, None, false, now)?;
        self.apply_status(proposal, status, now)
    }

    fn apply_status(
        &self,
        mut proposal: Proposal,
        status: ProposalStatus,
        now: Timestamp,
    ) -> Result<Proposal, GovernanceError> {
        let from = proposal.status;
        proposal.set_status(status, now);
        self.proposals.put_proposal(&proposal)?;
        tracing::info!(
            proposal = %proposal.id,
            from = %from,
            to = %status,
            phase = %proposal.phase,
            "proposal transitioned"
        );
        Ok(proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accord_audit::AuditLedger;
    use accord_nullables::{NullAgentDirectory, NullStore};
    use accord_types::{AgentId, AgentProfile, AgentRole, VoteDecision};

    struct Fixture {
        store: Arc<NullStore>,
        machine: PhaseStateMachine,
    }

    fn fixture(n_voters: usize) -> Fixture {
        let store = Arc::new(NullStore::new());
        let directory = Arc::new(NullAgentDirectory::with_agents(
            (0..n_voters).map(|i| AgentProfile::new(format!("agent-{i}"), [AgentRole::Voter])),
        ));
        let engine = Arc::new(VotingEngine::new(
            store.clone(),
            store.clone(),
            directory,
            AuditLedger::new(store.clone()),
        ));
        let machine = PhaseStateMachine::new(store.clone(), engine);
        Fixture { store, machine }
    }

    fn ts(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn pid() -> ProposalId {
        ProposalId::new("P001")
    }

    fn draft(fx: &Fixture) -> ProposalId {
        fx.machine
            .create_proposal("P001", "title", "author-1", "content", ts(100))
            .unwrap()
            .id
    }

    #[test]
    fn create_rejects_duplicate_id() {
        let fx = fixture(1);
        draft(&fx);
        assert!(matches!(
            fx.machine
                .create_proposal("P001", "t2", "a2", "c2", ts(110)),
            Err(GovernanceError::InvalidState { .. })
        ));
    }

    #[test]
    fn submit_only_from_draft() {
        let fx = fixture(1);
        let id = draft(&fx);

        let p = fx.machine.submit_for_discussion(&id, ts(110)).unwrap();
        assert_eq!(p.status, ProposalStatus::Discussion);
        assert_eq!(p.phase, ProposalPhase::Discussion);

        match fx.machine.submit_for_discussion(&id, ts(120)) {
            Err(GovernanceError::InvalidTransition { reason, .. }) => {
                assert!(reason.contains("must be draft"));
            }
            other => panic!("expected InvalidTransition, got {:?}", other),
        }
    }

    #[test]
    fn revision_loop_round_trips() {
        let fx = fixture(1);
        let id = draft(&fx);
        fx.machine.submit_for_discussion(&id, ts(110)).unwrap();

        let p = fx.machine.move_to_revision(&id, ts(120)).unwrap();
        assert_eq!(p.status, ProposalStatus::Revision);

        let p = fx.machine.reopen_discussion(&id, ts(130)).unwrap();
        assert_eq!(p.status, ProposalStatus::Discussion);

        // Not from discussion.
        assert!(fx.machine.reopen_discussion(&id, ts(140)).is_err());
    }

    #[test]
    fn move_to_voting_requires_future_deadline() {
        let fx = fixture(2);
        let id = draft(&fx);
        fx.machine.submit_for_discussion(&id, ts(110)).unwrap();

        match fx.machine.move_to_voting(&id, ts(110), None, ts(120)) {
            Err(GovernanceError::InvalidTransition { reason, .. }) => {
                assert!(reason.contains("not in the future"));
            }
            other => panic!("expected InvalidTransition, got {:?}", other),
        }
    }

    #[test]
    fn move_to_voting_opens_session_with_exact_deadline() {
        let fx = fixture(3);
        let id = draft(&fx);
        fx.machine.submit_for_discussion(&id, ts(110)).unwrap();

        let session = fx
            .machine
            .move_to_voting(&id, ts(1000), None, ts(120))
            .unwrap();
        assert_eq!(session.deadline, ts(1000));
        assert_eq!(session.eligible_agents.len(), 3);

        let p = fx.store.get_proposal(&pid()).unwrap();
        assert_eq!(p.status, ProposalStatus::Voting);
        assert_eq!(p.voting_deadline, Some(ts(1000)));
    }

    #[test]
    fn move_to_voting_merges_overrides_and_deadline_wins() {
        let fx = fixture(2);
        let id = draft(&fx);
        fx.machine.submit_for_discussion(&id, ts(110)).unwrap();

        let overrides = VotingConfigOverride {
            quorum_threshold: Some(0.5),
            duration_secs: Some(10),
            ..VotingConfigOverride::default()
        };
        let session = fx
            .machine
            .move_to_voting(&id, ts(1000), Some(&overrides), ts(120))
            .unwrap();
        // Caller overrides survive, but the deadline supersedes any duration.
        assert_eq!(session.deadline, ts(1000));
        assert_eq!(session.config.quorum_threshold, 0.5);
    }

    #[test]
    fn move_to_voting_from_revision() {
        let fx = fixture(1);
        let id = draft(&fx);
        fx.machine.submit_for_discussion(&id, ts(110)).unwrap();
        fx.machine.move_to_revision(&id, ts(120)).unwrap();

        assert!(fx
            .machine
            .move_to_voting(&id, ts(1000), None, ts(130))
            .is_ok());
    }

    #[test]
    fn finalize_sets_status_from_verdict() {
        let fx = fixture(2);
        let id = draft(&fx);
        fx.machine.submit_for_discussion(&id, ts(110)).unwrap();
        let session = fx
            .machine
            .move_to_voting(&id, ts(1000), None, ts(120))
            .unwrap();

        // Both voters approve: participation 1.0, consensus 100%.
        for agent in ["agent-0", "agent-1"] {
            fx.machine
                .engine()
                .cast_vote(
                    &session.id,
                    &AgentId::new(agent),
                    VoteDecision::Approve,
                    None,
                    ts(200),
                )
                .unwrap();
        }

        let results = fx.machine.finalize_voting(&id, ts(300)).unwrap();
        assert_eq!(results.outcome, VoteOutcome::Approved);
        let p = fx.store.get_proposal(&pid()).unwrap();
        assert_eq!(p.status, ProposalStatus::Approved);
        assert_eq!(p.phase, ProposalPhase::Resolution);
    }

    #[test]
    fn finalize_empty_session_rejects_proposal() {
        let fx = fixture(2);
        let id = draft(&fx);
        fx.machine.submit_for_discussion(&id, ts(110)).unwrap();
        fx.machine.move_to_voting(&id, ts(1000), None, ts(120)).unwrap();

        let results = fx.machine.finalize_voting(&id, ts(2000)).unwrap();
        assert_eq!(results.outcome, VoteOutcome::Rejected);
        let p = fx.store.get_proposal(&pid()).unwrap();
        assert_eq!(p.status, ProposalStatus::Rejected);
    }

    #[test]
    fn finalize_without_session_fails() {
        let fx = fixture(1);
        let id = draft(&fx);
        fx.machine.submit_for_discussion(&id, ts(110)).unwrap();

        assert!(matches!(
            fx.machine.finalize_voting(&id, ts(120)),
            Err(GovernanceError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn mark_executed_only_from_approved() {
        let fx = fixture(1);
        let id = draft(&fx);
        fx.machine.submit_for_discussion(&id, ts(110)).unwrap();
        let session = fx
            .machine
            .move_to_voting(&id, ts(1000), None, ts(120))
            .unwrap();
        fx.machine
            .engine()
            .cast_vote(
                &session.id,
                &AgentId::new("agent-0"),
                VoteDecision::Approve,
                None,
                ts(130),
            )
            .unwrap();
        fx.machine.finalize_voting(&id, ts(140)).unwrap();

        let p = fx
            .machine
            .mark_executed(&id, Some("applied config change".into()), ts(150))
            .unwrap();
        assert_eq!(p.status, ProposalStatus::Executed);
        assert_eq!(p.phase, ProposalPhase::Execution);
        assert_eq!(p.execution_data.as_deref(), Some("applied config change"));

        // Terminal: a second execution attempt fails.
        assert!(fx.machine.mark_executed(&id, None, ts(160)).is_err());
    }

    #[test]
    fn rejected_proposal_cannot_be_executed() {
        let fx = fixture(2);
        let id = draft(&fx);
        fx.machine.submit_for_discussion(&id, ts(110)).unwrap();
        fx.machine.move_to_voting(&id, ts(1000), None, ts(120)).unwrap();
        fx.machine.finalize_voting(&id, ts(130)).unwrap(); // empty → rejected

        assert!(matches!(
            fx.machine.mark_executed(&id, None, ts(140)),
            Err(GovernanceError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn delete_only_drafts() {
        let fx = fixture(1);
        let id = draft(&fx);
        fx.machine.delete_proposal(&id).unwrap();
        assert!(fx.store.get_proposal(&pid()).is_err());

        let id = draft(&fx);
        fx.machine.submit_for_discussion(&id, ts(110)).unwrap();
        assert!(matches!(
            fx.machine.delete_proposal(&id),
            Err(GovernanceError::InvalidState { .. })
        ));
    }

    #[test]
    fn can_advance_agrees_with_mutating_operations() {
        let fx = fixture(1);
        let id = draft(&fx);

        let check = fx
            .machine
            .can_advance_phase(&id, ProposalPhase::Discussion, None, ts(110))
            .unwrap();
        assert!(check.can_advance);
        assert!(check.reasons.is_empty());

        let check = fx
            .machine
            .can_advance_phase(&id, ProposalPhase::Voting, Some(ts(1000)), ts(110))
            .unwrap();
        assert!(!check.can_advance);

        // And the mutating op agrees.
        assert!(fx.machine.move_to_voting(&id, ts(1000), None, ts(110)).is_err());
        assert!(fx.machine.submit_for_discussion(&id, ts(110)).is_ok());
    }

    #[test]
    fn unknown_proposal_reported() {
        let fx = fixture(1);
        assert!(matches!(
            fx.machine.submit_for_discussion(&ProposalId::new("P404"), ts(100)),
            Err(GovernanceError::ProposalNotFound(_))
        ));
    }

    /// A proposal store whose reads and writes all fail at the backend.
    struct BrokenStore;

    impl ProposalStore for BrokenStore {
        fn get_proposal(&self, _: &ProposalId) -> Result<Proposal, StoreError> {
            Err(StoreError::Backend("store offline".into()))
        }
        fn put_proposal(&self, _: &Proposal) -> Result<(), StoreError> {
            Err(StoreError::Backend("store offline".into()))
        }
        fn delete_proposal(&self, _: &ProposalId) -> Result<(), StoreError> {
            Err(StoreError::Backend("store offline".into()))
        }
        fn list_proposals(&self) -> Result<Vec<Proposal>, StoreError> {
            Err(StoreError::Backend("store offline".into()))
        }
    }

    #[test]
    fn backend_failure_surfaces_as_store_error() {
        let store = Arc::new(NullStore::new());
        let proposals = Arc::new(BrokenStore);
        let engine = Arc::new(VotingEngine::new(
            proposals.clone(),
            store.clone(),
            Arc::new(NullAgentDirectory::new()),
            AuditLedger::new(store),
        ));
        let machine = PhaseStateMachine::new(proposals, engine);

        // A backend outage is not "id is free": creation must not proceed.
        match machine.create_proposal("P001", "t", "a", "c", ts(100)) {
            Err(GovernanceError::Store(StoreError::Backend(_))) => {}
            other => panic!("expected Store(Backend), got {:?}", other),
        }
        // Nor is it "proposal not found".
        match machine.submit_for_discussion(&pid(), ts(100)) {
            Err(GovernanceError::Store(StoreError::Backend(_))) => {}
            other => panic!("expected Store(Backend), got {:?}", other),
        }
    }
}
