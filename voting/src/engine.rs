//! Voting engine — runs one session per proposal end-to-end.

use crate::consensus::{self, VotingResults};
use crate::error::VotingError;
use crate::locks::SessionLocks;
use crate::weight;
use accord_audit::AuditLedger;
use accord_store::{AgentDirectory, ProposalStore, SessionStore, StoreError};
use accord_types::{
    AgentId, ProposalId, ProposalPhase, SessionId, SessionStatus, Timestamp, Vote, VoteDecision,
    VotingConfig, VotingConfigOverride, VotingSession,
};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Owns the voting session lifecycle.
///
/// All state lives in the injected stores; the engine holds only the
/// per-session lock registry. A cast or finalize atomically performs its
/// guard checks and its write under the session's lock, so concurrent calls
/// against one session serialize and no write is ever lost.
pub struct VotingEngine {
    proposals: Arc<dyn ProposalStore + Send + Sync>,
    sessions: Arc<dyn SessionStore + Send + Sync>,
    agents: Arc<dyn AgentDirectory + Send + Sync>,
    ledger: AuditLedger,
    locks: SessionLocks,
}

impl VotingEngine {
    pub fn new(
        proposals: Arc<dyn ProposalStore + Send + Sync>,
        sessions: Arc<dyn SessionStore + Send + Sync>,
        agents: Arc<dyn AgentDirectory + Send + Sync>,
        ledger: AuditLedger,
    ) -> Self {
        Self {
            proposals,
            sessions,
            agents,
            ledger,
            locks: SessionLocks::new(),
        }
    }

    /// Open a voting session for a proposal.
    ///
    /// The proposal must be in the discussion or revision phase and must not
    /// already have an active session. Eligible agents are snapshotted here,
    /// once; later directory changes do not affect the session.
    pub fn initiate(
        &self,
        proposal_id: &ProposalId,
        overrides: Option<&VotingConfigOverride>,
        now: Timestamp,
    ) -> Result<VotingSession, VotingError> {
        let proposal = self.proposals.get_proposal(proposal_id).map_err(|e| match e {
            StoreError::NotFound(_) => VotingError::ProposalNotFound(proposal_id.to_string()),
            other => VotingError::Store(other),
        })?;

        if !matches!(
            proposal.phase,
            ProposalPhase::Discussion | ProposalPhase::Revision
        ) {
            return Err(VotingError::InvalidState(format!(
                "proposal {} is in the {} phase; voting can only start from discussion or revision",
                proposal_id, proposal.phase
            )));
        }

        if self
            .sessions
            .active_session_for_proposal(proposal_id)?
            .is_some()
        {
            return Err(VotingError::InvalidState(format!(
                "proposal {} already has an active voting session",
                proposal_id
            )));
        }

        let config = match overrides {
            Some(o) => VotingConfig::default().apply(o),
            None => VotingConfig::default(),
        };
        config.validate().map_err(VotingError::InvalidConfig)?;

        let eligible: BTreeSet<AgentId> = self
            .agents
            .list_active_agents(&config.allowed_roles)?
            .into_iter()
            .map(|a| a.id)
            .collect();

        let session = VotingSession::new(proposal_id.clone(), config, eligible, now);
        self.sessions.put_session(&session)?;
        self.ledger.append_session_entry(&session, now)?;

        tracing::info!(
            session = %session.id,
            proposal = %proposal_id,
            eligible = session.eligible_agents.len(),
            deadline = %session.deadline,
            duration = %accord_utils::format_duration(session.config.duration_secs),
            "voting session opened"
        );
        Ok(session)
    }

    /// Cast a vote.
    ///
    /// Guards, in order: the session must be active, the deadline must not
    /// have passed, the agent must be in the eligibility snapshot, and the
    /// agent must not have voted before. The checks and the append happen
    /// atomically under the session lock.
    pub fn cast_vote(
        &self,
        session_id: &SessionId,
        agent_id: &AgentId,
        decision: VoteDecision,
        justification: Option<String>,
        now: Timestamp,
    ) -> Result<Vote, VotingError> {
        let lock = self.locks.acquire(session_id);
        let _guard = lock.lock().unwrap();

        let session = self.load_session(session_id)?;

        if !session.is_active() {
            return Err(VotingError::SessionNotActive(session_id.to_string()));
        }
        if session.deadline_passed(now) {
            return Err(VotingError::DeadlinePassed {
                session: session_id.to_string(),
                deadline: session.deadline.to_string(),
            });
        }
        if !session.is_eligible(agent_id) {
            return Err(VotingError::NotEligible(agent_id.to_string()));
        }
        if self.sessions.get_vote(session_id, agent_id)?.is_some() {
            return Err(VotingError::DuplicateVote(agent_id.to_string()));
        }

        let weight = match self.agents.get_agent(agent_id)? {
            Some(profile) => weight::vote_weight(&profile),
            // Eligibility came from the snapshot; an agent deactivated since
            // then still votes, at the unprivileged default weight.
            None => weight::default_weight(),
        };

        let vote = Vote::new(
            session_id.clone(),
            agent_id.clone(),
            decision,
            weight,
            justification,
            now,
        );
        self.sessions.put_vote(&vote)?;
        self.ledger.append_vote_entry(&vote, now)?;

        tracing::debug!(
            session = %session_id,
            agent = %agent_id,
            decision = %decision,
            weight,
            "vote cast"
        );
        Ok(vote)
    }

    /// Current results for a session. Pure projection; never mutates.
    pub fn results(&self, session_id: &SessionId) -> Result<VotingResults, VotingError> {
        let session = self.load_session(session_id)?;
        let votes = self.sessions.votes_for_session(session_id)?;
        Ok(consensus::tally(&session, &votes))
    }

    /// Close a session and derive its verdict.
    ///
    /// Flips active → finalized exactly once: a second call observes the
    /// stored finalized status and fails with `AlreadyFinalized`, and the
    /// verdict never changes after the first call.
    pub fn finalize(
        &self,
        session_id: &SessionId,
        now: Timestamp,
    ) -> Result<VotingResults, VotingError> {
        let lock = self.locks.acquire(session_id);
        let _guard = lock.lock().unwrap();

        let mut session = self.load_session(session_id)?;

        match session.status {
            SessionStatus::Finalized => {
                return Err(VotingError::AlreadyFinalized(session_id.to_string()))
            }
            SessionStatus::Cancelled => {
                return Err(VotingError::SessionNotActive(session_id.to_string()))
            }
            SessionStatus::Active => {}
        }

        session.status = SessionStatus::Finalized;
        session.finalized_at = Some(now);
        self.sessions.put_session(&session)?;

        let votes = self.sessions.votes_for_session(session_id)?;
        let results = consensus::tally(&session, &votes);

        tracing::info!(
            session = %session_id,
            outcome = ?results.outcome,
            participation = results.participation_rate,
            consensus = results.consensus_percentage,
            "voting session finalized"
        );
        Ok(results)
    }

    /// Cancel an active session without deriving a verdict.
    ///
    /// The deadline-timeout path for sessions configured with
    /// `TimeoutBehavior::Cancel`.
    pub fn cancel(&self, session_id: &SessionId, now: Timestamp) -> Result<(), VotingError> {
        let lock = self.locks.acquire(session_id);
        let _guard = lock.lock().unwrap();

        let mut session = self.load_session(session_id)?;

        match session.status {
            SessionStatus::Finalized => {
                return Err(VotingError::AlreadyFinalized(session_id.to_string()))
            }
            SessionStatus::Cancelled => {
                return Err(VotingError::SessionNotActive(session_id.to_string()))
            }
            SessionStatus::Active => {}
        }

        session.status = SessionStatus::Cancelled;
        session.finalized_at = Some(now);
        self.sessions.put_session(&session)?;

        tracing::info!(session = %session_id, "voting session cancelled");
        Ok(())
    }

    /// The active session for a proposal, if one exists.
    pub fn active_session(
        &self,
        proposal: &ProposalId,
    ) -> Result<Option<VotingSession>, VotingError> {
        Ok(self.sessions.active_session_for_proposal(proposal)?)
    }

    /// The audit ledger this engine writes to.
    pub fn ledger(&self) -> &AuditLedger {
        &self.ledger
    }

    /// Load a session, keeping missing-record and backend failures distinct.
    fn load_session(&self, session_id: &SessionId) -> Result<VotingSession, VotingError> {
        self.sessions.get_session(session_id).map_err(|e| match e {
            StoreError::NotFound(_) => VotingError::SessionNotFound(session_id.to_string()),
            other => VotingError::Store(other),
        })
    }
}
