//! Nullable store — thread-safe in-memory storage for testing.

use accord_store::{AuditStore, ProposalStore, SessionStore, StoreError};
use accord_types::{
    AgentId, AuditChainEntry, EntryHash, Proposal, ProposalId, SessionId, Vote, VotingSession,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory proposal + session + audit store for testing.
///
/// Implements every storage trait the core consumes, so one instance can back
/// a whole pipeline in tests. Thread-safe.
pub struct NullStore {
    proposals: Mutex<HashMap<String, Proposal>>,
    sessions: Mutex<HashMap<String, VotingSession>>,
    /// Votes per session, in cast order.
    votes: Mutex<HashMap<String, Vec<Vote>>>,
    /// Audit chains per session, in append order.
    chains: Mutex<HashMap<String, Vec<AuditChainEntry>>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            proposals: Mutex::new(HashMap::new()),
            sessions: Mutex::new(HashMap::new()),
            votes: Mutex::new(HashMap::new()),
            chains: Mutex::new(HashMap::new()),
        }
    }

    /// Overwrite a stored audit entry's data snapshot.
    ///
    /// Simulates after-the-fact tampering with a persisted row, for
    /// exercising chain verification.
    pub fn tamper_entry_data(&self, session: &SessionId, index: usize, data: &str) {
        let mut chains = self.chains.lock().unwrap();
        if let Some(chain) = chains.get_mut(session.as_str()) {
            if let Some(entry) = chain.get_mut(index) {
                entry.data = data.to_string();
            }
        }
    }

    /// Overwrite a stored audit entry's previous-hash link.
    pub fn tamper_entry_previous_hash(
        &self,
        session: &SessionId,
        index: usize,
        previous_hash: EntryHash,
    ) {
        let mut chains = self.chains.lock().unwrap();
        if let Some(chain) = chains.get_mut(session.as_str()) {
            if let Some(entry) = chain.get_mut(index) {
                entry.previous_hash = previous_hash;
            }
        }
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProposalStore for NullStore {
    fn get_proposal(&self, id: &ProposalId) -> Result<Proposal, StoreError> {
        self.proposals
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put_proposal(&self, proposal: &Proposal) -> Result<(), StoreError> {
        self.proposals
            .lock()
            .unwrap()
            .insert(proposal.id.to_string(), proposal.clone());
        Ok(())
    }

    fn delete_proposal(&self, id: &ProposalId) -> Result<(), StoreError> {
        self.proposals
            .lock()
            .unwrap()
            .remove(id.as_str())
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list_proposals(&self) -> Result<Vec<Proposal>, StoreError> {
        Ok(self.proposals.lock().unwrap().values().cloned().collect())
    }
}

impl SessionStore for NullStore {
    fn put_session(&self, session: &VotingSession) -> Result<(), StoreError> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.to_string(), session.clone());
        Ok(())
    }

    fn get_session(&self, id: &SessionId) -> Result<VotingSession, StoreError> {
        self.sessions
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn active_session_for_proposal(
        &self,
        proposal: &ProposalId,
    ) -> Result<Option<VotingSession>, StoreError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .values()
            .find(|s| &s.proposal == proposal && s.is_active())
            .cloned())
    }

    fn put_vote(&self, vote: &Vote) -> Result<(), StoreError> {
        let mut votes = self.votes.lock().unwrap();
        let session_votes = votes.entry(vote.session.to_string()).or_default();
        if session_votes.iter().any(|v| v.agent == vote.agent) {
            return Err(StoreError::Duplicate(vote.id.to_string()));
        }
        session_votes.push(vote.clone());
        Ok(())
    }

    fn get_vote(
        &self,
        session: &SessionId,
        agent: &AgentId,
    ) -> Result<Option<Vote>, StoreError> {
        Ok(self
            .votes
            .lock()
            .unwrap()
            .get(session.as_str())
            .and_then(|votes| votes.iter().find(|v| &v.agent == agent).cloned()))
    }

    fn votes_for_session(&self, session: &SessionId) -> Result<Vec<Vote>, StoreError> {
        Ok(self
            .votes
            .lock()
            .unwrap()
            .get(session.as_str())
            .cloned()
            .unwrap_or_default())
    }
}

impl AuditStore for NullStore {
    fn append_entry(&self, entry: &AuditChainEntry) -> Result<(), StoreError> {
        self.chains
            .lock()
            .unwrap()
            .entry(entry.session.to_string())
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    fn chain(&self, session: &SessionId) -> Result<Vec<AuditChainEntry>, StoreError> {
        Ok(self
            .chains
            .lock()
            .unwrap()
            .get(session.as_str())
            .cloned()
            .unwrap_or_default())
    }

    fn tip(&self, session: &SessionId) -> Result<Option<EntryHash>, StoreError> {
        Ok(self
            .chains
            .lock()
            .unwrap()
            .get(session.as_str())
            .and_then(|chain| chain.last())
            .map(|entry| entry.hash))
    }
}
