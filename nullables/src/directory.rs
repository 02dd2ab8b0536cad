//! Nullable agent directory — canned active agents for testing.

use accord_store::{AgentDirectory, StoreError};
use accord_types::{AgentId, AgentProfile, AgentRole};
use std::collections::BTreeSet;
use std::sync::Mutex;

/// An in-memory agent directory.
///
/// Holds only active agents; deactivation is modeled by removal.
pub struct NullAgentDirectory {
    agents: Mutex<Vec<AgentProfile>>,
}

impl NullAgentDirectory {
    pub fn new() -> Self {
        Self {
            agents: Mutex::new(Vec::new()),
        }
    }

    pub fn with_agents(agents: impl IntoIterator<Item = AgentProfile>) -> Self {
        Self {
            agents: Mutex::new(agents.into_iter().collect()),
        }
    }

    pub fn add_agent(&self, profile: AgentProfile) {
        self.agents.lock().unwrap().push(profile);
    }

    /// Remove an agent, modeling deactivation after a snapshot was taken.
    pub fn remove_agent(&self, id: &AgentId) {
        self.agents.lock().unwrap().retain(|a| &a.id != id);
    }
}

impl Default for NullAgentDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentDirectory for NullAgentDirectory {
    fn list_active_agents(
        &self,
        role_filter: &BTreeSet<AgentRole>,
    ) -> Result<Vec<AgentProfile>, StoreError> {
        Ok(self
            .agents
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.matches_roles(role_filter))
            .cloned()
            .collect())
    }

    fn get_agent(&self, id: &AgentId) -> Result<Option<AgentProfile>, StoreError> {
        Ok(self
            .agents
            .lock()
            .unwrap()
            .iter()
            .find(|a| &a.id == id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_filter_excludes_non_matching_agents() {
        let dir = NullAgentDirectory::with_agents([
            AgentProfile::new("v1", [AgentRole::Voter]),
            AgentProfile::new("r1", [AgentRole::Reviewer]),
            AgentProfile::new("o1", [AgentRole::Observer]),
        ]);

        let filter: BTreeSet<_> = [AgentRole::Voter, AgentRole::Reviewer].into_iter().collect();
        let active = dir.list_active_agents(&filter).unwrap();
        let ids: Vec<_> = active.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["v1", "r1"]);
    }

    #[test]
    fn removed_agent_no_longer_listed() {
        let dir = NullAgentDirectory::with_agents([AgentProfile::new("v1", [AgentRole::Voter])]);
        dir.remove_agent(&AgentId::new("v1"));
        let filter: BTreeSet<_> = [AgentRole::Voter].into_iter().collect();
        assert!(dir.list_active_agents(&filter).unwrap().is_empty());
        assert!(dir.get_agent(&AgentId::new("v1")).unwrap().is_none());
    }
}
