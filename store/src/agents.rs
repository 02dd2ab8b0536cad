//! Agent directory collaborator trait.

use crate::StoreError;
use accord_types::{AgentId, AgentProfile, AgentRole};
use std::collections::BTreeSet;

/// The injected agent directory.
///
/// The voting engine holds no agent state of its own beyond each session's
/// immutable eligibility snapshot; everything about who exists, which roles
/// they hold, and their performance history comes through this trait.
pub trait AgentDirectory {
    /// All currently active agents whose role set intersects `role_filter`.
    fn list_active_agents(
        &self,
        role_filter: &BTreeSet<AgentRole>,
    ) -> Result<Vec<AgentProfile>, StoreError>;

    /// A single agent's current profile, if the agent is active.
    fn get_agent(&self, id: &AgentId) -> Result<Option<AgentProfile>, StoreError>;
}
