//! Proposal storage trait.

use crate::StoreError;
use accord_types::{Proposal, ProposalId};

/// Trait for storing proposals.
pub trait ProposalStore {
    /// Get a proposal by id.
    fn get_proposal(&self, id: &ProposalId) -> Result<Proposal, StoreError>;

    /// Store or overwrite a proposal.
    fn put_proposal(&self, proposal: &Proposal) -> Result<(), StoreError>;

    /// Delete a proposal. Only legal for drafts; the state machine enforces
    /// that before calling.
    fn delete_proposal(&self, id: &ProposalId) -> Result<(), StoreError>;

    /// List every stored proposal.
    fn list_proposals(&self) -> Result<Vec<Proposal>, StoreError>;
}
