//! Audit chain storage trait.

use crate::StoreError;
use accord_types::{AuditChainEntry, EntryHash, SessionId};

/// Trait for storing audit chain entries.
///
/// Chains are per-session and append-only. The entry's `hash` and
/// `previous_hash` are computed by the ledger before the append, so the
/// stored row carries its own tamper evidence.
pub trait AuditStore {
    /// Append an entry to its session's chain.
    fn append_entry(&self, entry: &AuditChainEntry) -> Result<(), StoreError>;

    /// The full chain for a session, in append order.
    fn chain(&self, session: &SessionId) -> Result<Vec<AuditChainEntry>, StoreError>;

    /// The hash of the most recently appended entry, if any.
    fn tip(&self, session: &SessionId) -> Result<Option<EntryHash>, StoreError>;
}
