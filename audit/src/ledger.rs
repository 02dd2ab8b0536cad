//! The audit ledger: append and verify hash-linked entries.

use crate::error::AuditError;
use accord_store::AuditStore;
use accord_types::{
    AuditChainEntry, EntryHash, EntryKind, SessionId, Timestamp, Vote, VotingSession,
};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use std::sync::Arc;

type Blake2b256 = Blake2b<U32>;

/// Outcome of verifying a session's audit chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationResult {
    /// Every entry's hash matches its recorded fields and its link to the
    /// previous entry.
    Verified { entries: usize },
    /// The chain is broken at `index` (0-based, in append order).
    Mismatch { index: usize, reason: String },
}

impl VerificationResult {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }
}

/// Append-only, hash-linked record of session and vote events.
///
/// One chain per voting session: the session entry first, then one entry per
/// vote in cast order. Each entry's `previous_hash` is the stored chain tip
/// at append time.
pub struct AuditLedger {
    store: Arc<dyn AuditStore + Send + Sync>,
}

impl AuditLedger {
    pub fn new(store: Arc<dyn AuditStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Append the session-opening entry for a freshly started session.
    pub fn append_session_entry(
        &self,
        session: &VotingSession,
        now: Timestamp,
    ) -> Result<AuditChainEntry, AuditError> {
        let data = canonical_snapshot(session)?;
        let id = format!("session-{}", session.id);
        self.append(id, EntryKind::Session, session.id.clone(), data, now)
    }

    /// Append an entry for a cast vote, chained to the current tip.
    pub fn append_vote_entry(
        &self,
        vote: &Vote,
        now: Timestamp,
    ) -> Result<AuditChainEntry, AuditError> {
        let data = canonical_snapshot(vote)?;
        self.append(
            vote.id.as_str().to_string(),
            EntryKind::Vote,
            vote.session.clone(),
            data,
            now,
        )
    }

    fn append(
        &self,
        id: String,
        kind: EntryKind,
        session: SessionId,
        data: String,
        now: Timestamp,
    ) -> Result<AuditChainEntry, AuditError> {
        let previous_hash = self.store.tip(&session)?.unwrap_or(EntryHash::ZERO);
        let hash = entry_hash(&id, kind, now, &data, &previous_hash);
        let entry = AuditChainEntry {
            id,
            kind,
            session,
            timestamp: now,
            data,
            hash,
            previous_hash,
        };
        self.store.append_entry(&entry)?;
        tracing::debug!(entry = %entry.id, session = %entry.session, "audit entry appended");
        Ok(entry)
    }

    /// The full chain for a session: session entry, then votes in cast order.
    pub fn chain(&self, session: &SessionId) -> Result<Vec<AuditChainEntry>, AuditError> {
        Ok(self.store.chain(session)?)
    }

    /// Recompute every entry's hash from its stored fields and check the
    /// links between consecutive entries.
    ///
    /// Returns the index of the first mismatch, if any.
    pub fn verify(&self, session: &SessionId) -> Result<VerificationResult, AuditError> {
        let entries = self.store.chain(session)?;
        let mut expected_previous = EntryHash::ZERO;

        for (index, entry) in entries.iter().enumerate() {
            if entry.previous_hash != expected_previous {
                return Ok(VerificationResult::Mismatch {
                    index,
                    reason: format!(
                        "previous hash {} does not match predecessor hash {}",
                        entry.previous_hash, expected_previous
                    ),
                });
            }

            let recomputed = entry_hash(
                &entry.id,
                entry.kind,
                entry.timestamp,
                &entry.data,
                &entry.previous_hash,
            );
            if recomputed != entry.hash {
                return Ok(VerificationResult::Mismatch {
                    index,
                    reason: format!(
                        "recorded hash {} does not match recomputed {}",
                        entry.hash, recomputed
                    ),
                });
            }

            expected_previous = entry.hash;
        }

        Ok(VerificationResult::Verified {
            entries: entries.len(),
        })
    }
}

/// Deterministic digest of an entry's identifying fields.
fn entry_hash(
    id: &str,
    kind: EntryKind,
    timestamp: Timestamp,
    data: &str,
    previous: &EntryHash,
) -> EntryHash {
    let mut hasher = Blake2b256::new();
    hasher.update(id.as_bytes());
    hasher.update(kind.name().as_bytes());
    hasher.update(timestamp.as_secs().to_le_bytes());
    hasher.update(data.as_bytes());
    hasher.update(previous.as_bytes());
    let result = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&result);
    EntryHash::new(out)
}

/// Canonical JSON snapshot of a record as it stood at append time.
///
/// Struct fields serialize in declaration order and map keys are sorted
/// (`BTreeMap`/`BTreeSet` throughout the record types), so equal records
/// always produce byte-identical snapshots.
fn canonical_snapshot<T: serde::Serialize>(record: &T) -> Result<String, AuditError> {
    serde_json::to_string(record).map_err(|e| AuditError::Snapshot(e.to_string()))
}
