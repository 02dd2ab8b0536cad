//! Audit chain entry format.
//!
//! Entries form a singly linked hash chain per voting session, appended and
//! hashed at write time. Tampering with any stored entry breaks the chain at
//! that index.

use crate::hash::EntryHash;
use crate::id::SessionId;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of record an audit entry snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// The session-opening entry; always first in a chain.
    Session,
    /// A single cast vote.
    Vote,
}

impl EntryKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Vote => "vote",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One link in a session's audit chain.
///
/// `hash` covers `(id, kind, timestamp, data, previous_hash)`; the first
/// entry's `previous_hash` is the zero hash. Append-only, never mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditChainEntry {
    /// `session-<sessionId>` for session entries, the vote id for vote entries.
    pub id: String,
    pub kind: EntryKind,
    /// The session whose chain this entry belongs to.
    pub session: SessionId,
    pub timestamp: Timestamp,
    /// Canonical JSON snapshot of the source record at append time.
    pub data: String,
    pub hash: EntryHash,
    pub previous_hash: EntryHash,
}

impl AuditChainEntry {
    /// Whether this entry is the head of its chain.
    pub fn is_genesis(&self) -> bool {
        self.previous_hash.is_zero()
    }
}
