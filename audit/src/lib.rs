//! Hash-linked, append-only audit ledger for voting sessions.
//!
//! Every session open and every vote cast appends one entry to the session's
//! chain. Hashes are computed and persisted at write time, so `verify` checks
//! the immutably stored rows rather than a reconstruction — editing any
//! historical row breaks the chain at that index.
//!
//! This is tamper *detection* under a single ledger authority, not tamper
//! prevention against the ledger owner; there are no signatures here.

pub mod error;
pub mod ledger;

pub use error::AuditError;
pub use ledger::{AuditLedger, VerificationResult};
