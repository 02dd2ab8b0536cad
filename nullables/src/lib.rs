//! Nullable infrastructure for deterministic testing.
//!
//! In-memory stand-ins for every collaborator the core depends on: a clock
//! that only moves when told to, thread-safe in-memory stores, and a canned
//! agent directory.

pub mod clock;
pub mod directory;
pub mod store;

pub use clock::NullClock;
pub use directory::NullAgentDirectory;
pub use store::NullStore;
