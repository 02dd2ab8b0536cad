//! Abstract storage and collaborator traits for the accord pipeline.
//!
//! Every backend (relational, key-value, in-memory for testing) implements
//! these traits. The voting engine and state machine depend only on the
//! traits, and every mutation is durable through the trait before the
//! corresponding operation returns.

pub mod agents;
pub mod audit;
pub mod error;
pub mod proposal;
pub mod session;

pub use agents::AgentDirectory;
pub use audit::AuditStore;
pub use error::StoreError;
pub use proposal::ProposalStore;
pub use session::SessionStore;
