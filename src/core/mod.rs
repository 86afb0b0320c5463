//! Core deterministic primitives.
//!
//! Identities, integer amounts and state hashing. Everything the ledger
//! modules build on; nothing in here knows about rounds or roles.

pub mod amount;
pub mod hash;
pub mod ids;

// Re-export core types
pub use amount::{checked_sum, pro_rata, Amount};
pub use hash::{compute_state_hash, StateHash, StateHasher};
pub use ids::{Address, Outcome};
