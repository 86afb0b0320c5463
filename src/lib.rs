//! # Pari-Mutuel Escrow Engine
//!
//! Escrow and settlement for a betting pool with two or more outcomes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PARI-MUTUEL ENGINE                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives                │
//! │  ├── ids.rs        - Address and Outcome identifiers         │
//! │  ├── amount.rs     - Integer amounts, pro-rata arithmetic    │
//! │  └── hash.rs       - State hashing for verification          │
//! │                                                              │
//! │  ledger/           - Round lifecycle                         │
//! │  ├── registry.rs   - Outcome registry and pool totals        │
//! │  ├── roles.rs      - Owner / arbiter                         │
//! │  ├── bets.rs       - Bet ledger                              │
//! │  ├── settlement.rs - One-shot decision and payouts           │
//! │  ├── credits.rs    - Withdrawal ledger                       │
//! │  ├── events.rs     - Observable events                       │
//! │  └── engine.rs     - BettingEngine                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - Integer arithmetic only; payouts round down, never up
//! - BTreeMap everywhere state is iterated, so hashes are reproducible
//! - Every operation is all-or-nothing
//! - Funds held always equal open stakes + credits + rounding residual

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod ledger;

// Re-export commonly used types
pub use self::core::{Address, Amount, Outcome, StateHash};
pub use ledger::{
    BettingEngine, BettingError, EngineConfig, EngineEvent, EventData, PayoutSink,
    RecordingSink, ResidualPolicy,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
