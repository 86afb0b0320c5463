//! Ledger Module
//!
//! The escrow engine and the components it sequences.
//!
//! ## Module Structure
//!
//! - `registry`: Outcome set and per-outcome pool totals
//! - `roles`: Owner and arbiter identities
//! - `bets`: One stake per bettor per round
//! - `settlement`: One-shot decision and pro-rata payouts
//! - `credits`: Withdrawable balances and the payout seam
//! - `events`: Observable state changes
//! - `engine`: `BettingEngine`, which owns all of the above

pub mod bets;
pub mod config;
pub mod credits;
pub mod engine;
pub mod error;
pub mod events;
pub mod registry;
pub mod roles;
pub mod settlement;

// Re-export key types
pub use bets::Bet;
pub use config::{EngineConfig, ResidualPolicy};
pub use credits::{PayoutSink, RecordingSink};
pub use engine::BettingEngine;
pub use error::{BettingError, Result};
pub use events::{EngineEvent, EventData};
pub use settlement::Decision;
