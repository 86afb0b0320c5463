//! Ledger errors.
//!
//! Every failing operation leaves the engine untouched; the variant tells the
//! caller which rule rejected it.

use crate::core::{Address, Amount, Outcome};

/// Errors returned by engine operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BettingError {
    /// Bad setup parameters (outcome set, stake size, missing arbiter).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Caller does not hold the role the operation requires.
    #[error("{caller} is not authorized to {action}")]
    Unauthorized {
        /// Who called.
        caller: Address,
        /// What they attempted.
        action: &'static str,
    },

    /// Role exclusivity would be violated.
    #[error("invalid role: {0}")]
    InvalidRole(String),

    /// Operation not allowed in the current lifecycle phase.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Outcome is not registered for the current round.
    #[error("outcome not registered: {0}")]
    InvalidOutcome(Outcome),

    /// Bettor already staked this round.
    #[error("{0} has already placed a bet this round")]
    DuplicateAction(Address),

    /// Withdrawal exceeds the caller's credit.
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Amount asked for.
        requested: Amount,
        /// Current credit.
        available: Amount,
    },

    /// Payout sink refused the transfer; the debit was rolled back.
    #[error("transfer failed: {0}")]
    TransferFailed(String),

    /// Amount arithmetic exceeded the representable range.
    #[error("amount overflow")]
    Overflow,
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, BettingError>;
