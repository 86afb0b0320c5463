//! Withdrawal Ledger
//!
//! Withdrawable balances owed after settlement, and the payout seam.
//!
//! ## Transfer Discipline
//!
//! ```text
//! 1. check    caller has credit, amount <= credit
//! 2. debit    credit -= amount            (state first)
//! 3. transfer sink.transfer(caller, amount)
//! 4. on error credit += amount, fail      (all-or-nothing)
//! ```
//!
//! The debit is committed before the external transfer is attempted. If
//! the sink reports an error the debit is restored, so a failed withdrawal
//! leaves the balance where it was.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{checked_sum, Address, Amount};
use crate::ledger::error::{BettingError, Result};

/// External transfer step for withdrawals.
pub trait PayoutSink {
    /// Move `amount` out of custody to `to`. An error aborts the withdrawal.
    fn transfer(&mut self, to: &Address, amount: Amount) -> std::result::Result<(), String>;
}

/// Credit balances by address.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CreditLedger {
    credits: BTreeMap<Address, Amount>,
}

impl CreditLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current credit of `addr` (0 if none).
    pub fn balance_of(&self, addr: &Address) -> Amount {
        self.credits.get(addr).copied().unwrap_or(0)
    }

    /// Add credit. Zero amounts leave no entry.
    pub fn credit(&mut self, addr: Address, amount: Amount) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let current = self.balance_of(&addr);
        let updated = current.checked_add(amount).ok_or(BettingError::Overflow)?;
        self.credits.insert(addr, updated);
        Ok(())
    }

    /// Apply a batch of credits, all or none.
    pub fn credit_all(&mut self, payouts: &[(Address, Amount)]) -> Result<()> {
        let mut staged = self.clone();
        for (addr, amount) in payouts {
            staged.credit(*addr, *amount)?;
        }
        *self = staged;
        Ok(())
    }

    /// Validate a withdrawal without mutating.
    pub fn check_debit(&self, addr: &Address, amount: Amount) -> Result<()> {
        let available = self.balance_of(addr);
        if available == 0 {
            return Err(BettingError::Unauthorized {
                caller: *addr,
                action: "withdraw without credit",
            });
        }
        if amount > available {
            return Err(BettingError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    /// Reduce credit. Entries that reach zero are removed.
    pub fn debit(&mut self, addr: &Address, amount: Amount) -> Result<()> {
        self.check_debit(addr, amount)?;
        let remaining = self.balance_of(addr) - amount;
        if remaining == 0 {
            self.credits.remove(addr);
        } else {
            self.credits.insert(*addr, remaining);
        }
        Ok(())
    }

    /// Sum of all outstanding credit.
    pub fn total(&self) -> Amount {
        // every credit is backed by custody, which is itself an Amount
        checked_sum(self.credits.values().copied()).unwrap_or(Amount::MAX)
    }

    /// Nonzero balances, ordered by address.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.credits.iter()
    }
}

// =============================================================================
// RECORDING SINK
// =============================================================================

/// In-memory sink that records transfers and can be told to refuse them.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    /// Transfers accepted so far
    pub transfers: Vec<(Address, Amount)>,
    /// When set, every transfer fails with this message
    pub fail_with: Option<String>,
}

impl RecordingSink {
    /// Sink that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that refuses everything.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            transfers: Vec::new(),
            fail_with: Some(reason.into()),
        }
    }

    /// Total paid to `addr`.
    pub fn paid_to(&self, addr: &Address) -> Amount {
        self.transfers
            .iter()
            .filter(|(to, _)| to == addr)
            .map(|(_, a)| *a)
            .sum()
    }
}

impl PayoutSink for RecordingSink {
    fn transfer(&mut self, to: &Address, amount: Amount) -> std::result::Result<(), String> {
        if let Some(reason) = &self.fail_with {
            return Err(reason.clone());
        }
        self.transfers.push((*to, amount));
        Ok(())
    }
}
