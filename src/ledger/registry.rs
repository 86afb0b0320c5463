//! Outcome Registry
//!
//! The set of valid outcomes for the current round and the running stake
//! total on each. Immutable until reset.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::{checked_sum, Amount, Outcome};
use crate::ledger::config::EngineConfig;
use crate::ledger::error::{BettingError, Result};

/// Registered outcomes and per-outcome pool totals.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OutcomeRegistry {
    /// Registration order, as supplied by the deployer
    outcomes: Vec<Outcome>,
    /// Total staked per outcome (every registered outcome has an entry)
    totals: BTreeMap<Outcome, Amount>,
}

impl OutcomeRegistry {
    /// Validate and register an outcome set.
    ///
    /// Fails with `InvalidConfiguration` on duplicates or a size outside
    /// `[min_outcomes, max_outcomes]`.
    pub fn register(outcomes: &[Outcome], config: &EngineConfig) -> Result<Self> {
        if outcomes.len() < config.min_outcomes {
            return Err(BettingError::InvalidConfiguration(format!(
                "must register at least {} outcomes, got {}",
                config.min_outcomes,
                outcomes.len()
            )));
        }
        if outcomes.len() > config.max_outcomes {
            return Err(BettingError::InvalidConfiguration(format!(
                "at most {} outcomes may be registered, got {}",
                config.max_outcomes,
                outcomes.len()
            )));
        }

        let mut seen = BTreeSet::new();
        for outcome in outcomes {
            if !seen.insert(*outcome) {
                return Err(BettingError::InvalidConfiguration(format!(
                    "duplicate outcome {}",
                    outcome
                )));
            }
        }

        Ok(Self {
            outcomes: outcomes.to_vec(),
            totals: outcomes.iter().map(|o| (*o, 0)).collect(),
        })
    }

    /// Is the outcome registered this round?
    #[inline]
    pub fn contains(&self, outcome: &Outcome) -> bool {
        self.totals.contains_key(outcome)
    }

    /// Fail with `InvalidOutcome` unless registered.
    pub fn require(&self, outcome: &Outcome) -> Result<()> {
        if self.contains(outcome) {
            Ok(())
        } else {
            Err(BettingError::InvalidOutcome(*outcome))
        }
    }

    /// Total staked on one outcome.
    pub fn total_staked(&self, outcome: &Outcome) -> Result<Amount> {
        self.totals
            .get(outcome)
            .copied()
            .ok_or(BettingError::InvalidOutcome(*outcome))
    }

    /// Total staked across every outcome (the full pool).
    pub fn total_pool(&self) -> Amount {
        // add_stake keeps every running total and their sum in range
        checked_sum(self.totals.values().copied()).unwrap_or(Amount::MAX)
    }

    /// Check that `amount` can be added to `outcome` without overflowing
    /// either the outcome total or the pool.
    pub fn check_stake(&self, outcome: &Outcome, amount: Amount) -> Result<()> {
        let current = self.total_staked(outcome)?;
        current.checked_add(amount).ok_or(BettingError::Overflow)?;
        self.total_pool()
            .checked_add(amount)
            .ok_or(BettingError::Overflow)?;
        Ok(())
    }

    /// Add a stake to an outcome's total. Call `check_stake` first.
    pub fn add_stake(&mut self, outcome: &Outcome, amount: Amount) -> Result<()> {
        self.check_stake(outcome, amount)?;
        if let Some(total) = self.totals.get_mut(outcome) {
            *total += amount;
        }
        Ok(())
    }

    /// Registered outcomes in registration order.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Per-outcome totals, ordered by outcome id.
    pub fn totals(&self) -> impl Iterator<Item = (&Outcome, &Amount)> {
        self.totals.iter()
    }

    /// No outcomes registered (between reset and the next round).
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Forget all outcomes and totals.
    pub fn clear(&mut self) {
        self.outcomes.clear();
        self.totals.clear();
    }
}
