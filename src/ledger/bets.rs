//! Bet Ledger
//!
//! One stake per bettor per round. Keeps arrival order for listing and a
//! BTreeMap for lookups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{Address, Amount, Outcome};
use crate::ledger::error::{BettingError, Result};

/// A single stake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    /// Who staked
    pub bettor: Address,
    /// Predicted outcome
    pub outcome: Outcome,
    /// Amount staked (> 0)
    pub amount: Amount,
}

/// All bets of the current round.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BetLedger {
    bets: BTreeMap<Address, Bet>,
    order: Vec<Address>,
}

impl BetLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Has this address already staked this round?
    #[inline]
    pub fn has_bet(&self, addr: &Address) -> bool {
        self.bets.contains_key(addr)
    }

    /// Fail with `DuplicateAction` if `addr` already staked.
    pub fn check_new_bettor(&self, addr: &Address) -> Result<()> {
        if self.has_bet(addr) {
            Err(BettingError::DuplicateAction(*addr))
        } else {
            Ok(())
        }
    }

    /// Record a bet.
    pub fn record(&mut self, bet: Bet) -> Result<()> {
        self.check_new_bettor(&bet.bettor)?;
        self.order.push(bet.bettor);
        self.bets.insert(bet.bettor, bet);
        Ok(())
    }

    /// Lookup a bettor's stake.
    pub fn get(&self, addr: &Address) -> Option<&Bet> {
        self.bets.get(addr)
    }

    /// Bettors in the order they staked.
    pub fn bettors(&self) -> &[Address] {
        &self.order
    }

    /// Bets on `outcome`, ordered by bettor address.
    pub fn on_outcome<'a>(&'a self, outcome: &'a Outcome) -> impl Iterator<Item = &'a Bet> + 'a {
        self.bets.values().filter(move |b| b.outcome == *outcome)
    }

    /// All bets, ordered by bettor address.
    pub fn iter(&self) -> impl Iterator<Item = &Bet> {
        self.bets.values()
    }

    /// Number of bettors.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// No bets this round.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Forget every bet.
    pub fn clear(&mut self) {
        self.bets.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bet(id: u8, outcome: &str, amount: Amount) -> Bet {
        Bet {
            bettor: Address::new([id; 20]),
            outcome: Outcome::from_label(outcome),
            amount,
        }
    }

    #[test]
    fn test_record_keeps_arrival_order() {
        let mut ledger = BetLedger::new();
        ledger.record(bet(9, "a", 1)).unwrap();
        ledger.record(bet(3, "b", 2)).unwrap();
        ledger.record(bet(5, "a", 3)).unwrap();

        assert_eq!(
            ledger.bettors(),
            &[
                Address::new([9; 20]),
                Address::new([3; 20]),
                Address::new([5; 20])
            ]
        );
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_second_bet_rejected() {
        let mut ledger = BetLedger::new();
        ledger.record(bet(1, "a", 4)).unwrap();

        let result = ledger.record(bet(1, "b", 7));
        assert_eq!(result, Err(BettingError::DuplicateAction(Address::new([1; 20]))));

        // First bet untouched
        let kept = ledger.get(&Address::new([1; 20])).unwrap();
        assert_eq!(kept.outcome, Outcome::from_label("a"));
        assert_eq!(kept.amount, 4);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_on_outcome_filters() {
        let mut ledger = BetLedger::new();
        ledger.record(bet(1, "a", 1)).unwrap();
        ledger.record(bet(2, "b", 2)).unwrap();
        ledger.record(bet(3, "a", 3)).unwrap();

        let a = Outcome::from_label("a");
        let amounts: Vec<Amount> = ledger.on_outcome(&a).map(|b| b.amount).collect();
        assert_eq!(amounts, vec![1, 3]);
    }

    #[test]
    fn test_clear() {
        let mut ledger = BetLedger::new();
        ledger.record(bet(1, "a", 1)).unwrap();
        ledger.clear();
        assert!(ledger.is_empty());
        assert!(!ledger.has_bet(&Address::new([1; 20])));
    }
}
