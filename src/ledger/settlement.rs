//! Settlement Engine
//!
//! Turns a winning outcome plus the round's bets into a list of credits.
//! Pure: nothing here mutates ledger state, the engine commits the result.
//!
//! ## Payout Rule
//!
//! ```text
//! W = total staked on the winning outcome
//! P = total staked on every outcome
//!
//! W > 0 : each winning stake s  ->  floor(s * P / W)
//! W = 0 : arbiter               ->  P
//! ```
//!
//! Floor division means `Σ payouts <= P`. The difference is the residual
//! and stays in custody.

use serde::{Deserialize, Serialize};

use crate::core::{checked_sum, pro_rata, Address, Amount, Outcome};
use crate::ledger::bets::BetLedger;
use crate::ledger::error::{BettingError, Result};
use crate::ledger::registry::OutcomeRegistry;

/// Decision state of a round. Write-once until reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Decision {
    /// Betting window open
    #[default]
    Pending,
    /// Arbiter declared the winner
    Decided(Outcome),
}

impl Decision {
    /// Has a decision been made this round?
    pub fn is_made(&self) -> bool {
        matches!(self, Decision::Decided(_))
    }

    /// Winning outcome, once decided.
    pub fn winning_outcome(&self) -> Option<Outcome> {
        match self {
            Decision::Decided(o) => Some(*o),
            Decision::Pending => None,
        }
    }
}

/// Computed result of a decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Winning outcome
    pub outcome: Outcome,
    /// Total staked on the winning outcome (W)
    pub winning_pool: Amount,
    /// Total staked across all outcomes (P)
    pub total_pool: Amount,
    /// Credits to write, one entry per paid address, nonzero amounts only
    pub payouts: Vec<(Address, Amount)>,
    /// P - Σ payouts
    pub residual: Amount,
}

impl Settlement {
    /// Nobody backed the winning outcome.
    pub fn house_wins(&self) -> bool {
        self.winning_pool == 0
    }
}

/// Compute payouts for `outcome`.
///
/// `arbiter` receives the whole pool when nobody backed the winner.
pub fn compute_settlement(
    registry: &OutcomeRegistry,
    bets: &BetLedger,
    outcome: Outcome,
    arbiter: Address,
) -> Result<Settlement> {
    let winning_pool = registry.total_staked(&outcome)?;
    let total_pool = registry.total_pool();

    let payouts = if winning_pool > 0 {
        bets.on_outcome(&outcome)
            .map(|bet| {
                pro_rata(bet.amount, total_pool, winning_pool)
                    .map(|payout| (bet.bettor, payout))
                    .ok_or(BettingError::Overflow)
            })
            .filter(|entry| !matches!(entry, Ok((_, 0))))
            .collect::<Result<Vec<_>>>()?
    } else if total_pool > 0 {
        vec![(arbiter, total_pool)]
    } else {
        Vec::new()
    };

    let paid = checked_sum(payouts.iter().map(|(_, a)| *a)).ok_or(BettingError::Overflow)?;
    // floor division never pays out more than the pool
    let residual = total_pool
        .checked_sub(paid)
        .ok_or(BettingError::Overflow)?;

    Ok(Settlement {
        outcome,
        winning_pool,
        total_pool,
        payouts,
        residual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::bets::Bet;
    use crate::ledger::config::EngineConfig;

    const ARBITER: Address = Address::new([0xaa; 20]);

    fn setup(outcomes: &[&str], bets: &[(u8, &str, Amount)]) -> (OutcomeRegistry, BetLedger) {
        let ids: Vec<Outcome> = outcomes.iter().map(|o| Outcome::from_label(o)).collect();
        let mut registry = OutcomeRegistry::register(&ids, &EngineConfig::default()).unwrap();
        let mut ledger = BetLedger::new();
        for (id, outcome, amount) in bets {
            let outcome = Outcome::from_label(outcome);
            registry.add_stake(&outcome, *amount).unwrap();
            ledger
                .record(Bet {
                    bettor: Address::new([*id; 20]),
                    outcome,
                    amount: *amount,
                })
                .unwrap();
        }
        (registry, ledger)
    }

    fn payout_of(settlement: &Settlement, id: u8) -> Amount {
        settlement
            .payouts
            .iter()
            .find(|(a, _)| *a == Address::new([id; 20]))
            .map(|(_, amt)| *amt)
            .unwrap_or(0)
    }

    #[test]
    fn test_proportional_payout_with_residual() {
        // A:1 from X, A:2 from Y, B:2 from Z; decide A
        let (registry, ledger) = setup(&["A", "B"], &[(1, "A", 1), (2, "A", 2), (3, "B", 2)]);
        let s = compute_settlement(&registry, &ledger, Outcome::from_label("A"), ARBITER).unwrap();

        assert_eq!(s.winning_pool, 3);
        assert_eq!(s.total_pool, 5);
        assert_eq!(payout_of(&s, 1), 1);
        assert_eq!(payout_of(&s, 2), 3);
        assert_eq!(payout_of(&s, 3), 0);
        assert_eq!(s.residual, 1);
        assert!(!s.house_wins());
    }

    #[test]
    fn test_exact_proportional_payout() {
        // 1+2 on team1, 2 on team2, 1 on team3 -> pool 6, winners double up
        let (registry, ledger) = setup(
            &["team1", "team2", "team3"],
            &[(1, "team1", 1), (2, "team1", 2), (3, "team2", 2), (4, "team3", 1)],
        );
        let s =
            compute_settlement(&registry, &ledger, Outcome::from_label("team1"), ARBITER).unwrap();

        assert_eq!(payout_of(&s, 1), 2);
        assert_eq!(payout_of(&s, 2), 4);
        assert_eq!(s.residual, 0);
    }

    #[test]
    fn test_sole_winner_takes_pool() {
        let (registry, ledger) = setup(&["A", "B"], &[(1, "A", 1), (2, "B", 2)]);
        let s = compute_settlement(&registry, &ledger, Outcome::from_label("A"), ARBITER).unwrap();
        assert_eq!(s.payouts, vec![(Address::new([1; 20]), 3)]);
        assert_eq!(s.residual, 0);
    }

    #[test]
    fn test_no_winners_pays_arbiter() {
        let (registry, ledger) = setup(&["A", "B", "C"], &[(1, "A", 1), (2, "B", 2)]);
        let s = compute_settlement(&registry, &ledger, Outcome::from_label("C"), ARBITER).unwrap();

        assert!(s.house_wins());
        assert_eq!(s.payouts, vec![(ARBITER, 3)]);
        assert_eq!(s.residual, 0);
    }

    #[test]
    fn test_empty_round_pays_nobody() {
        let (registry, ledger) = setup(&["A", "B"], &[]);
        let s = compute_settlement(&registry, &ledger, Outcome::from_label("A"), ARBITER).unwrap();
        assert!(s.payouts.is_empty());
        assert_eq!(s.residual, 0);
    }

    #[test]
    fn test_unregistered_outcome() {
        let (registry, ledger) = setup(&["A", "B"], &[(1, "A", 1)]);
        let c = Outcome::from_label("C");
        assert_eq!(
            compute_settlement(&registry, &ledger, c, ARBITER),
            Err(BettingError::InvalidOutcome(c))
        );
    }

    #[test]
    fn test_decision_accessors() {
        let a = Outcome::from_label("A");
        assert!(!Decision::Pending.is_made());
        assert_eq!(Decision::Pending.winning_outcome(), None);
        assert!(Decision::Decided(a).is_made());
        assert_eq!(Decision::Decided(a).winning_outcome(), Some(a));
    }
}
