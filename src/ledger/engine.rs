//! Betting Engine
//!
//! Owns every ledger of one pool and sequences the round lifecycle:
//!
//! ```text
//! initialize ─▶ appoint_arbiter ─▶ place_bet* ─▶ decide ─▶ withdraw*
//!                                                  │
//!                          start_round ◀── reset ◀─┘
//! ```
//!
//! Every operation runs to completion against `&mut self`, checks all of its
//! preconditions before touching state, and either commits fully or returns an
//! error with the engine unchanged.
//!
//! ## Custody
//!
//! `custody = open stakes + Σ credits + residual` holds after every
//! operation. Stakes are "open" until the round is decided; settlement
//! turns them into credits plus the rounding residual.

use tracing::{debug, info, warn};

use crate::core::{compute_state_hash, Address, Amount, Outcome, StateHash};
use crate::ledger::bets::{Bet, BetLedger};
use crate::ledger::config::{EngineConfig, ResidualPolicy};
use crate::ledger::credits::{CreditLedger, PayoutSink};
use crate::ledger::error::{BettingError, Result};
use crate::ledger::events::{EngineEvent, EventData, EventLog};
use crate::ledger::registry::OutcomeRegistry;
use crate::ledger::roles::RoleManager;
use crate::ledger::settlement::{compute_settlement, Decision};

/// Escrow and settlement engine for one betting pool.
#[derive(Clone, Debug)]
pub struct BettingEngine {
    config: EngineConfig,
    roles: RoleManager,
    registry: OutcomeRegistry,
    bets: BetLedger,
    decision: Decision,
    credits: CreditLedger,
    /// Funds held by the engine
    custody: Amount,
    /// Rounding remainder retained from settlements
    residual: Amount,
    round: u64,
    events: EventLog,
}

impl BettingEngine {
    /// Create an engine owned by `owner` with the first round's outcomes.
    pub fn initialize(owner: Address, outcomes: &[Outcome], config: EngineConfig) -> Result<Self> {
        let config = config.normalized();
        let registry = OutcomeRegistry::register(outcomes, &config)?;

        info!(
            "Engine initialized: owner {}, {} outcomes",
            owner.short(),
            registry.outcomes().len()
        );

        Ok(Self {
            config,
            roles: RoleManager::new(owner),
            registry,
            bets: BetLedger::new(),
            decision: Decision::Pending,
            credits: CreditLedger::new(),
            custody: 0,
            residual: 0,
            round: 0,
            events: EventLog::new(),
        })
    }

    fn emit(&mut self, data: EventData) {
        self.events.push(self.round, data);
    }

    // =========================================================================
    // ROLES
    // =========================================================================

    /// Appoint the arbiter. Owner only.
    pub fn appoint_arbiter(&mut self, caller: Address, arbiter: Address) -> Result<()> {
        if let Err(e) = self.roles.require_owner(&caller, "appoint an arbiter") {
            warn!("Rejected arbiter appointment from {}", caller.short());
            return Err(e);
        }
        let previous = self.roles.appoint(arbiter, self.bets.has_bet(&arbiter))?;

        info!(
            "Arbiter changed: {:?} -> {}",
            previous.map(|p| p.short()),
            arbiter.short()
        );
        self.emit(EventData::ArbiterChanged {
            previous,
            new: Some(arbiter),
        });
        Ok(())
    }

    /// Remove the arbiter. Owner only. Staking is closed until a new one
    /// is appointed.
    pub fn revoke_arbiter(&mut self, caller: Address) -> Result<()> {
        self.roles.require_owner(&caller, "revoke the arbiter")?;
        if self.roles.arbiter().is_none() {
            return Err(BettingError::InvalidState("no arbiter appointed".into()));
        }
        let previous = self.roles.revoke();

        info!("Arbiter revoked: {:?}", previous.map(|p| p.short()));
        self.emit(EventData::ArbiterChanged {
            previous,
            new: None,
        });
        Ok(())
    }

    /// The permanent owner.
    pub fn owner(&self) -> Address {
        self.roles.owner()
    }

    /// The current arbiter, if any.
    pub fn arbiter(&self) -> Option<Address> {
        self.roles.arbiter()
    }

    /// Is `addr` the current arbiter?
    pub fn is_arbiter(&self, addr: &Address) -> bool {
        self.roles.is_arbiter(addr)
    }

    // =========================================================================
    // STAKING
    // =========================================================================

    /// Stake `amount` on `outcome`. The amount enters custody.
    pub fn place_bet(&mut self, caller: Address, outcome: Outcome, amount: Amount) -> Result<()> {
        if self.roles.is_owner(&caller) || self.roles.is_arbiter(&caller) {
            return Err(BettingError::Unauthorized {
                caller,
                action: "place a bet",
            });
        }
        if self.decision.is_made() {
            return Err(BettingError::InvalidState(
                "cannot bet after decision was made".into(),
            ));
        }
        if self.roles.arbiter().is_none() {
            return Err(BettingError::InvalidConfiguration(
                "no arbiter appointed".into(),
            ));
        }
        self.registry.require(&outcome)?;
        self.bets.check_new_bettor(&caller)?;
        if amount < self.config.min_stake {
            return Err(BettingError::InvalidConfiguration(format!(
                "stake {} below minimum {}",
                amount, self.config.min_stake
            )));
        }
        self.registry.check_stake(&outcome, amount)?;
        let custody = self
            .custody
            .checked_add(amount)
            .ok_or(BettingError::Overflow)?;

        // Commit
        self.registry.add_stake(&outcome, amount)?;
        self.bets.record(Bet {
            bettor: caller,
            outcome,
            amount,
        })?;
        self.custody = custody;

        info!(
            "Bet placed: {} staked {} on {}",
            caller.short(),
            amount,
            outcome.short()
        );
        self.emit(EventData::BetPlaced {
            bettor: caller,
            outcome,
            amount,
        });
        Ok(())
    }

    /// Total staked on `outcome` this round.
    pub fn total_staked(&self, outcome: &Outcome) -> Result<Amount> {
        self.registry.total_staked(outcome)
    }

    /// Bettors of this round in staking order.
    pub fn bettors(&self) -> &[Address] {
        self.bets.bettors()
    }

    /// A bettor's stake this round.
    pub fn bet_of(&self, addr: &Address) -> Option<&Bet> {
        self.bets.get(addr)
    }

    /// Registered outcomes of this round.
    pub fn outcomes(&self) -> &[Outcome] {
        self.registry.outcomes()
    }

    /// Is `outcome` registered this round?
    pub fn is_valid_outcome(&self, outcome: &Outcome) -> bool {
        self.registry.contains(outcome)
    }

    // =========================================================================
    // DECISION
    // =========================================================================

    /// Declare the winning outcome and credit the payouts. Arbiter only,
    /// once per round.
    pub fn decide(&mut self, caller: Address, outcome: Outcome) -> Result<()> {
        if let Err(e) = self.roles.require_arbiter(&caller, "make the decision") {
            warn!("Rejected decision from non-arbiter {}", caller.short());
            return Err(e);
        }
        self.registry.require(&outcome)?;
        if self.decision.is_made() {
            return Err(BettingError::InvalidState(
                "decision can be made only once per round".into(),
            ));
        }

        let settlement = compute_settlement(&self.registry, &self.bets, outcome, caller)?;
        let residual = self
            .residual
            .checked_add(settlement.residual)
            .ok_or(BettingError::Overflow)?;

        // Commit
        self.credits.credit_all(&settlement.payouts)?;
        self.residual = residual;
        self.decision = Decision::Decided(outcome);

        for (addr, amount) in &settlement.payouts {
            debug!("Credited {} with {}", addr.short(), amount);
        }
        if settlement.house_wins() {
            info!(
                "Decision {}: no winning stakes, arbiter credited {}",
                outcome.short(),
                settlement.total_pool
            );
        } else {
            info!(
                "Decision {}: {} winners share {} (residual {})",
                outcome.short(),
                settlement.payouts.len(),
                settlement.total_pool,
                settlement.residual
            );
        }

        self.emit(EventData::DecisionMade {
            outcome,
            winning_pool: settlement.winning_pool,
            total_pool: settlement.total_pool,
        });
        Ok(())
    }

    /// Has the current round been decided?
    pub fn decision_made(&self) -> bool {
        self.decision.is_made()
    }

    /// The winning outcome, once decided.
    pub fn winning_outcome(&self) -> Option<Outcome> {
        self.decision.winning_outcome()
    }

    // =========================================================================
    // WITHDRAWAL
    // =========================================================================

    /// Withdrawable credit of `addr`.
    pub fn credit_of(&self, addr: &Address) -> Amount {
        self.credits.balance_of(addr)
    }

    /// Withdraw `amount` of the caller's credit through `sink`.
    ///
    /// Credit is debited before the sink runs; if the sink fails the debit
    /// is restored and `TransferFailed` returned.
    pub fn withdraw<S>(&mut self, caller: Address, amount: Amount, sink: &mut S) -> Result<()>
    where
        S: PayoutSink + ?Sized,
    {
        self.credits.check_debit(&caller, amount)?;
        if amount == 0 {
            return Err(BettingError::InvalidConfiguration(
                "withdrawal amount must be positive".into(),
            ));
        }
        let custody = self
            .custody
            .checked_sub(amount)
            .ok_or(BettingError::Overflow)?;

        // State first
        self.credits.debit(&caller, amount)?;
        self.custody = custody;

        if let Err(reason) = sink.transfer(&caller, amount) {
            self.credits.credit(caller, amount)?;
            self.custody += amount;
            warn!(
                "Transfer of {} to {} failed, debit rolled back: {}",
                amount,
                caller.short(),
                reason
            );
            return Err(BettingError::TransferFailed(reason));
        }

        info!("Withdrawn: {} took {}", caller.short(), amount);
        self.emit(EventData::Withdrawn {
            account: caller,
            amount,
        });
        Ok(())
    }

    /// Move the accumulated rounding residual into the owner's credit.
    pub fn sweep_residual(&mut self, caller: Address) -> Result<Amount> {
        self.roles.require_owner(&caller, "sweep the residual")?;
        if self.config.residual_policy == ResidualPolicy::Locked {
            return Err(BettingError::InvalidState("residual is locked".into()));
        }
        if self.residual == 0 {
            return Err(BettingError::InvalidState("no residual to sweep".into()));
        }

        let amount = self.residual;
        self.credits.credit(caller, amount)?;
        self.residual = 0;

        info!("Residual swept: {} to owner", amount);
        self.emit(EventData::ResidualSwept {
            owner: caller,
            amount,
        });
        Ok(amount)
    }

    // =========================================================================
    // ROUND LIFECYCLE
    // =========================================================================

    /// Clear outcomes, bets and the decision. Owner only, after a decision.
    /// Roles and unwithdrawn credit survive.
    pub fn reset(&mut self, caller: Address) -> Result<()> {
        self.roles.require_owner(&caller, "reset the round")?;
        if !self.decision.is_made() {
            return Err(BettingError::InvalidState(
                "cannot reset before decision".into(),
            ));
        }

        self.registry.clear();
        self.bets.clear();
        self.decision = Decision::Pending;
        self.round += 1;

        info!(
            "Round reset: now round {}, {} credit outstanding",
            self.round,
            self.credits.total()
        );
        self.emit(EventData::RoundReset { round: self.round });
        Ok(())
    }

    /// Register the outcomes of the next round. Owner only, after `reset`.
    pub fn start_round(&mut self, caller: Address, outcomes: &[Outcome]) -> Result<()> {
        self.roles.require_owner(&caller, "start a round")?;
        if self.decision.is_made() || !self.registry.is_empty() {
            return Err(BettingError::InvalidState(
                "current round has not been reset".into(),
            ));
        }

        self.registry = OutcomeRegistry::register(outcomes, &self.config)?;
        info!(
            "Round {} opened with {} outcomes",
            self.round,
            outcomes.len()
        );
        Ok(())
    }

    /// Current round number (0 for the first round).
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =========================================================================
    // ACCOUNTING
    // =========================================================================

    /// Funds held by the engine.
    pub fn custody(&self) -> Amount {
        self.custody
    }

    /// Stakes not yet turned into credit (zero once decided).
    pub fn open_stakes(&self) -> Amount {
        if self.decision.is_made() {
            0
        } else {
            self.registry.total_pool()
        }
    }

    /// Σ credits.
    pub fn outstanding_credit(&self) -> Amount {
        self.credits.total()
    }

    /// Rounding remainder retained in custody.
    pub fn residual(&self) -> Amount {
        self.residual
    }

    /// `custody == open stakes + Σ credits + residual`
    pub fn check_conservation(&self) -> bool {
        self.open_stakes()
            .checked_add(self.outstanding_credit())
            .and_then(|v| v.checked_add(self.residual))
            == Some(self.custody)
    }

    /// Deterministic digest of the full ledger state.
    pub fn state_hash(&self) -> StateHash {
        compute_state_hash(self.round, |h| {
            h.update_address(&self.roles.owner());
            h.update_opt_address(self.roles.arbiter().as_ref());

            h.update_u64(self.registry.outcomes().len() as u64);
            for outcome in self.registry.outcomes() {
                h.update_outcome(outcome);
            }
            for (outcome, total) in self.registry.totals() {
                h.update_outcome(outcome);
                h.update_amount(*total);
            }

            h.update_u64(self.bets.len() as u64);
            for bet in self.bets.iter() {
                h.update_address(&bet.bettor);
                h.update_outcome(&bet.outcome);
                h.update_amount(bet.amount);
            }

            match self.decision {
                Decision::Pending => h.update_bool(false),
                Decision::Decided(outcome) => {
                    h.update_bool(true);
                    h.update_outcome(&outcome);
                }
            }

            for (addr, amount) in self.credits.iter() {
                h.update_address(addr);
                h.update_amount(*amount);
            }

            h.update_amount(self.custody);
            h.update_amount(self.residual);
        })
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Events not yet drained.
    pub fn events(&self) -> &[EngineEvent] {
        self.events.pending()
    }

    /// Hand pending events to a monitor.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain()
    }
}
