//! Ledger Events
//!
//! Events emitted on every committed state change, for external monitors.
//! Each carries the literal parties and amounts involved.

use serde::{Deserialize, Serialize};

use crate::core::{Address, Amount, Outcome};

/// Event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventData {
    /// Owner appointed or revoked the arbiter
    ArbiterChanged {
        /// Arbiter before the change
        previous: Option<Address>,
        /// Arbiter after the change, `None` when revoked
        new: Option<Address>,
    },

    /// A bettor staked on an outcome
    BetPlaced {
        /// Account that placed the bet
        bettor: Address,
        /// Outcome backed
        outcome: Outcome,
        /// Stake taken into custody
        amount: Amount,
    },

    /// The arbiter declared the winning outcome
    DecisionMade {
        /// Winning outcome
        outcome: Outcome,
        /// Stakes placed on the winning outcome
        winning_pool: Amount,
        /// Stakes placed across all outcomes
        total_pool: Amount,
    },

    /// Credit paid out
    Withdrawn {
        /// Account debited and paid
        account: Address,
        /// Amount transferred
        amount: Amount,
    },

    /// Rounding residual moved to the owner's credit
    ResidualSwept {
        /// Owner credited
        owner: Address,
        /// Residual moved
        amount: Amount,
    },

    /// Round state cleared
    RoundReset {
        /// The new round number
        round: u64,
    },
}

/// A ledger event with its position in the commit order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineEvent {
    /// Monotonic sequence number, never reused across rounds
    pub sequence: u64,

    /// Round the event was committed in
    pub round: u64,

    /// Event data
    pub data: EventData,
}

/// Append-only event log.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    next_sequence: u64,
    pending: Vec<EngineEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event stamped with the next sequence number.
    pub fn push(&mut self, round: u64, data: EventData) -> &EngineEvent {
        let event = EngineEvent {
            sequence: self.next_sequence,
            round,
            data,
        };
        self.next_sequence += 1;
        self.pending.push(event);
        // just pushed
        &self.pending[self.pending.len() - 1]
    }

    /// Events not yet drained.
    pub fn pending(&self) -> &[EngineEvent] {
        &self.pending
    }

    /// Hand pending events to the caller. Sequence numbering continues.
    pub fn drain(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_survives_drain() {
        let mut log = EventLog::new();
        log.push(0, EventData::RoundReset { round: 1 });
        log.push(1, EventData::RoundReset { round: 2 });

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].sequence, 1);
        assert!(log.pending().is_empty());

        let next = log.push(2, EventData::RoundReset { round: 3 });
        assert_eq!(next.sequence, 2);
    }

    #[test]
    fn test_event_json_names_variant() {
        let event = EngineEvent {
            sequence: 0,
            round: 0,
            data: EventData::Withdrawn {
                account: Address::new([1; 20]),
                amount: 5,
            },
        };
        let text = serde_json::to_string(&event).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["data"]["withdrawn"]["amount"], 5);

        let back: EngineEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(back, event);
    }
}
