//! Engine Configuration
//!
//! Round-independent knobs. Defaults match a plain two-or-more-outcome pool.

use serde::{Deserialize, Serialize};

use crate::core::Amount;

/// Smallest outcome set the engine will ever accept.
pub const MIN_OUTCOMES_FLOOR: usize = 2;

/// What happens to the floor-division remainder of a settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResidualPolicy {
    /// The owner may sweep accumulated residual into their own credit.
    #[default]
    OwnerClaimable,
    /// Residual stays in custody forever.
    Locked,
}

impl ResidualPolicy {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner_claimable" | "owner" | "claimable" => Some(Self::OwnerClaimable),
            "locked" | "lock" => Some(Self::Locked),
            _ => None,
        }
    }
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum number of distinct outcomes per round (never below 2).
    pub min_outcomes: usize,
    /// Maximum number of outcomes per round.
    pub max_outcomes: usize,
    /// Smallest accepted stake (never below 1).
    pub min_stake: Amount,
    /// Rounding remainder handling.
    pub residual_policy: ResidualPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_outcomes: MIN_OUTCOMES_FLOOR,
            max_outcomes: 256,
            min_stake: 1,
            residual_policy: ResidualPolicy::OwnerClaimable,
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables, falling back to defaults
    /// for anything missing or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_outcomes: std::env::var("PARI_MIN_OUTCOMES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_outcomes),
            max_outcomes: std::env::var("PARI_MAX_OUTCOMES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_outcomes),
            min_stake: std::env::var("PARI_MIN_STAKE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_stake),
            residual_policy: std::env::var("PARI_RESIDUAL_POLICY")
                .ok()
                .and_then(|v| ResidualPolicy::parse(&v))
                .unwrap_or(defaults.residual_policy),
        }
        .normalized()
    }

    /// Clamp values to the hard floors.
    pub fn normalized(mut self) -> Self {
        self.min_outcomes = self.min_outcomes.max(MIN_OUTCOMES_FLOOR);
        self.max_outcomes = self.max_outcomes.max(self.min_outcomes);
        self.min_stake = self.min_stake.max(1);
        self
    }
}
