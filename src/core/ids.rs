//! Identities
//!
//! Fixed-size identifiers for participants and outcomes.
//! Both implement Ord so they can key BTreeMaps (deterministic iteration).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::hash::hash_with_domain;

/// Domain separator for label-derived outcome ids.
const OUTCOME_DOMAIN: &[u8] = b"PARI_MUTUEL_OUTCOME_V1";

// =============================================================================
// ADDRESS
// =============================================================================

/// Account identity of an owner, arbiter or bettor (20 bytes).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Parse from a hex string, with or without `0x` prefix.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).ok()?;
        if bytes.len() != 20 {
            return None;
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Some(Self(arr))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Short form for log lines (first 4 bytes).
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", self.short())
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

/// Opaque outcome identifier (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Outcome(pub [u8; 32]);

impl Outcome {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive an outcome id from a human-readable label.
    ///
    /// The same label always maps to the same id, so deployment tooling can
    /// register `"team1"` and callers can bet on `"team1"` independently.
    pub fn from_label(label: &str) -> Self {
        Self(hash_with_domain(OUTCOME_DOMAIN, label.as_bytes()))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short form for log lines (first 4 bytes).
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Outcome(0x{})", self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_label_is_stable() {
        assert_eq!(Outcome::from_label("team1"), Outcome::from_label("team1"));
        assert_ne!(Outcome::from_label("team1"), Outcome::from_label("team2"));
    }

    #[test]
    fn test_address_hex_parsing() {
        let addr = Address::new([0xab; 20]);
        let rendered = addr.to_string();
        assert!(rendered.starts_with("0x"));
        assert_eq!(Address::from_hex(&rendered), Some(addr));
        assert_eq!(Address::from_hex(&rendered[2..]), Some(addr));

        // Wrong length and bad hex
        assert_eq!(Address::from_hex("0xabcd"), None);
        assert_eq!(Address::from_hex("zz"), None);
    }
}
