//! State Hashing for Verification
//!
//! Provides deterministic hashing of ledger state for:
//! - Comparing two engine replicas fed the same operations
//! - Deriving outcome ids from labels
//! - Audit trails kept by external monitors

use sha2::{Digest, Sha256};

use super::amount::Amount;
use super::ids::{Address, Outcome};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for ledger state.
///
/// Wraps SHA-256 with helpers for the crate's id and amount types.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for engine state.
    pub fn for_engine_state() -> Self {
        Self::new(b"PARI_MUTUEL_STATE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an amount (little-endian u128).
    #[inline]
    pub fn update_amount(&mut self, value: Amount) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with an address.
    #[inline]
    pub fn update_address(&mut self, address: &Address) {
        self.hasher.update(address.as_bytes());
    }

    /// Update with an optional address (presence byte first).
    pub fn update_opt_address(&mut self, address: Option<&Address>) {
        match address {
            Some(a) => {
                self.update_bool(true);
                self.update_address(a);
            }
            None => self.update_bool(false),
        }
    }

    /// Update with an outcome id.
    #[inline]
    pub fn update_outcome(&mut self, outcome: &Outcome) {
        self.hasher.update(outcome.as_bytes());
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute hash with domain separator.
pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> StateHash {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the engine state hash.
///
/// Round number goes first; the closure adds the ledgers in a fixed order.
pub fn compute_state_hash<F>(round: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_engine_state();
    hasher.update_u64(round);
    add_state(&mut hasher);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_hasher_determinism() {
        let make_hash = || {
            let mut hasher = StateHasher::for_engine_state();
            hasher.update_u64(3);
            hasher.update_amount(12345);
            hasher.update_address(&Address::new([7; 20]));
            hasher.update_opt_address(None);
            hasher.update_bool(true);
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_hash_order_matters() {
        let hash1 = {
            let mut h = StateHasher::new(b"test");
            h.update_amount(1);
            h.update_amount(2);
            h.finalize()
        };

        let hash2 = {
            let mut h = StateHasher::new(b"test");
            h.update_amount(2);
            h.update_amount(1);
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_domain_separation() {
        let data = [1u8, 2, 3, 4];
        assert_ne!(
            hash_with_domain(b"DOMAIN_A", &data),
            hash_with_domain(b"DOMAIN_B", &data)
        );
    }

    #[test]
    fn test_compute_state_hash_round_sensitive() {
        let a = compute_state_hash(1, |h| h.update_amount(5));
        let b = compute_state_hash(1, |h| h.update_amount(5));
        let c = compute_state_hash(2, |h| h.update_amount(5));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
