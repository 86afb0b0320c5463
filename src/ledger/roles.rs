//! Role Manager
//!
//! Fixed owner, optional arbiter. Bettor membership lives in the bet
//! ledger; exclusivity against it is checked by the caller passing
//! `is_bettor` in.

use serde::{Deserialize, Serialize};

use crate::core::Address;
use crate::ledger::error::{BettingError, Result};

/// Owner and arbiter identities.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoleManager {
    owner: Address,
    arbiter: Option<Address>,
}

impl RoleManager {
    /// New manager with no arbiter.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            arbiter: None,
        }
    }

    /// The permanent owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// The current arbiter, if any.
    pub fn arbiter(&self) -> Option<Address> {
        self.arbiter
    }

    /// Is `addr` the owner?
    #[inline]
    pub fn is_owner(&self, addr: &Address) -> bool {
        self.owner == *addr
    }

    /// Is `addr` the current arbiter?
    #[inline]
    pub fn is_arbiter(&self, addr: &Address) -> bool {
        self.arbiter.as_ref() == Some(addr)
    }

    /// Fail with `Unauthorized` unless `caller` is the owner.
    pub fn require_owner(&self, caller: &Address, action: &'static str) -> Result<()> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(BettingError::Unauthorized {
                caller: *caller,
                action,
            })
        }
    }

    /// Fail with `Unauthorized` unless `caller` is the arbiter.
    pub fn require_arbiter(&self, caller: &Address, action: &'static str) -> Result<()> {
        if self.is_arbiter(caller) {
            Ok(())
        } else {
            Err(BettingError::Unauthorized {
                caller: *caller,
                action,
            })
        }
    }

    /// Check that `candidate` may become arbiter.
    pub fn check_appointment(&self, candidate: &Address, is_bettor: bool) -> Result<()> {
        if self.is_owner(candidate) {
            return Err(BettingError::InvalidRole(
                "the owner cannot be the arbiter".into(),
            ));
        }
        if is_bettor {
            return Err(BettingError::InvalidRole(format!(
                "{} has a bet this round and cannot be the arbiter",
                candidate
            )));
        }
        Ok(())
    }

    /// Appoint `candidate`, returning the previous arbiter.
    pub fn appoint(&mut self, candidate: Address, is_bettor: bool) -> Result<Option<Address>> {
        self.check_appointment(&candidate, is_bettor)?;
        Ok(self.arbiter.replace(candidate))
    }

    /// Clear the arbiter, returning who it was.
    pub fn revoke(&mut self) -> Option<Address> {
        self.arbiter.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: Address = Address::new([1; 20]);
    const ARBITER: Address = Address::new([2; 20]);
    const OTHER: Address = Address::new([3; 20]);

    #[test]
    fn test_appoint_returns_previous() {
        let mut roles = RoleManager::new(OWNER);
        assert_eq!(roles.appoint(ARBITER, false), Ok(None));
        assert_eq!(roles.appoint(OTHER, false), Ok(Some(ARBITER)));
        assert!(roles.is_arbiter(&OTHER));
        assert!(!roles.is_arbiter(&ARBITER));
    }

    #[test]
    fn test_owner_cannot_be_arbiter() {
        let mut roles = RoleManager::new(OWNER);
        assert!(matches!(
            roles.appoint(OWNER, false),
            Err(BettingError::InvalidRole(_))
        ));
        assert_eq!(roles.arbiter(), None);
    }

    #[test]
    fn test_bettor_cannot_be_arbiter() {
        let mut roles = RoleManager::new(OWNER);
        assert!(matches!(
            roles.appoint(OTHER, true),
            Err(BettingError::InvalidRole(_))
        ));
    }

    #[test]
    fn test_require_checks() {
        let mut roles = RoleManager::new(OWNER);
        assert!(roles.require_owner(&OWNER, "test").is_ok());
        assert_eq!(
            roles.require_owner(&OTHER, "test"),
            Err(BettingError::Unauthorized {
                caller: OTHER,
                action: "test"
            })
        );

        // No arbiter: nobody passes
        assert!(roles.require_arbiter(&ARBITER, "decide").is_err());
        roles.appoint(ARBITER, false).unwrap();
        assert!(roles.require_arbiter(&ARBITER, "decide").is_ok());
        assert_eq!(roles.revoke(), Some(ARBITER));
        assert!(roles.require_arbiter(&ARBITER, "decide").is_err());
    }
}
