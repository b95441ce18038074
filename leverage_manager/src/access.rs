//! Capability checks performed by the calling context.
//!
//! Gated entry points do not look at the caller themselves. They take a
//! capability value that can only be obtained from [`Roles`], so a call site
//! has to prove the caller's role before it can reach the engine.

use alloy_primitives::Address;

use crate::utils::error::{ManagerError, ManagerResult};

/// Addresses of the collaborators and privileged accounts of a strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Roles {
    /// Owner of the strategy. Withdrawals requested by the owner are fee free.
    pub owner: Address,
    /// Operator account that shares the manager capability with the owner
    pub keeper: Address,
    /// The only account allowed to withdraw from and retire the strategy
    pub vault: Address,
    /// Receives the strategist share of the harvest fee
    pub strategist: Address,
    /// Receives the protocol share of the harvest fee
    pub protocol_fee_recipient: Address,
}

/// Proof that the caller is the owner or the keeper
#[derive(Debug)]
pub struct ManagerCap {
    caller: Address,
}

impl ManagerCap {
    pub fn caller(&self) -> Address {
        self.caller
    }
}

/// Proof that the caller is the registered vault
#[derive(Debug)]
pub struct VaultCap {
    _private: (),
}

impl Roles {
    /// Returns Err if the `caller` is neither the owner nor the keeper
    pub fn only_manager(&self, caller: Address) -> ManagerResult<ManagerCap> {
        if caller != self.owner && caller != self.keeper {
            return Err(ManagerError::Unauthorized);
        }
        Ok(ManagerCap { caller })
    }

    /// Returns Err if the `caller` is not the vault
    pub fn only_vault(&self, caller: Address) -> ManagerResult<VaultCap> {
        if caller != self.vault {
            return Err(ManagerError::Unauthorized);
        }
        Ok(VaultCap { _private: () })
    }

    pub fn is_owner(&self, account: Address) -> bool {
        account == self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles() -> Roles {
        Roles {
            owner: Address::repeat_byte(0x01),
            keeper: Address::repeat_byte(0x02),
            vault: Address::repeat_byte(0x03),
            strategist: Address::repeat_byte(0x04),
            protocol_fee_recipient: Address::repeat_byte(0x05),
        }
    }

    #[test]
    fn test_owner_and_keeper_are_managers() {
        let roles = roles();
        assert_eq!(
            roles.only_manager(roles.owner).unwrap().caller(),
            roles.owner
        );
        assert_eq!(
            roles.only_manager(roles.keeper).unwrap().caller(),
            roles.keeper
        );
    }

    #[test]
    fn test_others_are_not_managers() {
        let roles = roles();
        assert_eq!(
            roles.only_manager(roles.vault).unwrap_err(),
            ManagerError::Unauthorized
        );
        assert_eq!(
            roles.only_manager(Address::repeat_byte(0xff)).unwrap_err(),
            ManagerError::Unauthorized
        );
    }

    #[test]
    fn test_only_vault() {
        let roles = roles();
        assert!(roles.only_vault(roles.vault).is_ok());
        assert_eq!(
            roles.only_vault(roles.owner).unwrap_err(),
            ManagerError::Unauthorized
        );
    }
}
