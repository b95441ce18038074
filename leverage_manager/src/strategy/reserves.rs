//! Tracks the part of the base-asset balance locked by the leverage ladder.

use alloy_primitives::U256;

use crate::utils::{
    common::checked_sub,
    error::{arithmetic_err, ManagerResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReserveTracker {
    reserves: U256,
}

impl ReserveTracker {
    pub fn reserves(&self) -> U256 {
        self.reserves
    }

    /// Adds the residual of a ladder to the reserves.
    pub fn lock(&mut self, amount: U256) -> ManagerResult<()> {
        self.reserves = self
            .reserves
            .checked_add(amount)
            .ok_or_else(|| arithmetic_err("Reserves overflowed."))?;
        Ok(())
    }

    /// Locks exactly `amount`, replacing whatever was locked before.
    pub fn set(&mut self, amount: U256) {
        self.reserves = amount;
    }

    pub fn reset(&mut self) {
        self.reserves = U256::ZERO;
    }

    /// Part of `balance` that is not locked.
    pub fn available(&self, balance: U256) -> ManagerResult<U256> {
        checked_sub(balance, self.reserves, "Balance minus reserves")
    }
}
