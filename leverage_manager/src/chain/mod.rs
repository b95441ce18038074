//! Boundary to the external collaborators: the token ledger, the lending market
//! and the rewards market, plus the atomic execution context they live in.
//!
//! Every call is synchronous. Balances are always read back from these traits
//! after a mutation, the engine never keeps its own copy.

pub mod memory;
#[cfg(test)]
pub(crate) mod mock;

use alloy_primitives::{Address, U256};

use crate::{
    types::{AccountRisk, Amount, InterestRateMode, LedgerPosition, ReserveTokens},
    utils::error::ManagerResult,
};

/// Token-transfer primitives
pub trait AssetLedger {
    fn balance_of(&self, asset: Address, account: Address) -> ManagerResult<U256>;

    fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> ManagerResult<()>;

    /// Sets the allowance of `spender` over the tokens of `owner`.
    fn approve(
        &mut self,
        asset: Address,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> ManagerResult<()>;
}

/// The lending market. `account` is both the caller and the position holder.
pub trait LendingMarket {
    /// Collateral and debt position identifiers of `asset`
    fn reserve_tokens(&self, asset: Address) -> ManagerResult<ReserveTokens>;

    fn supply(&mut self, asset: Address, amount: U256, account: Address) -> ManagerResult<()>;

    fn borrow(
        &mut self,
        asset: Address,
        amount: U256,
        mode: InterestRateMode,
        account: Address,
    ) -> ManagerResult<()>;

    /// Returns the amount actually repaid.
    fn repay(
        &mut self,
        asset: Address,
        amount: Amount,
        mode: InterestRateMode,
        account: Address,
    ) -> ManagerResult<U256>;

    /// Returns the amount actually withdrawn.
    fn withdraw(&mut self, asset: Address, amount: Amount, account: Address)
        -> ManagerResult<U256>;

    fn account_position(&self, asset: Address, account: Address) -> ManagerResult<LedgerPosition>;

    fn account_risk(&self, account: Address) -> ManagerResult<AccountRisk>;
}

/// The market paying incentives on collateral and debt positions
pub trait RewardsMarket {
    /// Returns the amount claimed.
    fn claim_rewards(
        &mut self,
        assets: &[Address],
        amount: Amount,
        recipient: Address,
    ) -> ManagerResult<U256>;

    fn pending_rewards(&self, assets: &[Address], account: Address) -> ManagerResult<U256>;
}

/// The serial environment all external calls run in.
/// A checkpoint taken before an action is rolled back if the action fails.
pub trait ChainContext {
    type Checkpoint;

    fn checkpoint(&self) -> Self::Checkpoint;

    fn rollback(&mut self, checkpoint: Self::Checkpoint);

    /// Current time in seconds
    fn timestamp(&self) -> u64;
}

/// Everything the strategy needs from its environment
pub trait Chain: AssetLedger + LendingMarket + RewardsMarket + ChainContext {}

impl<T> Chain for T where T: AssetLedger + LendingMarket + RewardsMarket + ChainContext {}
