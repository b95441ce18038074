use alloy_primitives::{Address, U256};
use mockall::mock;

use super::{AssetLedger, ChainContext, LendingMarket, RewardsMarket};
use crate::{
    types::{AccountRisk, Amount, InterestRateMode, LedgerPosition, ReserveTokens},
    utils::error::ManagerResult,
};

mock! {
    pub Chain {}

    impl AssetLedger for Chain {
        fn balance_of(&self, asset: Address, account: Address) -> ManagerResult<U256>;
        fn transfer(&mut self, asset: Address, from: Address, to: Address, amount: U256) -> ManagerResult<()>;
        fn approve(&mut self, asset: Address, owner: Address, spender: Address, amount: Amount) -> ManagerResult<()>;
    }

    impl LendingMarket for Chain {
        fn reserve_tokens(&self, asset: Address) -> ManagerResult<ReserveTokens>;
        fn supply(&mut self, asset: Address, amount: U256, account: Address) -> ManagerResult<()>;
        fn borrow(&mut self, asset: Address, amount: U256, mode: InterestRateMode, account: Address) -> ManagerResult<()>;
        fn repay(&mut self, asset: Address, amount: Amount, mode: InterestRateMode, account: Address) -> ManagerResult<U256>;
        fn withdraw(&mut self, asset: Address, amount: Amount, account: Address) -> ManagerResult<U256>;
        fn account_position(&self, asset: Address, account: Address) -> ManagerResult<LedgerPosition>;
        fn account_risk(&self, account: Address) -> ManagerResult<AccountRisk>;
    }

    impl RewardsMarket for Chain {
        fn claim_rewards(&mut self, assets: &[Address], amount: Amount, recipient: Address) -> ManagerResult<U256>;
        fn pending_rewards(&self, assets: &[Address], account: Address) -> ManagerResult<U256>;
    }

    impl ChainContext for Chain {
        type Checkpoint = ();
        fn checkpoint(&self);
        fn rollback(&mut self, checkpoint: ());
        fn timestamp(&self) -> u64;
    }
}
