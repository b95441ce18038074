//! In-process chain: a token ledger, a single-pool lending market with a flat
//! loan to value limit, and a rewards market paying out pre-seeded rewards.
//!
//! Used to drive the strategy end to end without a network. State is plain
//! data, so a checkpoint is a clone and a rollback restores it wholesale.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use super::{AssetLedger, ChainContext, LendingMarket, RewardsMarket};
use crate::{
    constants::percent,
    types::{AccountRisk, Amount, InterestRateMode, LedgerPosition, ReserveTokens},
    utils::{
        common::mul_div,
        error::{arithmetic_err, market_err, ManagerResult},
    },
};

/// Scale of the health factor
const HEALTH_FACTOR_ONE: u128 = 1_000_000_000_000_000_000;

/// Call that can be forced to fail once with [`InMemoryChain::fail_next`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailPoint {
    Transfer,
    Approve,
    Supply,
    Borrow,
    Repay,
    Withdraw,
    ClaimRewards,
}

#[derive(Clone, Debug, Default)]
struct ChainState {
    /// (asset, account) => balance
    balances: HashMap<(Address, Address), U256>,
    /// (asset, owner, spender) => allowance
    allowances: HashMap<(Address, Address, Address), U256>,
    /// (asset, account) => supplied
    supplied: HashMap<(Address, Address), U256>,
    /// (asset, account) => borrowed
    borrowed: HashMap<(Address, Address), U256>,
    /// account => rewards claimable in `reward_asset`
    pending_rewards: HashMap<Address, U256>,
    timestamp: u64,
}

#[derive(Clone, Debug)]
pub struct InMemoryChain {
    state: ChainState,
    /// Address of the lending pool, holds the supplied liquidity
    market: Address,
    /// Asset in which rewards are paid out
    reward_asset: Address,
    reserve_tokens: HashMap<Address, ReserveTokens>,
    /// Maximum loan to value in percent
    max_ltv: u64,
    /// Not part of the checkpointed state: a consumed failure stays consumed
    failures: Vec<FailPoint>,
}

impl InMemoryChain {
    pub fn new(market: Address, reward_asset: Address) -> Self {
        let state = ChainState {
            timestamp: chrono::Utc::now().timestamp().max(0) as u64,
            ..Default::default()
        };
        Self {
            state,
            market,
            reward_asset,
            reserve_tokens: HashMap::new(),
            max_ltv: 100,
            failures: Vec::new(),
        }
    }

    /// Registers the collateral/debt identifiers of `asset`
    pub fn list_reserve(&mut self, asset: Address, tokens: ReserveTokens) -> &mut Self {
        self.reserve_tokens.insert(asset, tokens);
        self
    }

    pub fn max_ltv(&mut self, max_ltv: u64) -> &mut Self {
        self.max_ltv = max_ltv;
        self
    }

    /// Credits `amount` of `asset` to `account` out of thin air
    pub fn mint(&mut self, asset: Address, account: Address, amount: U256) -> &mut Self {
        let balance = self.state.balances.entry((asset, account)).or_default();
        *balance = balance.saturating_add(amount);
        self
    }

    /// Adds claimable rewards for `account`
    pub fn add_rewards(&mut self, account: Address, amount: U256) -> &mut Self {
        let pending = self.state.pending_rewards.entry(account).or_default();
        *pending = pending.saturating_add(amount);
        self
    }

    /// Grows the debt of `account` as if interest had accrued
    pub fn accrue_debt(&mut self, asset: Address, account: Address, amount: U256) -> &mut Self {
        let debt = self.state.borrowed.entry((asset, account)).or_default();
        *debt = debt.saturating_add(amount);
        self
    }

    pub fn set_timestamp(&mut self, timestamp: u64) -> &mut Self {
        self.state.timestamp = timestamp;
        self
    }

    pub fn advance(&mut self, seconds: u64) -> &mut Self {
        self.state.timestamp = self.state.timestamp.saturating_add(seconds);
        self
    }

    /// Makes the next call of the given kind fail
    pub fn fail_next(&mut self, point: FailPoint) -> &mut Self {
        self.failures.push(point);
        self
    }

    pub fn allowance(&self, asset: Address, owner: Address, spender: Address) -> U256 {
        self.state
            .allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn check_failure(&mut self, point: FailPoint) -> ManagerResult<()> {
        if let Some(index) = self.failures.iter().position(|p| *p == point) {
            self.failures.remove(index);
            return Err(market_err(format!("Injected failure on {:?}.", point)));
        }
        Ok(())
    }

    fn balance(&self, asset: Address, account: Address) -> U256 {
        self.state
            .balances
            .get(&(asset, account))
            .copied()
            .unwrap_or_default()
    }

    fn move_tokens(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> ManagerResult<()> {
        let from_balance = self.balance(asset, from);
        let remaining = from_balance
            .checked_sub(amount)
            .ok_or_else(|| market_err("Transfer amount exceeds balance."))?;
        self.state.balances.insert((asset, from), remaining);
        let to_balance = self.balance(asset, to);
        self.state.balances.insert(
            (asset, to),
            to_balance
                .checked_add(amount)
                .ok_or_else(|| arithmetic_err("Balance overflowed."))?,
        );
        Ok(())
    }

    /// The market pulls tokens from `owner`, which requires an allowance
    fn spend_allowance(&mut self, asset: Address, owner: Address, amount: U256) -> ManagerResult<()> {
        let key = (asset, owner, self.market);
        let allowance = self.state.allowances.get(&key).copied().unwrap_or_default();
        if allowance == U256::MAX {
            return Ok(());
        }
        let remaining = allowance
            .checked_sub(amount)
            .ok_or_else(|| market_err("Transfer amount exceeds allowance."))?;
        self.state.allowances.insert(key, remaining);
        Ok(())
    }

    fn position(&self, asset: Address, account: Address) -> LedgerPosition {
        LedgerPosition {
            supplied: self
                .state
                .supplied
                .get(&(asset, account))
                .copied()
                .unwrap_or_default(),
            borrowed: self
                .state
                .borrowed
                .get(&(asset, account))
                .copied()
                .unwrap_or_default(),
        }
    }

    fn borrow_limit(&self, supplied: U256) -> ManagerResult<U256> {
        mul_div(supplied, U256::from(self.max_ltv), percent())
    }
}

impl AssetLedger for InMemoryChain {
    fn balance_of(&self, asset: Address, account: Address) -> ManagerResult<U256> {
        Ok(self.balance(asset, account))
    }

    fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> ManagerResult<()> {
        self.check_failure(FailPoint::Transfer)?;
        self.move_tokens(asset, from, to, amount)
    }

    fn approve(
        &mut self,
        asset: Address,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> ManagerResult<()> {
        self.check_failure(FailPoint::Approve)?;
        let value = match amount {
            Amount::Exact(value) => value,
            Amount::All => U256::MAX,
        };
        self.state.allowances.insert((asset, owner, spender), value);
        Ok(())
    }
}

impl LendingMarket for InMemoryChain {
    fn reserve_tokens(&self, asset: Address) -> ManagerResult<ReserveTokens> {
        self.reserve_tokens
            .get(&asset)
            .copied()
            .ok_or_else(|| market_err(format!("Asset {} is not listed.", asset)))
    }

    fn supply(&mut self, asset: Address, amount: U256, account: Address) -> ManagerResult<()> {
        self.check_failure(FailPoint::Supply)?;
        if amount.is_zero() {
            return Err(market_err("Supply amount was zero."));
        }
        self.spend_allowance(asset, account, amount)?;
        self.move_tokens(asset, account, self.market, amount)?;
        let supplied = self.state.supplied.entry((asset, account)).or_default();
        *supplied = supplied.saturating_add(amount);
        Ok(())
    }

    fn borrow(
        &mut self,
        asset: Address,
        amount: U256,
        _mode: InterestRateMode,
        account: Address,
    ) -> ManagerResult<()> {
        self.check_failure(FailPoint::Borrow)?;
        if amount.is_zero() {
            return Err(market_err("Borrow amount was zero."));
        }
        let position = self.position(asset, account);
        let new_debt = position
            .borrowed
            .checked_add(amount)
            .ok_or_else(|| arithmetic_err("Debt overflowed."))?;
        if new_debt > self.borrow_limit(position.supplied)? {
            return Err(market_err("Collateral cannot cover the new borrow."));
        }
        self.move_tokens(asset, self.market, account, amount)?;
        self.state.borrowed.insert((asset, account), new_debt);
        Ok(())
    }

    fn repay(
        &mut self,
        asset: Address,
        amount: Amount,
        _mode: InterestRateMode,
        account: Address,
    ) -> ManagerResult<U256> {
        self.check_failure(FailPoint::Repay)?;
        let debt = self.position(asset, account).borrowed;
        if debt.is_zero() {
            return Err(market_err("No debt to repay."));
        }
        let paid = match amount {
            Amount::Exact(value) => value.min(debt),
            Amount::All => debt,
        };
        self.spend_allowance(asset, account, paid)?;
        self.move_tokens(asset, account, self.market, paid)?;
        self.state.borrowed.insert((asset, account), debt - paid);
        Ok(paid)
    }

    fn withdraw(
        &mut self,
        asset: Address,
        amount: Amount,
        account: Address,
    ) -> ManagerResult<U256> {
        self.check_failure(FailPoint::Withdraw)?;
        let position = self.position(asset, account);
        let withdrawn = match amount {
            Amount::Exact(value) => value,
            Amount::All => position.supplied,
        };
        let remaining = position
            .supplied
            .checked_sub(withdrawn)
            .ok_or_else(|| market_err("Withdraw amount exceeds the supplied balance."))?;
        if position.borrowed > self.borrow_limit(remaining)? {
            return Err(market_err("Withdrawal would leave the debt undercollateralized."));
        }
        self.move_tokens(asset, self.market, account, withdrawn)?;
        self.state.supplied.insert((asset, account), remaining);
        Ok(withdrawn)
    }

    fn account_position(&self, asset: Address, account: Address) -> ManagerResult<LedgerPosition> {
        Ok(self.position(asset, account))
    }

    fn account_risk(&self, account: Address) -> ManagerResult<AccountRisk> {
        let (total_collateral, total_debt) = self
            .state
            .supplied
            .iter()
            .filter(|((_, holder), _)| *holder == account)
            .fold((U256::ZERO, U256::ZERO), |(coll, debt), ((asset, _), supplied)| {
                let borrowed = self
                    .state
                    .borrowed
                    .get(&(*asset, account))
                    .copied()
                    .unwrap_or_default();
                (coll.saturating_add(*supplied), debt.saturating_add(borrowed))
            });
        let limit = self.borrow_limit(total_collateral)?;
        let health_factor = if total_debt.is_zero() {
            U256::MAX
        } else {
            mul_div(limit, U256::from(HEALTH_FACTOR_ONE), total_debt)?
        };
        Ok(AccountRisk {
            total_collateral,
            total_debt,
            available_borrows: limit.saturating_sub(total_debt),
            max_ltv: self.max_ltv,
            health_factor,
        })
    }
}

impl RewardsMarket for InMemoryChain {
    fn claim_rewards(
        &mut self,
        _assets: &[Address],
        amount: Amount,
        recipient: Address,
    ) -> ManagerResult<U256> {
        self.check_failure(FailPoint::ClaimRewards)?;
        let pending = self
            .state
            .pending_rewards
            .get(&recipient)
            .copied()
            .unwrap_or_default();
        let claimed = match amount {
            Amount::Exact(value) => value.min(pending),
            Amount::All => pending,
        };
        self.state.pending_rewards.insert(recipient, pending - claimed);
        let reward_asset = self.reward_asset;
        self.mint(reward_asset, recipient, claimed);
        Ok(claimed)
    }

    fn pending_rewards(&self, _assets: &[Address], account: Address) -> ManagerResult<U256> {
        Ok(self
            .state
            .pending_rewards
            .get(&account)
            .copied()
            .unwrap_or_default())
    }
}

impl ChainContext for InMemoryChain {
    type Checkpoint = ChainSnapshot;

    fn checkpoint(&self) -> Self::Checkpoint {
        ChainSnapshot(self.state.clone())
    }

    fn rollback(&mut self, checkpoint: Self::Checkpoint) {
        self.state = checkpoint.0;
    }

    fn timestamp(&self) -> u64 {
        self.state.timestamp
    }
}

/// Opaque copy of the chain state taken by [`ChainContext::checkpoint`]
#[derive(Clone, Debug)]
pub struct ChainSnapshot(ChainState);
