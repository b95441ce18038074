//! Strategy settings, fixed at construction

use alloy_primitives::{Address, U256};

use crate::{
    access::Roles,
    types::{FeeSplit, ReserveTokens, StrategyConfig, WithdrawalFeeConfig},
};

/// Immutable settings and collaborator addresses of a strategy
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrategySettings {
    /// The strategy's own account at the market and the token ledger
    pub account: Address,
    /// Base asset the strategy manages
    pub want: Address,
    /// Collateral position identifier of `want` at the lending market
    pub collateral_token: Address,
    /// Debt position identifier of `want` at the lending market
    pub debt_token: Address,
    /// Lending market contract address
    pub lending_market: Address,
    /// Rewards market contract address
    pub rewards_market: Address,
    /// Upper bound of the borrow rate, in percent
    pub borrow_rate_max: u64,
    /// Smallest amount worth laddering
    pub min_leverage: U256,
    /// Privileged accounts and fee recipients
    pub roles: Roles,
    /// Split of the harvest fee
    pub fee_split: FeeSplit,
    /// Configured withdrawal fee
    pub withdrawal_fee: WithdrawalFeeConfig,
}

impl StrategySettings {
    /// Builds the settings from a validated configuration and the market lookup of `want`.
    pub fn from_config(config: &StrategyConfig, reserve_tokens: ReserveTokens) -> Self {
        let mut settings = Self::default();
        settings
            .account(config.account)
            .want(config.want)
            .collateral_token(reserve_tokens.collateral)
            .debt_token(reserve_tokens.debt)
            .lending_market(config.lending_market)
            .rewards_market(config.rewards_market)
            .borrow_rate_max(config.borrow_rate_max)
            .min_leverage(config.min_leverage)
            .roles(config.roles)
            .fee_split(config.fee_split)
            .withdrawal_fee(config.withdrawal_fee);
        settings
    }

    /// Positions whose incentives are claimed on harvest
    pub fn reward_assets(&self) -> [Address; 2] {
        [self.collateral_token, self.debt_token]
    }

    /// Sets the strategy account.
    pub fn account(&mut self, account: Address) -> &mut Self {
        self.account = account;
        self
    }

    /// Sets the base asset.
    pub fn want(&mut self, want: Address) -> &mut Self {
        self.want = want;
        self
    }

    /// Sets the collateral position identifier.
    pub fn collateral_token(&mut self, collateral_token: Address) -> &mut Self {
        self.collateral_token = collateral_token;
        self
    }

    /// Sets the debt position identifier.
    pub fn debt_token(&mut self, debt_token: Address) -> &mut Self {
        self.debt_token = debt_token;
        self
    }

    /// Sets the lending market contract address.
    pub fn lending_market(&mut self, lending_market: Address) -> &mut Self {
        self.lending_market = lending_market;
        self
    }

    /// Sets the rewards market contract address.
    pub fn rewards_market(&mut self, rewards_market: Address) -> &mut Self {
        self.rewards_market = rewards_market;
        self
    }

    /// Sets the max borrow rate.
    pub fn borrow_rate_max(&mut self, borrow_rate_max: u64) -> &mut Self {
        self.borrow_rate_max = borrow_rate_max;
        self
    }

    /// Sets the minimum leverage amount.
    pub fn min_leverage(&mut self, min_leverage: U256) -> &mut Self {
        self.min_leverage = min_leverage;
        self
    }

    /// Sets the roles.
    pub fn roles(&mut self, roles: Roles) -> &mut Self {
        self.roles = roles;
        self
    }

    /// Sets the fee split.
    pub fn fee_split(&mut self, fee_split: FeeSplit) -> &mut Self {
        self.fee_split = fee_split;
        self
    }

    /// Sets the configured withdrawal fee.
    pub fn withdrawal_fee(&mut self, withdrawal_fee: WithdrawalFeeConfig) -> &mut Self {
        self.withdrawal_fee = withdrawal_fee;
        self
    }
}
