use alloy_primitives::{Address, U256};
use candid::{CandidType, Nat};
use serde::Deserialize;

use crate::{
    access::Roles,
    constants::{
        BORROW_DEPTH_MAX, DEFAULT_CALL_FEE_SHARE, DEFAULT_FEE_SHARE_DENOMINATOR,
        DEFAULT_PROTOCOL_FEE_SHARE, DEFAULT_STRATEGIST_FEE_SHARE, DEFAULT_WITHDRAWAL_FEE, PERCENT,
        WITHDRAWAL_FEE_DENOMINATOR,
    },
    utils::{
        common::{string_to_address, string_to_u256},
        error::{config_err, ManagerError, ManagerResult},
    },
};

/// Amount passed to the market for repay, withdraw, claim and approve calls.
/// `All` replaces the "max uint" sentinel of EVM lending pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Amount {
    Exact(U256),
    All,
}

/// Interest rate mode of a borrow position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InterestRateMode {
    Stable,
    #[default]
    Variable,
}

/// The strategy's account at the lending market. Always re-read, never cached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedgerPosition {
    pub supplied: U256,
    pub borrowed: U256,
}

/// Aggregate risk metrics of an account at the lending market
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccountRisk {
    pub total_collateral: U256,
    pub total_debt: U256,
    pub available_borrows: U256,
    /// Maximum loan to value, in percent
    pub max_ltv: u64,
    /// Collateral over debt scaled by 1e18, `U256::MAX` without debt
    pub health_factor: U256,
}

/// Collateral and debt position identifiers of a base asset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReserveTokens {
    pub collateral: Address,
    pub debt: Address,
}

/// Split of the harvest fee between the three recipients
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSplit {
    pub call_fee: u64,
    pub protocol_fee: u64,
    pub strategist_fee: u64,
    pub denominator: u64,
}

impl Default for FeeSplit {
    fn default() -> Self {
        Self {
            call_fee: DEFAULT_CALL_FEE_SHARE,
            protocol_fee: DEFAULT_PROTOCOL_FEE_SHARE,
            strategist_fee: DEFAULT_STRATEGIST_FEE_SHARE,
            denominator: DEFAULT_FEE_SHARE_DENOMINATOR,
        }
    }
}

impl FeeSplit {
    /// The shares must not exceed the denominator, otherwise a recipient would be shorted.
    pub fn validate(&self) -> ManagerResult<()> {
        if self.denominator == 0 {
            return Err(config_err("Fee share denominator was zero."));
        }
        let total = self
            .call_fee
            .checked_add(self.protocol_fee)
            .and_then(|sum| sum.checked_add(self.strategist_fee))
            .ok_or_else(|| config_err("Fee shares overflowed."))?;
        if total > self.denominator {
            return Err(config_err(format!(
                "Fee shares sum to {} which exceeds the denominator {}.",
                total, self.denominator
            )));
        }
        Ok(())
    }
}

/// Fee retained by the strategy on regular withdrawals
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawalFeeConfig {
    pub rate: u64,
    pub denominator: u64,
}

impl Default for WithdrawalFeeConfig {
    fn default() -> Self {
        Self {
            rate: DEFAULT_WITHDRAWAL_FEE,
            denominator: WITHDRAWAL_FEE_DENOMINATOR,
        }
    }
}

impl WithdrawalFeeConfig {
    pub fn validate(&self) -> ManagerResult<()> {
        if self.denominator == 0 || self.rate > self.denominator {
            return Err(config_err(format!(
                "Withdrawal fee {}/{} is invalid.",
                self.rate, self.denominator
            )));
        }
        Ok(())
    }
}

/// Lifecycle of a strategy
#[derive(Clone, Copy, CandidType, Debug, Default, Deserialize, PartialEq, Eq)]
pub enum StrategyStatus {
    #[default]
    Active,
    Paused,
    /// Terminal. The position was emptied into the vault during a migration.
    Retired,
}

/// Events signalled by the strategy, drained by the caller
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StrategyEvent {
    Deposit {
        tvl: U256,
    },
    Withdraw {
        tvl: U256,
    },
    StratHarvest {
        harvester: Address,
        want_harvested: U256,
        tvl: U256,
    },
    ChargedFees {
        call_fees: U256,
        protocol_fees: U256,
        strategist_fees: U256,
    },
    StratRebalance {
        borrow_rate: u64,
        borrow_depth: u8,
    },
    Paused,
    Unpaused,
    Retired,
}

/// Validated construction configuration
#[derive(Clone, Debug, PartialEq)]
pub struct StrategyConfig {
    /// The strategy's own account at the market and the token ledger
    pub account: Address,
    pub want: Address,
    pub borrow_rate: u64,
    pub borrow_rate_max: u64,
    pub borrow_depth: u8,
    pub min_leverage: U256,
    pub lending_market: Address,
    pub rewards_market: Address,
    pub roles: Roles,
    pub fee_split: FeeSplit,
    pub withdrawal_fee: WithdrawalFeeConfig,
}

impl StrategyConfig {
    /// Checks the rate and depth maxima and the fee configuration.
    pub fn validate(&self) -> ManagerResult<()> {
        if self.borrow_rate_max > PERCENT {
            return Err(config_err(format!(
                "Max borrow rate {} exceeds {}%.",
                self.borrow_rate_max, PERCENT
            )));
        }
        check_risk_parameters(self.borrow_rate, self.borrow_depth, self.borrow_rate_max)?;
        self.fee_split.validate()?;
        self.withdrawal_fee.validate()
    }
}

/// Rejects a borrow rate above `borrow_rate_max` or a depth above `BORROW_DEPTH_MAX`.
pub fn check_risk_parameters(
    borrow_rate: u64,
    borrow_depth: u8,
    borrow_rate_max: u64,
) -> ManagerResult<()> {
    if borrow_rate > borrow_rate_max {
        return Err(config_err(format!(
            "Borrow rate {} exceeds the max borrow rate {}.",
            borrow_rate, borrow_rate_max
        )));
    }
    if borrow_depth > BORROW_DEPTH_MAX {
        return Err(config_err(format!(
            "Borrow depth {} exceeds the max borrow depth {}.",
            borrow_depth, BORROW_DEPTH_MAX
        )));
    }
    Ok(())
}

/// External configuration record, addresses and amounts as strings.
#[derive(CandidType, Clone, Debug, Deserialize)]
pub struct StrategyInput {
    pub account: String,
    pub want: String,
    pub borrow_rate: u64,
    pub borrow_rate_max: u64,
    pub borrow_depth: u8,
    pub min_leverage: String,
    pub lending_market: String,
    pub rewards_market: String,
    pub vault: String,
    pub owner: String,
    pub keeper: String,
    pub strategist: String,
    pub protocol_fee_recipient: String,
    pub call_fee_share: Option<u64>,
    pub protocol_fee_share: Option<u64>,
    pub strategist_fee_share: Option<u64>,
    pub fee_share_denominator: Option<u64>,
    pub withdrawal_fee: Option<u64>,
    pub withdrawal_fee_denominator: Option<u64>,
}

impl StrategyInput {
    /// Parses the configuration from its JSON representation.
    pub fn from_json(json: &str) -> ManagerResult<Self> {
        serde_json::from_str(json).map_err(|err| ManagerError::DecodingError(err.to_string()))
    }
}

impl TryFrom<StrategyInput> for StrategyConfig {
    type Error = ManagerError;

    fn try_from(value: StrategyInput) -> Result<Self, Self::Error> {
        let default_split = FeeSplit::default();
        let default_withdrawal_fee = WithdrawalFeeConfig::default();

        let config = Self {
            account: string_to_address(value.account)?,
            want: string_to_address(value.want)?,
            borrow_rate: value.borrow_rate,
            borrow_rate_max: value.borrow_rate_max,
            borrow_depth: value.borrow_depth,
            min_leverage: string_to_u256(&value.min_leverage)?,
            lending_market: string_to_address(value.lending_market)?,
            rewards_market: string_to_address(value.rewards_market)?,
            roles: Roles {
                owner: string_to_address(value.owner)?,
                keeper: string_to_address(value.keeper)?,
                vault: string_to_address(value.vault)?,
                strategist: string_to_address(value.strategist)?,
                protocol_fee_recipient: string_to_address(value.protocol_fee_recipient)?,
            },
            fee_split: FeeSplit {
                call_fee: value.call_fee_share.unwrap_or(default_split.call_fee),
                protocol_fee: value.protocol_fee_share.unwrap_or(default_split.protocol_fee),
                strategist_fee: value
                    .strategist_fee_share
                    .unwrap_or(default_split.strategist_fee),
                denominator: value
                    .fee_share_denominator
                    .unwrap_or(default_split.denominator),
            },
            withdrawal_fee: WithdrawalFeeConfig {
                rate: value.withdrawal_fee.unwrap_or(default_withdrawal_fee.rate),
                denominator: value
                    .withdrawal_fee_denominator
                    .unwrap_or(default_withdrawal_fee.denominator),
            },
        };
        config.validate()?;
        Ok(config)
    }
}

/// Candid view of a strategy's settings and state
#[derive(CandidType, Clone, Debug, Deserialize, PartialEq)]
pub struct StrategyQuery {
    pub account: String,
    pub want: String,
    pub collateral_token: String,
    pub debt_token: String,
    pub borrow_rate: u64,
    pub borrow_rate_max: u64,
    pub borrow_depth: u8,
    pub min_leverage: Nat,
    pub reserves: Nat,
    pub last_harvest: u64,
    pub status: StrategyStatus,
    pub harvest_on_deposit: bool,
    pub withdrawal_fee: u64,
}
