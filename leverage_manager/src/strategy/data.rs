//! Mutable strategy data

use crate::types::{StrategyConfig, StrategyStatus, WithdrawalFeeConfig};

use super::reserves::ReserveTracker;

/// Struct containing all mutable data of a strategy
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrategyData {
    /// Share of each ladder round that is borrowed back, in percent
    pub borrow_rate: u64,
    /// Number of supply/borrow rounds of the ladder
    pub borrow_depth: u8,
    /// Base asset locked by the ladder
    pub reserves: ReserveTracker,
    /// Timestamp of the last harvest that collected income. Denominated in seconds.
    pub last_harvest: u64,
    pub status: StrategyStatus,
    /// Harvest before every vault deposit
    pub harvest_on_deposit: bool,
    /// Withdrawal fee currently charged. Zero while `harvest_on_deposit` is on.
    pub withdrawal_fee: WithdrawalFeeConfig,
}

impl StrategyData {
    pub fn from_config(config: &StrategyConfig) -> Self {
        let mut data = Self::default();
        data.borrow_rate(config.borrow_rate)
            .borrow_depth(config.borrow_depth)
            .withdrawal_fee(config.withdrawal_fee);
        data
    }

    /// Sets the borrow rate.
    pub fn borrow_rate(&mut self, borrow_rate: u64) -> &mut Self {
        self.borrow_rate = borrow_rate;
        self
    }

    /// Sets the borrow depth.
    pub fn borrow_depth(&mut self, borrow_depth: u8) -> &mut Self {
        self.borrow_depth = borrow_depth;
        self
    }

    /// Sets the last harvest timestamp.
    pub fn last_harvest(&mut self, last_harvest: u64) -> &mut Self {
        self.last_harvest = last_harvest;
        self
    }

    /// Sets the lifecycle status.
    pub fn status(&mut self, status: StrategyStatus) -> &mut Self {
        self.status = status;
        self
    }

    /// Sets the withdrawal fee currently charged.
    pub fn withdrawal_fee(&mut self, withdrawal_fee: WithdrawalFeeConfig) -> &mut Self {
        self.withdrawal_fee = withdrawal_fee;
        self
    }
}
