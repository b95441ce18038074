//! Leverage manager for a single-asset lending strategy.
//!
//! The strategy supplies a base asset to a lending market, borrows it back and
//! re-supplies it over a bounded number of rounds, harvests the market's
//! incentive rewards into the position, and serves withdrawals for its vault.

pub mod access;
pub mod chain;
pub mod constants;
pub mod journal;
pub mod strategy;
pub mod types;
mod utils;

pub use access::{ManagerCap, Roles, VaultCap};
pub use chain::{memory::InMemoryChain, AssetLedger, Chain, ChainContext, LendingMarket, RewardsMarket};
pub use strategy::{FeeBreakdown, LeveragedStrategy, SharedStrategy};
pub use types::{
    Amount, StrategyConfig, StrategyEvent, StrategyInput, StrategyQuery, StrategyStatus,
};
pub use utils::error::{ManagerError, ManagerResult};
