pub(crate) mod data;
pub(crate) mod reserves;
pub(crate) mod settings;
// As a safety measure, only the strategy modules reach into the executable strategy's fields.
pub(crate) mod executable;

mod deposit;
mod fees;
mod harvest;
mod lifecycle;
mod position;
mod rebalance;
mod shared;
mod withdraw;

#[cfg(test)]
pub(crate) mod fixtures;

pub use data::StrategyData;
pub use executable::LeveragedStrategy;
pub use fees::FeeBreakdown;
pub use reserves::ReserveTracker;
pub use settings::StrategySettings;
pub use shared::SharedStrategy;
