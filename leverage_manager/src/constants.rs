//! Leverage Manager's Constants

use alloy_primitives::U256;

/// Denominator of `borrow_rate`, which is expressed in whole percent
pub const PERCENT: u64 = 100;
pub fn percent() -> U256 {
    U256::from(PERCENT)
}

/// Hard ceiling on the number of supply/borrow rounds of the leverage ladder
pub const BORROW_DEPTH_MAX: u8 = 10;

/// Ceiling on the number of repay/withdraw rounds of a full unwind
pub const MAX_DELEVERAGE_ROUNDS: u32 = 64;

/// Total fee taken on harvested income: 45 / 1000 => 4.5%
pub const HARVEST_FEE_NUMERATOR: u64 = 45;
pub const HARVEST_FEE_DENOMINATOR: u64 = 1_000;
pub fn harvest_fee_numerator() -> U256 {
    U256::from(HARVEST_FEE_NUMERATOR)
}
pub fn harvest_fee_denominator() -> U256 {
    U256::from(HARVEST_FEE_DENOMINATOR)
}

/// Default fee shares, expressed over `DEFAULT_FEE_SHARE_DENOMINATOR`
pub const DEFAULT_CALL_FEE_SHARE: u64 = 111;
pub const DEFAULT_STRATEGIST_FEE_SHARE: u64 = 112;
pub const DEFAULT_FEE_SHARE_DENOMINATOR: u64 = 1_000;
pub const DEFAULT_PROTOCOL_FEE_SHARE: u64 =
    DEFAULT_FEE_SHARE_DENOMINATOR - DEFAULT_CALL_FEE_SHARE - DEFAULT_STRATEGIST_FEE_SHARE;

/// Default withdrawal fee: 10 / 10_000 => 0.1%
pub const DEFAULT_WITHDRAWAL_FEE: u64 = 10;
pub const WITHDRAWAL_FEE_DENOMINATOR: u64 = 10_000;

/// Max number of journal entries kept in memory
pub const JOURNAL_CAPACITY: usize = 300;
