//! Shared accounts and constructors for the strategy tests

use alloy_primitives::{Address, U256};

use crate::{
    access::Roles,
    chain::{memory::InMemoryChain, mock::MockChain},
    types::{FeeSplit, ReserveTokens, StrategyConfig, WithdrawalFeeConfig},
};

use super::{data::StrategyData, executable::LeveragedStrategy, settings::StrategySettings};

pub const ACCOUNT: Address = Address::repeat_byte(0x01);
pub const WANT: Address = Address::repeat_byte(0x02);
pub const COLLATERAL_TOKEN: Address = Address::repeat_byte(0x03);
pub const DEBT_TOKEN: Address = Address::repeat_byte(0x04);
pub const MARKET: Address = Address::repeat_byte(0x05);
pub const REWARDS: Address = Address::repeat_byte(0x06);
pub const VAULT: Address = Address::repeat_byte(0x07);
pub const OWNER: Address = Address::repeat_byte(0x08);
pub const KEEPER: Address = Address::repeat_byte(0x09);
pub const STRATEGIST: Address = Address::repeat_byte(0x0a);
pub const PROTOCOL: Address = Address::repeat_byte(0x0b);
pub const HARVESTER: Address = Address::repeat_byte(0x0c);
pub const USER: Address = Address::repeat_byte(0x0d);
pub const OUTSIDER: Address = Address::repeat_byte(0xee);

pub const RATE_MAX: u64 = 75;
pub const MIN_LEVERAGE: u64 = 100;

pub fn roles() -> Roles {
    Roles {
        owner: OWNER,
        keeper: KEEPER,
        vault: VAULT,
        strategist: STRATEGIST,
        protocol_fee_recipient: PROTOCOL,
    }
}

pub fn reserve_tokens() -> ReserveTokens {
    ReserveTokens {
        collateral: COLLATERAL_TOKEN,
        debt: DEBT_TOKEN,
    }
}

pub fn chain() -> InMemoryChain {
    let mut chain = InMemoryChain::new(MARKET, WANT);
    chain
        .list_reserve(WANT, reserve_tokens())
        .set_timestamp(1_700_000_000);
    chain
}

pub fn config(borrow_rate: u64, borrow_depth: u8) -> StrategyConfig {
    StrategyConfig {
        account: ACCOUNT,
        want: WANT,
        borrow_rate,
        borrow_rate_max: RATE_MAX,
        borrow_depth,
        min_leverage: U256::from(MIN_LEVERAGE),
        lending_market: MARKET,
        rewards_market: REWARDS,
        roles: roles(),
        fee_split: FeeSplit::default(),
        withdrawal_fee: WithdrawalFeeConfig::default(),
    }
}

pub fn strategy(borrow_rate: u64, borrow_depth: u8) -> LeveragedStrategy<InMemoryChain> {
    LeveragedStrategy::new(chain(), config(borrow_rate, borrow_depth))
        .expect("fixture configuration is valid")
}

/// Strategy holding `amount` of idle base asset, as if the vault had just sent it
pub fn funded_strategy(
    borrow_rate: u64,
    borrow_depth: u8,
    amount: u64,
) -> LeveragedStrategy<InMemoryChain> {
    let mut strategy = strategy(borrow_rate, borrow_depth);
    strategy.chain_mut().mint(WANT, ACCOUNT, U256::from(amount));
    strategy
}

/// Funded strategy whose idle balance is already laddered
pub fn leveraged_strategy(
    borrow_rate: u64,
    borrow_depth: u8,
    amount: u64,
) -> LeveragedStrategy<InMemoryChain> {
    let mut strategy = funded_strategy(borrow_rate, borrow_depth, amount);
    strategy.deposit().expect("deposit succeeds");
    strategy.drain_events();
    strategy
}

/// Strategy over a mocked chain, skipping construction so no call is expected up front
pub fn mock_strategy(
    borrow_rate: u64,
    borrow_depth: u8,
    chain: MockChain,
) -> LeveragedStrategy<MockChain> {
    let config = config(borrow_rate, borrow_depth);
    let settings = StrategySettings::from_config(&config, reserve_tokens());
    let data = StrategyData::from_config(&config);
    LeveragedStrategy::assemble(settings, data, chain)
}
