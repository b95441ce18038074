//! Harvest fee computation and distribution

use alloy_primitives::{Address, U256};

use crate::{
    chain::Chain,
    constants::{harvest_fee_denominator, harvest_fee_numerator},
    journal::LogType,
    types::{FeeSplit, StrategyEvent},
    utils::{common::mul_div, error::ManagerResult},
};

use super::executable::LeveragedStrategy;

/// Fee taken on a harvest and its split between the recipients.
/// Whatever `total` leaves over after the three shares stays with the strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeBreakdown {
    pub total: U256,
    pub call_fee: U256,
    pub protocol_fee: U256,
    pub strategist_fee: U256,
}

impl FeeBreakdown {
    pub fn compute(harvested: U256, split: &FeeSplit) -> ManagerResult<Self> {
        let total = mul_div(
            harvested,
            harvest_fee_numerator(),
            harvest_fee_denominator(),
        )?;
        let denominator = U256::from(split.denominator);
        let share = |part: u64| mul_div(total, U256::from(part), denominator);

        Ok(Self {
            total,
            call_fee: share(split.call_fee)?,
            protocol_fee: share(split.protocol_fee)?,
            strategist_fee: share(split.strategist_fee)?,
        })
    }

    /// Sum of the transferred shares
    pub fn distributed(&self) -> U256 {
        self.call_fee
            .saturating_add(self.protocol_fee)
            .saturating_add(self.strategist_fee)
    }
}

impl<C: Chain> LeveragedStrategy<C> {
    /// Pays the harvest fee out of `harvested` to the call-fee recipient, the
    /// protocol and the strategist.
    pub(crate) fn charge_fees(
        &mut self,
        harvested: U256,
        call_fee_recipient: Address,
    ) -> ManagerResult<FeeBreakdown> {
        let fees = FeeBreakdown::compute(harvested, &self.settings.fee_split)?;
        let roles = self.settings.roles;

        for (recipient, amount) in [
            (call_fee_recipient, fees.call_fee),
            (roles.protocol_fee_recipient, fees.protocol_fee),
            (roles.strategist, fees.strategist_fee),
        ] {
            if amount.is_zero() {
                continue;
            }
            self.chain
                .transfer(self.settings.want, self.settings.account, recipient, amount)?;
        }

        self.journal.append_note(
            Ok(()),
            LogType::FeeCharge,
            format!(
                "Charged {} on a harvest of {}: call {}, protocol {}, strategist {}.",
                fees.total, harvested, fees.call_fee, fees.protocol_fee, fees.strategist_fee
            ),
        );
        self.emit(StrategyEvent::ChargedFees {
            call_fees: fees.call_fee,
            protocol_fees: fees.protocol_fee,
            strategist_fees: fees.strategist_fee,
        });
        Ok(fees)
    }

    /// Call fee a harvest would pay right now on the pending rewards
    pub fn call_reward(&self) -> ManagerResult<U256> {
        let pending = self.rewards_available()?;
        Ok(FeeBreakdown::compute(pending, &self.settings.fee_split)?.call_fee)
    }
}
