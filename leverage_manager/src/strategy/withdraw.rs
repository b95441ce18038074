use alloy_primitives::{Address, U256};

use crate::{
    access::VaultCap,
    chain::Chain,
    journal::LogType,
    types::{StrategyEvent, StrategyStatus},
    utils::{
        common::{checked_sub, mul_div},
        error::ManagerResult,
    },
};

use super::executable::LeveragedStrategy;

impl<C: Chain> LeveragedStrategy<C> {
    /// Sends up to `amount` of base asset to the vault on behalf of `requester`.
    /// Unwinds the position first when the unlocked balance cannot cover the request.
    ///
    /// # Returns
    /// * `Ok(net)` - Amount transferred to the vault, after the withdrawal fee
    pub fn withdraw(
        &mut self,
        _cap: &VaultCap,
        amount: U256,
        requester: Address,
    ) -> ManagerResult<U256> {
        self.execute("withdraw", |strategy| {
            strategy.ensure_not_retired("withdraw from")?;

            let mut available = strategy.available_assets()?;
            if available < amount {
                strategy.deleverage()?;
                available = strategy.available_assets()?;
            }
            let served = available.min(amount);

            let paused = strategy.data.status == StrategyStatus::Paused;
            let fee = if paused || strategy.settings.roles.is_owner(requester) {
                U256::ZERO
            } else {
                let withdrawal_fee = strategy.data.withdrawal_fee;
                mul_div(
                    served,
                    U256::from(withdrawal_fee.rate),
                    U256::from(withdrawal_fee.denominator),
                )?
            };
            let net = checked_sub(served, fee, "Served minus withdrawal fee")?;

            if !net.is_zero() {
                strategy.chain.transfer(
                    strategy.settings.want,
                    strategy.settings.account,
                    strategy.settings.roles.vault,
                    net,
                )?;
            }

            if !paused {
                let available = strategy.available_assets()?;
                strategy.leverage(available)?;
            }

            let tvl = strategy.total_managed_assets()?;
            strategy.journal.append_note(
                Ok(()),
                LogType::Withdrawal,
                format!(
                    "Withdrew {} of {} requested for {}, fee {}.",
                    net, amount, requester, fee
                ),
            );
            strategy.emit(StrategyEvent::Withdraw { tvl });
            Ok(net)
        })
    }
}
