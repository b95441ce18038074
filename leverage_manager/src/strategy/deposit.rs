use alloy_primitives::{Address, U256};

use crate::{
    access::VaultCap,
    chain::Chain,
    journal::LogType,
    types::StrategyEvent,
    utils::error::ManagerResult,
};

use super::executable::LeveragedStrategy;

impl<C: Chain> LeveragedStrategy<C> {
    /// Puts the unlocked balance to work. Called after the vault sent funds.
    pub fn deposit(&mut self) -> ManagerResult<()> {
        self.execute("deposit", |strategy| {
            strategy.ensure_active("deposit into")?;

            let available = strategy.available_assets()?;
            if available.is_zero() || available < strategy.settings.min_leverage {
                return Ok(());
            }
            strategy.leverage(available)?;

            let tvl = strategy.total_managed_assets()?;
            strategy.journal.append_note(
                Ok(()),
                LogType::Deposit,
                format!("Deposited {}, managed assets now {}.", available, tvl),
            );
            strategy.emit(StrategyEvent::Deposit { tvl });
            Ok(())
        })
    }

    /// Hook run by the vault ahead of a user deposit.
    /// Harvests on behalf of `requester` when harvest-on-deposit is enabled.
    pub fn before_deposit(&mut self, _cap: &VaultCap, requester: Address) -> ManagerResult<U256> {
        self.execute("before deposit", |strategy| {
            if !strategy.data.harvest_on_deposit {
                return Ok(U256::ZERO);
            }
            strategy.run_harvest(requester)
        })
    }
}
