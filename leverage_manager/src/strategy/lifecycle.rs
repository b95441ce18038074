//! Lifecycle of a strategy
//!
//! ```plain
//!            pause / panic
//!   ┌────────┐ ──────────► ┌────────┐
//!   │ Active │             │ Paused │
//!   └────────┘ ◄────────── └────────┘
//!       │        unpause        │
//!       │                       │
//!       └──── retire ───┬───────┘
//!                       ▼
//!                  ┌─────────┐
//!                  │ Retired │  terminal
//!                  └─────────┘
//! ```

use alloy_primitives::U256;

use crate::{
    access::{ManagerCap, VaultCap},
    chain::Chain,
    journal::LogType,
    types::{Amount, StrategyEvent, StrategyStatus, WithdrawalFeeConfig},
    utils::error::{ManagerError, ManagerResult},
};

use super::executable::LeveragedStrategy;

impl<C: Chain> LeveragedStrategy<C> {
    /// Lets the lending market pull the base asset for supply and repay calls.
    pub(crate) fn give_allowances(&mut self) -> ManagerResult<()> {
        self.chain.approve(
            self.settings.want,
            self.settings.account,
            self.settings.lending_market,
            Amount::All,
        )
    }

    pub(crate) fn revoke_allowances(&mut self) -> ManagerResult<()> {
        self.chain.approve(
            self.settings.want,
            self.settings.account,
            self.settings.lending_market,
            Amount::Exact(U256::ZERO),
        )
    }

    /// Unwinds the position, revokes the market allowance and stops deposits and harvests.
    pub fn pause(&mut self, _cap: &ManagerCap) -> ManagerResult<()> {
        self.execute("pause", |strategy| {
            strategy.ensure_active("pause")?;
            strategy.deleverage()?;
            strategy.enter_paused()
        })
    }

    /// Restores the allowance and re-leverages whatever is unlocked.
    pub fn unpause(&mut self, _cap: &ManagerCap) -> ManagerResult<()> {
        self.execute("unpause", |strategy| {
            if strategy.data.status != StrategyStatus::Paused {
                return Err(ManagerError::InvalidState(format!(
                    "Cannot unpause while the strategy is {:?}.",
                    strategy.data.status
                )));
            }
            strategy.give_allowances()?;
            strategy.data.status(StrategyStatus::Active);

            let available = strategy.available_assets()?;
            strategy.leverage(available)?;

            strategy
                .journal
                .append_note(Ok(()), LogType::Lifecycle, "Strategy unpaused.");
            strategy.emit(StrategyEvent::Unpaused);
            Ok(())
        })
    }

    /// Emergency exit: unwinds everything and pauses.
    /// Calling it again on a paused strategy only re-runs the unwind.
    pub fn panic(&mut self, _cap: &ManagerCap) -> ManagerResult<()> {
        self.execute("panic", |strategy| {
            strategy.ensure_not_retired("panic")?;
            strategy.deleverage()?;
            if strategy.data.status == StrategyStatus::Active {
                strategy.enter_paused()?;
            }
            strategy
                .journal
                .append_note(Ok(()), LogType::Lifecycle, "Panic unwind completed.");
            Ok(())
        })
    }

    /// Moves every asset back to the vault and freezes the strategy for good.
    pub fn retire(&mut self, _cap: &VaultCap) -> ManagerResult<()> {
        self.execute("retire", |strategy| {
            strategy.ensure_not_retired("retire")?;
            strategy.deleverage()?;

            let balance = strategy.idle_assets()?;
            if !balance.is_zero() {
                strategy.chain.transfer(
                    strategy.settings.want,
                    strategy.settings.account,
                    strategy.settings.roles.vault,
                    balance,
                )?;
            }
            strategy.data.status(StrategyStatus::Retired);

            strategy.journal.append_note(
                Ok(()),
                LogType::Lifecycle,
                format!("Strategy retired, {} returned to the vault.", balance),
            );
            strategy.emit(StrategyEvent::Retired);
            Ok(())
        })
    }

    /// Enabling harvest-on-deposit waives the withdrawal fee, disabling it
    /// restores the configured one.
    pub fn set_harvest_on_deposit(&mut self, _cap: &ManagerCap, enabled: bool) -> ManagerResult<()> {
        self.execute("set harvest on deposit", |strategy| {
            strategy.ensure_not_retired("configure")?;
            let configured = strategy.settings.withdrawal_fee;
            let withdrawal_fee = if enabled {
                WithdrawalFeeConfig {
                    rate: 0,
                    ..configured
                }
            } else {
                configured
            };
            strategy.data.harvest_on_deposit = enabled;
            strategy.data.withdrawal_fee(withdrawal_fee);

            strategy.journal.append_note(
                Ok(()),
                LogType::Info,
                format!(
                    "Harvest on deposit {}, withdrawal fee {}/{}.",
                    enabled, withdrawal_fee.rate, withdrawal_fee.denominator
                ),
            );
            Ok(())
        })
    }

    fn enter_paused(&mut self) -> ManagerResult<()> {
        self.revoke_allowances()?;
        self.data.status(StrategyStatus::Paused);
        self.journal
            .append_note(Ok(()), LogType::Lifecycle, "Strategy paused.");
        self.emit(StrategyEvent::Paused);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chain::AssetLedger,
        strategy::fixtures::{self, *},
        types::LedgerPosition,
    };

    fn manager() -> ManagerCap {
        roles().only_manager(OWNER).unwrap()
    }

    #[test]
    fn test_pause_unwinds_and_revokes() {
        let mut strategy = fixtures::leveraged_strategy(70, 3, 1_000);

        strategy.pause(&manager()).unwrap();

        assert_eq!(strategy.status(), StrategyStatus::Paused);
        assert_eq!(strategy.user_reserves().unwrap(), LedgerPosition::default());
        assert_eq!(strategy.idle_assets().unwrap(), U256::from(1_000));
        assert_eq!(
            strategy.chain().allowance(WANT, ACCOUNT, MARKET),
            U256::ZERO
        );
        assert_eq!(strategy.drain_events(), vec![StrategyEvent::Paused]);
        assert!(matches!(
            strategy.pause(&manager()),
            Err(ManagerError::InvalidState(_))
        ));
    }

    #[test]
    fn test_unpause_restores_the_ladder() {
        let mut strategy = fixtures::leveraged_strategy(70, 3, 1_000);
        strategy.pause(&manager()).unwrap();
        strategy.drain_events();

        strategy.unpause(&manager()).unwrap();

        assert_eq!(strategy.status(), StrategyStatus::Active);
        assert_eq!(
            strategy.chain().allowance(WANT, ACCOUNT, MARKET),
            U256::MAX
        );
        assert_eq!(strategy.user_reserves().unwrap().borrowed, U256::from(1_533));
        assert_eq!(strategy.drain_events(), vec![StrategyEvent::Unpaused]);
    }

    #[test]
    fn test_unpause_requires_paused() {
        let mut strategy = fixtures::strategy(70, 3);
        assert!(matches!(
            strategy.unpause(&manager()),
            Err(ManagerError::InvalidState(_))
        ));
    }

    #[test]
    fn test_panic_twice_keeps_managed_assets() {
        let mut strategy = fixtures::leveraged_strategy(70, 3, 1_000);

        strategy.panic(&manager()).unwrap();
        let tvl = strategy.total_managed_assets().unwrap();
        assert_eq!(strategy.status(), StrategyStatus::Paused);
        assert_eq!(strategy.drain_events(), vec![StrategyEvent::Paused]);

        strategy.panic(&manager()).unwrap();
        assert_eq!(strategy.total_managed_assets().unwrap(), tvl);
        assert_eq!(strategy.status(), StrategyStatus::Paused);
        assert!(strategy.drain_events().is_empty());
    }

    #[test]
    fn test_retire_returns_everything_to_the_vault() {
        let mut strategy = fixtures::leveraged_strategy(70, 3, 1_000);
        let vault = roles().only_vault(VAULT).unwrap();

        strategy.retire(&vault).unwrap();

        assert_eq!(strategy.status(), StrategyStatus::Retired);
        assert_eq!(strategy.total_managed_assets().unwrap(), U256::ZERO);
        assert_eq!(
            strategy.chain().balance_of(WANT, VAULT).unwrap(),
            U256::from(1_000)
        );
        assert_eq!(strategy.drain_events(), vec![StrategyEvent::Retired]);
    }

    #[test]
    fn test_retired_strategy_rejects_mutations() {
        let mut strategy = fixtures::leveraged_strategy(70, 3, 1_000);
        let vault = roles().only_vault(VAULT).unwrap();
        strategy.retire(&vault).unwrap();
        strategy.chain_mut().mint(WANT, ACCOUNT, U256::from(500));

        let rejected = |result: ManagerResult<()>| matches!(result, Err(ManagerError::InvalidState(_)));
        assert!(rejected(strategy.retire(&vault)));
        assert!(rejected(strategy.pause(&manager())));
        assert!(rejected(strategy.unpause(&manager())));
        assert!(rejected(strategy.panic(&manager())));
        assert!(rejected(strategy.rebalance(&manager(), 50, 2)));
        assert!(rejected(strategy.deleverage_once(&manager(), 50)));
        assert!(rejected(strategy.deposit()));
        assert!(rejected(strategy.set_harvest_on_deposit(&manager(), true)));
        assert!(rejected(strategy.harvest(HARVESTER).map(|_| ())));
        assert!(rejected(
            strategy.withdraw(&vault, U256::from(100), OWNER).map(|_| ())
        ));
        assert_eq!(strategy.idle_assets().unwrap(), U256::from(500));
    }

    #[test]
    fn test_set_harvest_on_deposit_toggles_the_fee() {
        let mut strategy = fixtures::strategy(70, 3);

        strategy.set_harvest_on_deposit(&manager(), true).unwrap();
        assert!(strategy.data().harvest_on_deposit);
        assert_eq!(strategy.data().withdrawal_fee.rate, 0);

        strategy.set_harvest_on_deposit(&manager(), false).unwrap();
        assert!(!strategy.data().harvest_on_deposit);
        assert_eq!(
            strategy.data().withdrawal_fee,
            WithdrawalFeeConfig::default()
        );
    }

    #[test]
    fn test_failed_approval_keeps_the_strategy_paused() {
        let mut strategy = fixtures::leveraged_strategy(70, 3, 1_000);
        strategy.pause(&manager()).unwrap();
        strategy
            .chain_mut()
            .fail_next(crate::chain::memory::FailPoint::Approve);

        assert!(matches!(
            strategy.unpause(&manager()),
            Err(ManagerError::ExternalMarket(_))
        ));
        assert_eq!(strategy.status(), StrategyStatus::Paused);
    }
}
