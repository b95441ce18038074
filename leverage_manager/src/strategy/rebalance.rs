use crate::{
    access::ManagerCap,
    chain::Chain,
    journal::LogType,
    types::{check_risk_parameters, StrategyEvent},
    utils::error::ManagerResult,
};

use super::executable::LeveragedStrategy;

impl<C: Chain> LeveragedStrategy<C> {
    /// Unwinds the position and rebuilds it with a new borrow rate and depth.
    pub fn rebalance(
        &mut self,
        _cap: &ManagerCap,
        borrow_rate: u64,
        borrow_depth: u8,
    ) -> ManagerResult<()> {
        self.execute("rebalance", |strategy| {
            strategy.ensure_active("rebalance")?;
            check_risk_parameters(
                borrow_rate,
                borrow_depth,
                strategy.settings.borrow_rate_max,
            )?;

            strategy.deleverage()?;
            strategy
                .data
                .borrow_rate(borrow_rate)
                .borrow_depth(borrow_depth);
            let balance = strategy.idle_assets()?;
            strategy.leverage(balance)?;

            strategy.journal.append_note(
                Ok(()),
                LogType::Rebalance,
                format!(
                    "Rebalanced to rate {}% and depth {}.",
                    borrow_rate, borrow_depth
                ),
            );
            strategy.emit(StrategyEvent::StratRebalance {
                borrow_rate,
                borrow_depth,
            });
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chain::memory::{FailPoint, InMemoryChain},
        constants::BORROW_DEPTH_MAX,
        strategy::fixtures::{self, *},
        types::{LedgerPosition, StrategyStatus},
        utils::error::ManagerError,
    };
    use alloy_primitives::U256;
    use proptest::prelude::*;

    #[test]
    fn test_rebalance_rebuilds_the_ladder() {
        let mut strategy = fixtures::leveraged_strategy(70, 3, 1_000_000);
        let cap = roles().only_manager(KEEPER).unwrap();

        strategy.rebalance(&cap, 50, 2).unwrap();

        let position = strategy.user_reserves().unwrap();
        assert_eq!(position.supplied, U256::from(1_500_000));
        assert_eq!(position.borrowed, U256::from(750_000));
        assert_eq!(strategy.reserves(), U256::from(250_000));
        assert_eq!(strategy.data().borrow_rate, 50);
        assert_eq!(strategy.data().borrow_depth, 2);
        assert_eq!(
            strategy.total_managed_assets().unwrap(),
            U256::from(1_000_000)
        );
        assert_eq!(
            strategy.drain_events(),
            vec![StrategyEvent::StratRebalance {
                borrow_rate: 50,
                borrow_depth: 2
            }]
        );
    }

    #[test]
    fn test_rebalance_rejects_out_of_range_parameters() {
        let mut strategy = fixtures::leveraged_strategy(70, 3, 1_000);
        let cap = roles().only_manager(OWNER).unwrap();
        let before = strategy.user_reserves().unwrap();

        assert!(matches!(
            strategy.rebalance(&cap, RATE_MAX + 1, 3),
            Err(ManagerError::Configuration(_))
        ));
        assert!(matches!(
            strategy.rebalance(&cap, 60, BORROW_DEPTH_MAX + 1),
            Err(ManagerError::Configuration(_))
        ));
        assert_eq!(strategy.user_reserves().unwrap(), before);
        assert_eq!(strategy.data().borrow_rate, 70);
    }

    fn assert_original_ladder(strategy: &LeveragedStrategy<InMemoryChain>) {
        assert_eq!(
            strategy.user_reserves().unwrap(),
            LedgerPosition {
                supplied: U256::from(2_190),
                borrowed: U256::from(1_533),
            }
        );
        assert_eq!(strategy.reserves(), U256::from(343));
        assert_eq!(strategy.idle_assets().unwrap(), U256::from(343));
        assert_eq!(strategy.data().borrow_rate, 70);
        assert_eq!(strategy.data().borrow_depth, 3);
    }

    #[test]
    fn test_rebalance_failing_after_the_unwind_restores_the_old_ladder() {
        let mut strategy = fixtures::leveraged_strategy(70, 3, 1_000);
        let cap = roles().only_manager(KEEPER).unwrap();
        // the unwind only repays and withdraws, the first borrow belongs to the new ladder
        strategy.chain_mut().fail_next(FailPoint::Borrow);

        assert!(matches!(
            strategy.rebalance(&cap, 50, 2),
            Err(ManagerError::ExternalMarket(_))
        ));
        assert_original_ladder(&strategy);
        assert!(strategy.drain_events().is_empty());

        strategy.rebalance(&cap, 50, 2).unwrap();
        assert_eq!(strategy.data().borrow_rate, 50);
    }

    #[test]
    fn test_rebalance_failing_during_the_unwind_restores_the_old_ladder() {
        let mut strategy = fixtures::leveraged_strategy(70, 3, 1_000);
        let cap = roles().only_manager(KEEPER).unwrap();
        strategy.chain_mut().fail_next(FailPoint::Repay);

        assert!(matches!(
            strategy.rebalance(&cap, 50, 2),
            Err(ManagerError::ExternalMarket(_))
        ));
        assert_original_ladder(&strategy);
    }

    #[test]
    fn test_rebalance_requires_active() {
        let mut strategy = fixtures::leveraged_strategy(70, 3, 1_000);
        let cap = roles().only_manager(OWNER).unwrap();
        strategy.pause(&cap).unwrap();

        assert!(matches!(
            strategy.rebalance(&cap, 60, 3),
            Err(ManagerError::InvalidState(_))
        ));
        assert_eq!(strategy.status(), StrategyStatus::Paused);
    }

    proptest! {
        #[test]
        fn test_rebalance_preserves_managed_assets(
            borrow_rate in 0u64..=RATE_MAX,
            borrow_depth in 0u8..=BORROW_DEPTH_MAX,
            new_rate in 1u64..=RATE_MAX,
            new_depth in 0u8..=BORROW_DEPTH_MAX,
            amount in MIN_LEVERAGE..1_000_000_000u64,
        ) {
            let mut strategy = fixtures::leveraged_strategy(borrow_rate, borrow_depth, amount);
            let cap = roles().only_manager(KEEPER).unwrap();

            strategy.rebalance(&cap, new_rate, new_depth).unwrap();

            let position = strategy.user_reserves().unwrap();
            prop_assert!(position.borrowed <= position.supplied);
            prop_assert_eq!(strategy.reserves(), strategy.idle_assets().unwrap());
            prop_assert_eq!(
                strategy.total_managed_assets().unwrap(),
                U256::from(amount)
            );
        }
    }
}
