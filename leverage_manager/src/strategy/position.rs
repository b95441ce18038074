//! Position management: the leverage ladder and its unwind.
//!
//! ```plain
//! leverage(1000), rate 70%, depth 3:
//!
//!   supply 1000 ─► borrow 700 ─► supply 700 ─► borrow 490 ─► supply 490 ─► borrow 343
//!                                                                             │
//!                                                           reserves += 343 ◄─┘
//! ```

use alloy_primitives::U256;

use crate::{
    access::ManagerCap,
    chain::Chain,
    constants::{percent, MAX_DELEVERAGE_ROUNDS},
    journal::LogType,
    types::{Amount, InterestRateMode, StrategyEvent},
    utils::{
        common::{checked_sub, mul_div},
        error::{config_err, ManagerError, ManagerResult},
    },
};

use super::executable::LeveragedStrategy;

/// Supply needed to keep `borrowed` at exactly `borrow_rate` percent of the collateral.
pub(crate) fn target_supply(borrowed: U256, borrow_rate: u64) -> ManagerResult<U256> {
    if borrowed.is_zero() {
        return Ok(U256::ZERO);
    }
    if borrow_rate == 0 {
        return Err(ManagerError::ZeroBorrowRate);
    }
    mul_div(borrowed, percent(), U256::from(borrow_rate))
}

impl<C: Chain> LeveragedStrategy<C> {
    /// Runs the supply/borrow ladder on `amount`.
    /// The residual of the last round is not supplied and is locked as reserves.
    pub(crate) fn leverage(&mut self, amount: U256) -> ManagerResult<()> {
        if amount.is_zero() || amount < self.settings.min_leverage {
            return Ok(());
        }

        let want = self.settings.want;
        let account = self.settings.account;
        let rate = U256::from(self.data.borrow_rate);

        let mut amount = amount;
        let mut rounds = 0u8;
        for _ in 0..self.data.borrow_depth {
            self.chain.supply(want, amount, account)?;
            amount = mul_div(amount, rate, percent())?;
            rounds += 1;
            if amount.is_zero() {
                break;
            }
            self.chain
                .borrow(want, amount, InterestRateMode::Variable, account)?;
        }
        self.data.reserves.lock(amount)?;

        self.journal.append_note(
            Ok(()),
            LogType::Leverage,
            format!(
                "Leveraged in {} rounds, {} locked as reserves.",
                rounds, amount
            ),
        );
        Ok(())
    }

    /// Unwinds the whole position back to idle base asset and clears the reserves.
    pub(crate) fn deleverage(&mut self) -> ManagerResult<()> {
        let want = self.settings.want;
        let account = self.settings.account;

        let mut rounds = 0u32;
        loop {
            let balance = self.idle_assets()?;
            let position = self.user_reserves()?;
            if balance >= position.borrowed {
                break;
            }
            if rounds >= MAX_DELEVERAGE_ROUNDS {
                return Err(ManagerError::DeleverageDidNotConverge);
            }
            self.unwind_round(self.data.borrow_rate)?;
            rounds += 1;
        }

        let position = self.user_reserves()?;
        if !position.borrowed.is_zero() {
            self.chain
                .repay(want, Amount::All, InterestRateMode::Variable, account)?;
        }
        if !position.supplied.is_zero() {
            self.chain.withdraw(want, Amount::All, account)?;
        }
        self.data.reserves.reset();

        self.journal.append_note(
            Ok(()),
            LogType::Deleverage,
            format!("Position unwound after {} partial rounds.", rounds),
        );
        Ok(())
    }

    /// Repays as much debt as the idle balance covers, then withdraws the
    /// collateral in excess of what `borrow_rate` requires for the remaining debt.
    fn unwind_round(&mut self, borrow_rate: u64) -> ManagerResult<()> {
        let want = self.settings.want;
        let account = self.settings.account;

        let balance = self.idle_assets()?;
        let position = self.user_reserves()?;
        let repayment = balance.min(position.borrowed);
        if !repayment.is_zero() {
            self.chain.repay(
                want,
                Amount::Exact(repayment),
                InterestRateMode::Variable,
                account,
            )?;
        }

        let position = self.user_reserves()?;
        let target = target_supply(position.borrowed, borrow_rate)?;
        let excess = checked_sub(position.supplied, target, "Supplied minus target supply")?;
        if !excess.is_zero() {
            self.chain.withdraw(want, Amount::Exact(excess), account)?;
        }
        Ok(())
    }

    /// Manual single unwind round at `borrow_rate`, for positions the full unwind
    /// cannot clear in one call. The whole idle balance is locked as reserves
    /// afterwards so that deposits and withdrawals do not re-leverage it.
    pub fn deleverage_once(&mut self, _cap: &ManagerCap, borrow_rate: u64) -> ManagerResult<()> {
        self.execute("deleverage once", |strategy| {
            strategy.ensure_not_retired("deleverage")?;
            if borrow_rate > strategy.settings.borrow_rate_max {
                return Err(config_err(format!(
                    "Borrow rate {} exceeds the max borrow rate {}.",
                    borrow_rate, strategy.settings.borrow_rate_max
                )));
            }

            strategy.unwind_round(borrow_rate)?;
            let balance = strategy.idle_assets()?;
            strategy.data.reserves.set(balance);

            let borrow_depth = strategy.data.borrow_depth;
            strategy.journal.append_note(
                Ok(()),
                LogType::Deleverage,
                format!("Single unwind round at {}%, {} locked.", borrow_rate, balance),
            );
            strategy.emit(StrategyEvent::StratRebalance {
                borrow_rate,
                borrow_depth,
            });
            Ok(())
        })
    }
}
