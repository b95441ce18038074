use alloy_primitives::{Address, U256};

use crate::{
    access::ManagerCap,
    chain::Chain,
    journal::LogType,
    types::{Amount, StrategyEvent},
    utils::{common::checked_sub, error::ManagerResult},
};

use super::executable::LeveragedStrategy;

impl<C: Chain> LeveragedStrategy<C> {
    /// Claims the pending rewards of the collateral and debt positions, charges
    /// the harvest fee and re-leverages the rest.
    ///
    /// # Returns
    /// * `Ok(harvested)` - Base asset gained by the claim, zero if there was nothing to collect
    pub fn harvest(&mut self, call_fee_recipient: Address) -> ManagerResult<U256> {
        self.execute("harvest", |strategy| strategy.run_harvest(call_fee_recipient))
    }

    /// Harvest triggered by the owner or the keeper, who also receives the call fee
    pub fn manager_harvest(&mut self, cap: &ManagerCap) -> ManagerResult<U256> {
        let recipient = cap.caller();
        self.execute("manager harvest", |strategy| {
            strategy.run_harvest(recipient)
        })
    }

    pub(crate) fn run_harvest(&mut self, call_fee_recipient: Address) -> ManagerResult<U256> {
        self.ensure_active("harvest")?;

        let before = self.idle_assets()?;
        self.chain.claim_rewards(
            &self.settings.reward_assets(),
            Amount::All,
            self.settings.account,
        )?;
        let after = self.idle_assets()?;
        let harvested = checked_sub(after, before, "Balance after claim minus before")?;

        if harvested.is_zero() {
            self.journal
                .append_note(Ok(()), LogType::Harvest, "Nothing to harvest.");
            return Ok(U256::ZERO);
        }

        self.charge_fees(harvested, call_fee_recipient)?;
        let available = self.available_assets()?;
        self.leverage(available)?;

        let now = self.chain.timestamp();
        self.data.last_harvest(now);

        let tvl = self.total_managed_assets()?;
        self.journal.append_note(
            Ok(()),
            LogType::Harvest,
            format!("Harvested {}, managed assets now {}.", harvested, tvl),
        );
        self.emit(StrategyEvent::StratHarvest {
            harvester: call_fee_recipient,
            want_harvested: harvested,
            tvl,
        });
        Ok(harvested)
    }
}
