//! The executable strategy: owns the settings, the mutable data, the journal and
//! the chain handle, and runs every entry point as one atomic action.

use alloy_primitives::U256;

use crate::{
    chain::Chain,
    journal::{JournalCollection, LogType},
    types::{
        AccountRisk, LedgerPosition, StrategyConfig, StrategyEvent, StrategyQuery, StrategyStatus,
    },
    utils::{
        common::{checked_sub, u256_to_nat},
        error::{arithmetic_err, ManagerError, ManagerResult},
    },
};

use super::{data::StrategyData, settings::StrategySettings};

pub struct LeveragedStrategy<C: Chain> {
    /// Immutable settings and configurations
    pub(crate) settings: StrategySettings,
    /// Mutable state
    pub(crate) data: StrategyData,
    pub(crate) journal: JournalCollection,
    pub(crate) chain: C,
    /// Events of committed actions, not yet drained by the caller
    events: Vec<StrategyEvent>,
}

impl<C: Chain> LeveragedStrategy<C> {
    /// Validates the configuration, looks up the position identifiers of the
    /// base asset and grants the lending market its allowance.
    pub fn new(chain: C, config: StrategyConfig) -> ManagerResult<Self> {
        config.validate()?;
        let reserve_tokens = chain.reserve_tokens(config.want)?;
        let settings = StrategySettings::from_config(&config, reserve_tokens);
        let data = StrategyData::from_config(&config);

        let mut strategy = Self::assemble(settings, data, chain);
        strategy.execute("initialize", |strategy| strategy.give_allowances())?;
        Ok(strategy)
    }

    pub(crate) fn assemble(settings: StrategySettings, data: StrategyData, chain: C) -> Self {
        Self {
            settings,
            data,
            journal: JournalCollection::default(),
            chain,
            events: Vec::new(),
        }
    }

    /// Runs `action` as one unit of work.
    /// On error the chain, the data, the journal and the pending events are all
    /// restored to where they were before the call.
    pub(crate) fn execute<T, F>(&mut self, action: &str, f: F) -> ManagerResult<T>
    where
        F: FnOnce(&mut Self) -> ManagerResult<T>,
    {
        let checkpoint = self.chain.checkpoint();
        let data = self.data.clone();
        let journal_mark = self.journal.mark();
        let events_len = self.events.len();

        match f(self) {
            Ok(value) => {
                self.journal.append_note(
                    Ok(()),
                    LogType::ExecutionResult,
                    format!("{} completed.", action),
                );
                Ok(value)
            }
            Err(err) => {
                self.chain.rollback(checkpoint);
                self.data = data;
                self.journal.discard_since(journal_mark);
                self.events.truncate(events_len);
                self.journal.append_note(
                    Err(err.clone()),
                    LogType::ExecutionResult,
                    format!("{} was rolled back.", action),
                );
                Err(err)
            }
        }
    }

    pub(crate) fn emit(&mut self, event: StrategyEvent) {
        self.events.push(event);
    }

    /// Hands the signalled events over to the caller
    pub fn drain_events(&mut self) -> Vec<StrategyEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn ensure_active(&self, action: &str) -> ManagerResult<()> {
        match self.data.status {
            StrategyStatus::Active => Ok(()),
            status => Err(ManagerError::InvalidState(format!(
                "Cannot {} while the strategy is {:?}.",
                action, status
            ))),
        }
    }

    pub(crate) fn ensure_not_retired(&self, action: &str) -> ManagerResult<()> {
        if self.data.status == StrategyStatus::Retired {
            return Err(ManagerError::InvalidState(format!(
                "Cannot {} a retired strategy.",
                action
            )));
        }
        Ok(())
    }

    pub fn settings(&self) -> &StrategySettings {
        &self.settings
    }

    pub fn data(&self) -> &StrategyData {
        &self.data
    }

    pub fn journal(&self) -> &JournalCollection {
        &self.journal
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// Mutates the environment outside of `execute`, so nothing is journaled or rolled back
    #[cfg(test)]
    pub(crate) fn chain_mut(&mut self) -> &mut C {
        &mut self.chain
    }

    pub fn status(&self) -> StrategyStatus {
        self.data.status
    }

    pub fn reserves(&self) -> U256 {
        self.data.reserves.reserves()
    }

    pub fn last_harvest(&self) -> u64 {
        self.data.last_harvest
    }

    /// Base asset held by the strategy account
    pub fn idle_assets(&self) -> ManagerResult<U256> {
        self.chain
            .balance_of(self.settings.want, self.settings.account)
    }

    /// Held base asset that is not locked as reserves
    pub fn available_assets(&self) -> ManagerResult<U256> {
        self.data.reserves.available(self.idle_assets()?)
    }

    /// Supplied and borrowed balances at the lending market
    pub fn user_reserves(&self) -> ManagerResult<LedgerPosition> {
        self.chain
            .account_position(self.settings.want, self.settings.account)
    }

    /// Net value of the market position
    pub fn position_assets(&self) -> ManagerResult<U256> {
        let position = self.user_reserves()?;
        checked_sub(position.supplied, position.borrowed, "Supplied minus borrowed")
    }

    /// Idle plus position assets, used by the vault for its share price
    pub fn total_managed_assets(&self) -> ManagerResult<U256> {
        self.idle_assets()?
            .checked_add(self.position_assets()?)
            .ok_or_else(|| arithmetic_err("Total managed assets overflowed."))
    }

    /// Rewards claimable on the collateral and debt positions
    pub fn rewards_available(&self) -> ManagerResult<U256> {
        self.chain
            .pending_rewards(&self.settings.reward_assets(), self.settings.account)
    }

    pub fn account_risk(&self) -> ManagerResult<AccountRisk> {
        self.chain.account_risk(self.settings.account)
    }

    /// Candid view of the settings and state
    pub fn query(&self) -> StrategyQuery {
        StrategyQuery {
            account: self.settings.account.to_string(),
            want: self.settings.want.to_string(),
            collateral_token: self.settings.collateral_token.to_string(),
            debt_token: self.settings.debt_token.to_string(),
            borrow_rate: self.data.borrow_rate,
            borrow_rate_max: self.settings.borrow_rate_max,
            borrow_depth: self.data.borrow_depth,
            min_leverage: u256_to_nat(&self.settings.min_leverage),
            reserves: u256_to_nat(&self.data.reserves.reserves()),
            last_harvest: self.data.last_harvest,
            status: self.data.status,
            harvest_on_deposit: self.data.harvest_on_deposit,
            withdrawal_fee: self.data.withdrawal_fee.rate,
        }
    }
}
