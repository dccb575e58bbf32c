//! Day-by-day cash balance projection.
//!
//! Each simulated day first subtracts the flat daily pace, then applies that
//! day's discrete events. The run is sequential and deterministic: identical
//! inputs always produce identical entries.

pub mod events;
pub mod pace;

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::EngineConfig,
    currency::CurrencyCode,
    errors::{EngineError, Result},
    obligation::{HistoricalTransaction, Obligation},
    schedule::Scheduler,
};

pub use events::{
    events_from_obligations, events_from_transactions, horizon_end, ScheduledCashEvent,
};
pub use pace::{learn_daily_pace, resolve_daily_pace, PacePolicy};

/// Projected balance at the end of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub date: NaiveDate,
    pub balance: Decimal,
}

/// A full run: one entry per day from `today` through `today + horizon` inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub starting_balance: Decimal,
    pub daily_pace: Decimal,
    pub entries: Vec<ForecastEntry>,
    pub risk_days: usize,
    /// Lowest balance, earliest date on ties.
    pub trough: ForecastEntry,
}

impl Forecast {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ending_balance(&self) -> Decimal {
        self.entries
            .last()
            .map(|entry| entry.balance)
            .unwrap_or(self.starting_balance)
    }

    /// First day the balance dips below zero.
    pub fn first_risk_day(&self) -> Option<&ForecastEntry> {
        self.entries
            .iter()
            .find(|entry| entry.balance < Decimal::ZERO)
    }

    pub fn balance_on(&self, date: NaiveDate) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|entry| entry.date == date)
            .map(|entry| entry.balance)
    }

    /// Copy of this run with every balance rounded to `currency` precision.
    ///
    /// `risk_days` and the trough date come from the unrounded run, so
    /// balances that differ only below the minor unit never move them.
    pub fn rounded(&self, currency: &CurrencyCode) -> Forecast {
        let entries: Vec<ForecastEntry> = self
            .entries
            .iter()
            .map(|entry| ForecastEntry {
                date: entry.date,
                balance: currency.round(entry.balance),
            })
            .collect();
        Forecast {
            starting_balance: currency.round(self.starting_balance),
            daily_pace: self.daily_pace,
            risk_days: self.risk_days,
            trough: ForecastEntry {
                date: self.trough.date,
                balance: currency.round(self.trough.balance),
            },
            entries,
        }
    }
}

/// Projects `starting_balance` forward `horizon_days` days from `today`.
///
/// Events outside the horizon are ignored. Fails with
/// [`EngineError::InvalidHorizon`] when `horizon_days <= 0`.
pub fn forecast(
    starting_balance: Decimal,
    daily_pace: Decimal,
    horizon_days: i64,
    today: NaiveDate,
    events: &[ScheduledCashEvent],
) -> Result<Forecast> {
    let end = horizon_end(today, horizon_days)?;

    let mut by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for event in events.iter().filter(|event| event.date >= today && event.date <= end) {
        *by_date.entry(event.date).or_insert(Decimal::ZERO) += event.amount;
    }

    let mut entries = Vec::with_capacity(horizon_days as usize + 1);
    let mut balance = starting_balance;
    for offset in 0..=horizon_days as u64 {
        let date = today
            .checked_add_days(Days::new(offset))
            .ok_or(EngineError::InvalidHorizon(horizon_days))?;
        balance -= daily_pace;
        if let Some(net) = by_date.get(&date) {
            balance += *net;
        }
        entries.push(ForecastEntry { date, balance });
    }

    let risk_days = count_risk_days(&entries);
    let trough = find_trough(&entries).ok_or(EngineError::InvalidHorizon(horizon_days))?;
    debug!(
        horizon_days,
        event_days = by_date.len(),
        risk_days,
        trough = %trough.balance,
        "forecast projected"
    );

    Ok(Forecast {
        starting_balance,
        daily_pace,
        entries,
        risk_days,
        trough,
    })
}

fn count_risk_days(entries: &[ForecastEntry]) -> usize {
    entries
        .iter()
        .filter(|entry| entry.balance < Decimal::ZERO)
        .count()
}

fn find_trough(entries: &[ForecastEntry]) -> Option<ForecastEntry> {
    entries.iter().copied().fold(None, |lowest, entry| match lowest {
        Some(current) if current.balance <= entry.balance => Some(current),
        _ => Some(entry),
    })
}

/// Caller-side request combining balances, obligations, and history.
#[derive(Debug, Clone, Copy)]
pub struct ForecastRequest<'a> {
    pub starting_balance: Decimal,
    /// Explicit pace; ignored unless positive.
    pub pace_override: Option<Decimal>,
    /// Falls back to the configured default horizon when `None`.
    pub horizon_days: Option<i64>,
    pub today: NaiveDate,
    pub obligations: &'a [Obligation],
    /// Past transactions teach the pace; future-dated ones become events.
    pub transactions: &'a [HistoricalTransaction],
}

/// Runs forecasts with the pace policy, week start, and currency from [`EngineConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct Forecaster {
    scheduler: Scheduler,
    pace_policy: PacePolicy,
    default_horizon_days: i64,
    currency: CurrencyCode,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Forecaster {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            scheduler: Scheduler::from_config(&config.scheduler),
            pace_policy: config.forecast.pace_policy,
            default_horizon_days: config.forecast.default_horizon_days,
            currency: config.currency.clone(),
        }
    }

    pub fn pace_policy(&self) -> PacePolicy {
        self.pace_policy
    }

    /// Flattens the request into events, resolves the pace, and rounds the result once.
    pub fn project(&self, request: ForecastRequest<'_>) -> Result<Forecast> {
        let horizon_days = request.horizon_days.unwrap_or(self.default_horizon_days);
        let pace = resolve_daily_pace(
            request.pace_override,
            request.transactions,
            request.today,
            self.pace_policy,
        );
        let mut events = events_from_obligations(
            request.obligations,
            &self.scheduler,
            request.today,
            horizon_days,
        )?;
        events.extend(events_from_transactions(
            request.transactions,
            request.today,
            horizon_days,
        )?);
        let run = forecast(
            request.starting_balance,
            pace,
            horizon_days,
            request.today,
            &events,
        )?;
        Ok(run.rounded(&self.currency))
    }
}
