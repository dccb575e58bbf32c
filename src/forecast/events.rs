//! Flattening of obligations and dated transactions into forecast cash events.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{EngineError, Result},
    obligation::{HistoricalTransaction, Obligation},
    schedule::Scheduler,
};

/// A signed cash movement on a specific day: positive income, negative expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledCashEvent {
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Uuid>,
}

impl ScheduledCashEvent {
    pub fn new(date: NaiveDate, amount: Decimal) -> Self {
        Self {
            date,
            amount,
            source: None,
        }
    }

    pub fn with_source(mut self, source: Uuid) -> Self {
        self.source = Some(source);
        self
    }
}

/// Last day covered by a forecast of `horizon_days` starting on `today`.
pub fn horizon_end(today: NaiveDate, horizon_days: i64) -> Result<NaiveDate> {
    if horizon_days <= 0 {
        return Err(EngineError::InvalidHorizon(horizon_days));
    }
    today
        .checked_add_days(Days::new(horizon_days as u64))
        .ok_or(EngineError::InvalidHorizon(horizon_days))
}

/// One event per obligation occurrence in `[today, today + horizon_days]`.
///
/// Bills become negative events and income positive; a one-time obligation
/// contributes at most its own due date.
pub fn events_from_obligations(
    obligations: &[Obligation],
    scheduler: &Scheduler,
    today: NaiveDate,
    horizon_days: i64,
) -> Result<Vec<ScheduledCashEvent>> {
    let end = horizon_end(today, horizon_days)?;
    let mut events: Vec<ScheduledCashEvent> = obligations
        .iter()
        .flat_map(|obligation| {
            scheduler
                .occurrences_between(obligation, today, end)
                .into_iter()
                .map(move |date| {
                    ScheduledCashEvent::new(date, obligation.signed_amount())
                        .with_source(obligation.id)
                })
        })
        .collect();
    events.sort_by_key(|event| event.date);
    Ok(events)
}

/// Planned transactions dated after `today` and within the horizon.
///
/// Entries dated today or earlier are treated as already reflected in the
/// starting balance.
pub fn events_from_transactions(
    transactions: &[HistoricalTransaction],
    today: NaiveDate,
    horizon_days: i64,
) -> Result<Vec<ScheduledCashEvent>> {
    let end = horizon_end(today, horizon_days)?;
    let mut events: Vec<ScheduledCashEvent> = transactions
        .iter()
        .filter(|txn| txn.date > today && txn.date <= end)
        .map(|txn| ScheduledCashEvent::new(txn.date, txn.amount))
        .collect();
    events.sort_by_key(|event| event.date);
    Ok(events)
}
