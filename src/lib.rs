#![doc(test(attr(deny(warnings))))]

//! Obligation Core converts recurring bill amounts between cadences, schedules
//! the next occurrence of anchored due dates, and projects daily cash balances
//! for the budgeting layers built on top of it.

pub mod cadence;
pub mod config;
pub mod convert;
pub mod currency;
pub mod errors;
pub mod forecast;
pub mod obligation;
pub mod schedule;
pub mod utils;

pub use cadence::{Cadence, RecurrenceFrequency, ReportingCadence, TimeInterval, TimeUnit};
pub use config::{ConfigManager, EngineConfig};
pub use convert::{normalize, required_income, spending_progress};
pub use errors::{ConfigError, EngineError, Result};
pub use forecast::{
    Forecast, ForecastEntry, ForecastRequest, Forecaster, PacePolicy, ScheduledCashEvent,
};
pub use obligation::{Anchor, AnchorDay, HistoricalTransaction, Obligation, ObligationKind};
pub use schedule::{next_occurrence, ReminderRequest, Scheduler};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Obligation Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
