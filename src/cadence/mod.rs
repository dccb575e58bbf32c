//! Recurrence frequencies, reporting cadences, and their annual rates.
//!
//! The occurrences-per-year table assumes a 365.25-day year. Every lookup is an
//! exhaustive match, so adding a variant forces a decision about its rate and
//! calendar step.

pub mod time_interval;

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};

pub use time_interval::{clamped_date, days_in_month, TimeInterval, TimeUnit};

/// Anything that can act as one side of an annualization pivot.
pub trait Cadence: Copy + fmt::Debug {
    /// How many times this cadence repeats in a 365.25-day year.
    fn occurrences_per_year(self) -> Result<Decimal>;
}

/// The actual repeat interval attached to an obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceFrequency {
    OneTime,
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl RecurrenceFrequency {
    pub const ALL: [RecurrenceFrequency; 7] = [
        RecurrenceFrequency::OneTime,
        RecurrenceFrequency::Daily,
        RecurrenceFrequency::Weekly,
        RecurrenceFrequency::Biweekly,
        RecurrenceFrequency::Monthly,
        RecurrenceFrequency::Quarterly,
        RecurrenceFrequency::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneTime => "one_time",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::OneTime)
    }

    /// Calendar increment between consecutive occurrences; `None` for one-time.
    pub fn interval(&self) -> Option<TimeInterval> {
        match self {
            Self::OneTime => None,
            Self::Daily => Some(TimeInterval::new(1, TimeUnit::Day)),
            Self::Weekly => Some(TimeInterval::new(1, TimeUnit::Week)),
            Self::Biweekly => Some(TimeInterval::new(2, TimeUnit::Week)),
            Self::Monthly => Some(TimeInterval::new(1, TimeUnit::Month)),
            Self::Quarterly => Some(TimeInterval::new(3, TimeUnit::Month)),
            Self::Yearly => Some(TimeInterval::new(1, TimeUnit::Year)),
        }
    }
}

impl Cadence for RecurrenceFrequency {
    fn occurrences_per_year(self) -> Result<Decimal> {
        match self {
            Self::OneTime => Err(EngineError::UnsupportedFrequency(self)),
            Self::Daily => Ok(daily_rate()),
            Self::Weekly => Ok(weekly_rate()),
            Self::Biweekly => Ok(biweekly_rate()),
            Self::Monthly => Ok(Decimal::from(12)),
            Self::Quarterly => Ok(Decimal::from(4)),
            Self::Yearly => Ok(Decimal::ONE),
        }
    }
}

impl FromStr for RecurrenceFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "one_time" | "one-time" | "onetime" | "once" => Ok(Self::OneTime),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "biweekly" | "bi-weekly" | "fortnightly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" | "annual" | "annually" => Ok(Self::Yearly),
            _ => Err(format!("Unknown recurrence frequency: {}", s)),
        }
    }
}

impl fmt::Display for RecurrenceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display/aggregation unit; never attached to stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportingCadence {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Annual,
}

impl ReportingCadence {
    pub const ALL: [ReportingCadence; 5] = [
        ReportingCadence::Hourly,
        ReportingCadence::Daily,
        ReportingCadence::Weekly,
        ReportingCadence::Monthly,
        ReportingCadence::Annual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Annual => "annual",
        }
    }

    /// Occurrences per year; every reporting cadence has one.
    pub fn annual_rate(&self) -> Decimal {
        match self {
            Self::Hourly => Decimal::from(8766),
            Self::Daily => daily_rate(),
            Self::Weekly => weekly_rate(),
            Self::Monthly => Decimal::from(12),
            Self::Annual => Decimal::ONE,
        }
    }
}

impl Cadence for ReportingCadence {
    fn occurrences_per_year(self) -> Result<Decimal> {
        Ok(self.annual_rate())
    }
}

impl FromStr for ReportingCadence {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "annual" | "annually" | "yearly" => Ok(Self::Annual),
            _ => Err(format!("Unknown reporting cadence: {}", s)),
        }
    }
}

impl fmt::Display for ReportingCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn daily_rate() -> Decimal {
    Decimal::new(36525, 2)
}

fn weekly_rate() -> Decimal {
    Decimal::new(521786, 4)
}

fn biweekly_rate() -> Decimal {
    Decimal::new(260893, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_time_has_no_rate_or_step() {
        let freq = RecurrenceFrequency::OneTime;
        assert_eq!(
            freq.occurrences_per_year(),
            Err(EngineError::UnsupportedFrequency(RecurrenceFrequency::OneTime))
        );
        assert!(freq.interval().is_none());
        assert!(!freq.is_recurring());
    }

    #[test]
    fn recurring_frequencies_have_positive_steps() {
        for freq in RecurrenceFrequency::ALL.iter().filter(|f| f.is_recurring()) {
            let interval = freq.interval().expect("recurring step");
            assert!(interval.every > 0, "{freq} must step forward");
            assert!(freq.occurrences_per_year().unwrap() > Decimal::ZERO);
        }
    }

    #[test]
    fn rates_match_canonical_table() {
        assert_eq!(
            ReportingCadence::Hourly.occurrences_per_year().unwrap(),
            Decimal::from(8766)
        );
        assert_eq!(
            RecurrenceFrequency::Daily.occurrences_per_year().unwrap(),
            ReportingCadence::Daily.occurrences_per_year().unwrap()
        );
        assert_eq!(
            RecurrenceFrequency::Biweekly.occurrences_per_year().unwrap() * Decimal::TWO,
            RecurrenceFrequency::Weekly.occurrences_per_year().unwrap()
        );
        assert_eq!(
            RecurrenceFrequency::Yearly.occurrences_per_year().unwrap(),
            ReportingCadence::Annual.occurrences_per_year().unwrap()
        );
    }

    #[test]
    fn parses_and_serializes_tags() {
        assert_eq!(
            "one-time".parse::<RecurrenceFrequency>(),
            Ok(RecurrenceFrequency::OneTime)
        );
        assert_eq!("Annual".parse::<ReportingCadence>(), Ok(ReportingCadence::Annual));
        assert!("fortnight".parse::<ReportingCadence>().is_err());
        let json = serde_json::to_string(&RecurrenceFrequency::OneTime).unwrap();
        assert_eq!(json, "\"one_time\"");
    }
}
