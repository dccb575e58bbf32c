use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Day,
    Week,
    Month,
    Year,
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimeUnit::Day => "Day",
            TimeUnit::Week => "Week",
            TimeUnit::Month => "Month",
            TimeUnit::Year => "Year",
        };
        f.write_str(label)
    }
}

/// A strictly positive calendar step used to advance recurring occurrences.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeInterval {
    pub every: u32,
    pub unit: TimeUnit,
}

impl TimeInterval {
    pub const fn new(every: u32, unit: TimeUnit) -> Self {
        Self { every, unit }
    }

    /// Calculates the next date after `from`, clamping month and year steps
    /// to the target month's last day.
    pub fn next_date(&self, from: NaiveDate) -> Option<NaiveDate> {
        self.nth_after(from, 1)
    }

    /// Returns the date `steps` intervals after `start`.
    ///
    /// Each result is computed from `start` directly rather than by chaining
    /// single steps, so a clamped month end (Jan 31 -> Feb 28) does not drag
    /// later occurrences back to the 28th.
    pub fn nth_after(&self, start: NaiveDate, steps: u32) -> Option<NaiveDate> {
        let count = self.every.checked_mul(steps)?;
        match self.unit {
            TimeUnit::Day => start.checked_add_days(Days::new(count as u64)),
            TimeUnit::Week => start.checked_add_days(Days::new(count as u64 * 7)),
            TimeUnit::Month => start.checked_add_months(Months::new(count)),
            TimeUnit::Year => start.checked_add_months(Months::new(count.checked_mul(12)?)),
        }
    }

    /// Lower bound on the number of steps from `anchor` that stay on or before
    /// `reference`. Lets callers skip ahead instead of stepping one at a time.
    pub fn steps_before(&self, anchor: NaiveDate, reference: NaiveDate) -> u32 {
        if reference <= anchor || self.every == 0 {
            return 0;
        }
        let steps = match self.months() {
            Some(interval_months) => {
                let anchor_idx = anchor.year() as i64 * 12 + anchor.month() as i64 - 1;
                let reference_idx = reference.year() as i64 * 12 + reference.month() as i64 - 1;
                (reference_idx - anchor_idx - 1).div_euclid(interval_months as i64)
            }
            None => {
                let interval_days = match self.unit {
                    TimeUnit::Week => self.every as i64 * 7,
                    _ => self.every as i64,
                };
                (reference - anchor).num_days().div_euclid(interval_days)
            }
        };
        u32::try_from(steps.max(0)).unwrap_or(u32::MAX)
    }

    /// Number of whole months covered by one step, if the unit is month based.
    pub fn months(&self) -> Option<u32> {
        match self.unit {
            TimeUnit::Month => Some(self.every),
            TimeUnit::Year => self.every.checked_mul(12),
            TimeUnit::Day | TimeUnit::Week => None,
        }
    }

    pub fn label(&self) -> String {
        match (self.every, &self.unit) {
            (1, TimeUnit::Day) => "Daily".into(),
            (1, TimeUnit::Week) => "Weekly".into(),
            (2, TimeUnit::Week) => "Biweekly".into(),
            (1, TimeUnit::Month) => "Monthly".into(),
            (3, TimeUnit::Month) => "Quarterly".into(),
            (1, TimeUnit::Year) => "Yearly".into(),
            (n, unit) => format!("Every {} {}{}", n, unit, if n > 1 { "s" } else { "" }),
        }
    }
}

/// Number of days in the given month, accounting for leap years.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last_current| last_current.day())
        .unwrap_or(28)
}

/// Builds a date in the given month, clamping `day` to the month's length.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let day = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}
