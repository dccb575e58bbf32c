//! Daily spend pace learned from transaction history.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::obligation::HistoricalTransaction;

const DEFAULT_TRAILING_DAYS: u32 = 30;

/// Which window of history a learned pace averages over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacePolicy {
    /// The given number of calendar days ending today, divided by that count.
    TrailingDays(u32),
    /// From the day after the same date last month through today.
    CalendarMonth,
}

impl Default for PacePolicy {
    fn default() -> Self {
        PacePolicy::TrailingDays(DEFAULT_TRAILING_DAYS)
    }
}

impl PacePolicy {
    /// Inclusive first day of the window ending on `today`, and its length in days.
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, u32) {
        match self {
            PacePolicy::TrailingDays(days) => {
                let days = (*days).max(1);
                let start = today
                    .checked_sub_days(Days::new(u64::from(days - 1)))
                    .unwrap_or(NaiveDate::MIN);
                (start, days)
            }
            PacePolicy::CalendarMonth => {
                let start = today
                    .checked_sub_months(Months::new(1))
                    .and_then(|same_day| same_day.succ_opt())
                    .unwrap_or(today);
                let days = (today - start).num_days() + 1;
                (start, u32::try_from(days).unwrap_or(1))
            }
        }
    }
}

/// Average daily expense magnitude over the policy window ending `today`.
///
/// Income and future-dated entries are ignored; an empty window yields zero.
pub fn learn_daily_pace(
    history: &[HistoricalTransaction],
    today: NaiveDate,
    policy: PacePolicy,
) -> Decimal {
    let (start, days) = policy.window(today);
    let spent: Decimal = history
        .iter()
        .filter(|txn| txn.is_expense() && txn.date >= start && txn.date <= today)
        .map(|txn| txn.amount)
        .sum();
    (spent / Decimal::from(days)).abs()
}

/// Uses `explicit` when it is positive, otherwise learns the pace from history.
pub fn resolve_daily_pace(
    explicit: Option<Decimal>,
    history: &[HistoricalTransaction],
    today: NaiveDate,
    policy: PacePolicy,
) -> Decimal {
    match explicit {
        Some(pace) if pace > Decimal::ZERO => pace,
        _ => learn_daily_pace(history, today, policy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(date: NaiveDate, amount: i64) -> HistoricalTransaction {
        HistoricalTransaction::new(date, Decimal::from(amount))
    }

    #[test]
    fn trailing_window_covers_thirty_days_including_today() {
        let (start, days) = PacePolicy::default().window(date(2025, 3, 30));
        assert_eq!(start, date(2025, 3, 1));
        assert_eq!(days, 30);
    }

    #[test]
    fn calendar_month_window_follows_month_length() {
        assert_eq!(
            PacePolicy::CalendarMonth.window(date(2025, 3, 15)),
            (date(2025, 2, 16), 28)
        );
        assert_eq!(
            PacePolicy::CalendarMonth.window(date(2024, 3, 15)),
            (date(2024, 2, 16), 29)
        );
    }

    #[test]
    fn learned_pace_averages_expenses_only() {
        let today = date(2025, 3, 30);
        let history = vec![
            txn(date(2025, 3, 1), -150),
            txn(date(2025, 3, 20), -150),
            txn(date(2025, 3, 21), 2000),
            txn(date(2025, 2, 28), -900),
            txn(date(2025, 3, 31), -900),
        ];
        let pace = learn_daily_pace(&history, today, PacePolicy::default());
        assert_eq!(pace, Decimal::from(10));
    }

    #[test]
    fn explicit_positive_pace_wins() {
        let today = date(2025, 3, 30);
        let history = vec![txn(today, -300)];
        assert_eq!(
            resolve_daily_pace(Some(Decimal::from(7)), &history, today, PacePolicy::default()),
            Decimal::from(7)
        );
        assert_eq!(
            resolve_daily_pace(Some(Decimal::ZERO), &history, today, PacePolicy::default()),
            Decimal::from(10)
        );
        assert_eq!(
            resolve_daily_pace(None, &[], today, PacePolicy::default()),
            Decimal::ZERO
        );
    }
}
