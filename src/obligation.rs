//! Caller-supplied obligation and transaction models consumed read-only by the engine.

use chrono::{NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    cadence::RecurrenceFrequency,
    errors::{EngineError, Result},
};

/// Which part of its cycle an anchor pins: a calendar day or a weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorDay {
    /// Day of month, 1 through 31.
    DayOfMonth(u32),
    /// Weekday, 1 = Sunday through 7 = Saturday.
    Weekday(u32),
}

/// Partial time specification identifying where a recurring obligation falls due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    pub day: AnchorDay,
    pub hour: u32,
    pub minute: u32,
}

impl Anchor {
    pub fn day_of_month(day: u32, hour: u32, minute: u32) -> Self {
        Self {
            day: AnchorDay::DayOfMonth(day),
            hour,
            minute,
        }
    }

    pub fn weekday(weekday: u32, hour: u32, minute: u32) -> Self {
        Self {
            day: AnchorDay::Weekday(weekday),
            hour,
            minute,
        }
    }

    /// Rejects out-of-range day, weekday, hour, or minute fields.
    pub fn validate(&self) -> Result<()> {
        match self.day {
            AnchorDay::DayOfMonth(day) if !(1..=31).contains(&day) => {
                return Err(EngineError::InvalidAnchor(format!(
                    "day of month {} is outside 1-31",
                    day
                )));
            }
            AnchorDay::Weekday(weekday) if !(1..=7).contains(&weekday) => {
                return Err(EngineError::InvalidAnchor(format!(
                    "weekday {} is outside 1-7",
                    weekday
                )));
            }
            _ => {}
        }
        if self.hour > 23 {
            return Err(EngineError::InvalidAnchor(format!(
                "hour {} is outside 0-23",
                self.hour
            )));
        }
        if self.minute > 59 {
            return Err(EngineError::InvalidAnchor(format!(
                "minute {} is outside 0-59",
                self.minute
            )));
        }
        Ok(())
    }

    /// Wall-clock time of day the anchor falls due.
    pub fn time(&self) -> Result<NaiveTime> {
        self.validate()?;
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).ok_or_else(|| {
            EngineError::InvalidAnchor(format!("{:02}:{:02} is not a time", self.hour, self.minute))
        })
    }

    /// The anchored weekday, when this is a weekday anchor.
    pub fn chrono_weekday(&self) -> Result<Option<Weekday>> {
        self.validate()?;
        Ok(match self.day {
            AnchorDay::DayOfMonth(_) => None,
            AnchorDay::Weekday(number) => Some(weekday_from_number(number)?),
        })
    }
}

/// Maps 1 = Sunday ... 7 = Saturday onto [`Weekday`].
pub fn weekday_from_number(number: u32) -> Result<Weekday> {
    match number {
        1 => Ok(Weekday::Sun),
        2 => Ok(Weekday::Mon),
        3 => Ok(Weekday::Tue),
        4 => Ok(Weekday::Wed),
        5 => Ok(Weekday::Thu),
        6 => Ok(Weekday::Fri),
        7 => Ok(Weekday::Sat),
        other => Err(EngineError::InvalidAnchor(format!(
            "weekday {} is outside 1-7",
            other
        ))),
    }
}

/// Direction of an obligation's cash effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObligationKind {
    #[default]
    Bill,
    Income,
}

/// A recurring (or one-time) bill or income item handed in by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obligation {
    pub id: Uuid,
    pub name: String,
    /// Non-negative magnitude; the sign comes from `kind`.
    pub amount: Decimal,
    #[serde(default)]
    pub kind: ObligationKind,
    pub frequency: RecurrenceFrequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
    #[serde(default)]
    pub reminder_enabled: bool,
    pub due_date: NaiveDate,
}

impl Obligation {
    pub fn new(
        name: impl Into<String>,
        amount: Decimal,
        frequency: RecurrenceFrequency,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            kind: ObligationKind::Bill,
            frequency,
            anchor: None,
            reminder_enabled: false,
            due_date,
        }
    }

    pub fn income(
        name: impl Into<String>,
        amount: Decimal,
        frequency: RecurrenceFrequency,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            kind: ObligationKind::Income,
            ..Self::new(name, amount, frequency, due_date)
        }
    }

    /// Attaches an anchor and turns the reminder on.
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self.reminder_enabled = true;
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.frequency.is_recurring()
    }

    /// Cash effect of one occurrence: bills negative, income positive.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            ObligationKind::Bill => -self.amount.abs(),
            ObligationKind::Income => self.amount.abs(),
        }
    }
}

/// A dated, signed historical or planned transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalTransaction {
    pub date: NaiveDate,
    pub amount: Decimal,
}

impl HistoricalTransaction {
    pub fn new(date: NaiveDate, amount: Decimal) -> Self {
        Self { date, amount }
    }

    pub fn is_expense(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}
