//! Next-occurrence computation for anchored due dates and reminders.
//!
//! All times are wall-clock [`NaiveDateTime`] values. An anchor of 09:30 stays
//! 09:30 across daylight-saving changes; mapping it onto a zone is left to the
//! notification layer that registers the alert.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    cadence::{clamped_date, RecurrenceFrequency, TimeInterval},
    config::SchedulerConfig,
    errors::{EngineError, Result},
    obligation::{Anchor, AnchorDay, Obligation},
};

/// Upper bound on roll-forward steps for a single lookup.
pub const MAX_SCHEDULE_STEPS: u32 = 100_000;

/// What the notification collaborator needs to register an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRequest {
    pub obligation_id: Uuid,
    pub title: String,
    pub fire_at: NaiveDateTime,
    pub anchor: Anchor,
    /// Repeat step for the platform alert; `None` for one-time reminders.
    pub repeat: Option<TimeInterval>,
    /// True when a one-time reminder's date has already passed.
    pub stale: bool,
}

/// Stateless occurrence scheduler parameterised by week start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    week_start: Weekday,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::from_config(&SchedulerConfig::default())
    }
}

impl Scheduler {
    pub fn new(week_start: Weekday) -> Self {
        Self { week_start }
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(config.week_start)
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// Next due moment of an obligation's reminder, or `None` when reminders are off.
    ///
    /// Recurring obligations are proposed in the period containing `now`.
    /// One-time obligations are proposed in the period of their known due date
    /// and are returned as-is even when already past.
    pub fn next_occurrence(
        &self,
        obligation: &Obligation,
        now: NaiveDateTime,
    ) -> Result<Option<NaiveDateTime>> {
        if !obligation.reminder_enabled {
            return Ok(None);
        }
        let anchor = obligation.anchor.ok_or_else(|| {
            EngineError::InvalidAnchor(format!(
                "reminder enabled for `{}` without an anchor",
                obligation.name
            ))
        })?;
        let period = if obligation.is_recurring() {
            now.date()
        } else {
            obligation.due_date
        };
        self.resolve(&anchor, obligation.frequency, period, now)
            .map(Some)
    }

    /// Next occurrence of `anchor` at or after `now`, proposed in `now`'s period.
    pub fn next_occurrence_for(
        &self,
        anchor: &Anchor,
        frequency: RecurrenceFrequency,
        now: NaiveDateTime,
    ) -> Result<NaiveDateTime> {
        self.resolve(anchor, frequency, now.date(), now)
    }

    /// Builds the alert registration for an obligation's next reminder.
    pub fn reminder_request(
        &self,
        obligation: &Obligation,
        now: NaiveDateTime,
    ) -> Result<Option<ReminderRequest>> {
        let Some(fire_at) = self.next_occurrence(obligation, now)? else {
            return Ok(None);
        };
        let Some(anchor) = obligation.anchor else {
            return Ok(None);
        };
        Ok(Some(ReminderRequest {
            obligation_id: obligation.id,
            title: obligation.name.clone(),
            fire_at,
            anchor,
            repeat: obligation.frequency.interval(),
            stale: fire_at < now,
        }))
    }

    /// Due dates of `obligation` falling inside `[start, end]`.
    ///
    /// The series starts at the obligation's known due date; earlier dates are
    /// never produced. Day-of-month anchors keep their day across short months.
    pub fn occurrences_between(
        &self,
        obligation: &Obligation,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<NaiveDate> {
        let origin = obligation.due_date;
        if end < start || origin > end {
            return Vec::new();
        }
        let Some(interval) = obligation.frequency.interval() else {
            return if origin >= start { vec![origin] } else { Vec::new() };
        };
        let anchor_day = match obligation.anchor.map(|anchor| anchor.day) {
            Some(AnchorDay::DayOfMonth(day)) if (1..=31).contains(&day) => Some(day),
            _ => None,
        };

        let mut dates = Vec::new();
        let mut step = interval.steps_before(origin, start);
        let mut finished = false;
        for _ in 0..MAX_SCHEDULE_STEPS {
            let Some(date) = step_from(origin, anchor_day, interval, step) else {
                finished = true;
                break;
            };
            if date > end {
                finished = true;
                break;
            }
            // An anchor day earlier than the due day lands before `origin` in its month.
            if date >= start && date >= origin {
                dates.push(date);
            }
            step = step.saturating_add(1);
        }
        if !finished {
            warn!(
                obligation = %obligation.name,
                %start,
                %end,
                interval = %interval.label(),
                "occurrence listing stopped at the step guard"
            );
        }
        dates
    }

    fn resolve(
        &self,
        anchor: &Anchor,
        frequency: RecurrenceFrequency,
        period: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<NaiveDateTime> {
        let time = anchor.time()?;
        let initial = self.propose(anchor, period)?;
        let proposed = initial.and_time(time);
        if proposed >= now {
            return Ok(proposed);
        }

        let Some(interval) = frequency.interval() else {
            debug!(%proposed, %now, "one-time anchor already passed");
            return Ok(proposed);
        };

        let anchor_day = match anchor.day {
            AnchorDay::DayOfMonth(day) => Some(day),
            AnchorDay::Weekday(_) => None,
        };
        for step in 1..=MAX_SCHEDULE_STEPS {
            let Some(date) = step_from(initial, anchor_day, interval, step) else {
                break;
            };
            let candidate = date.and_time(time);
            if candidate >= now {
                return Ok(candidate);
            }
        }
        warn!(
            %proposed,
            %now,
            interval = %interval.label(),
            "anchor could not be rolled past now"
        );
        Err(EngineError::InvalidAnchor(format!(
            "no {} occurrence at or after {}",
            frequency, now
        )))
    }

    /// The anchor's date inside the month or week containing `period`.
    fn propose(&self, anchor: &Anchor, period: NaiveDate) -> Result<NaiveDate> {
        let date = match anchor.day {
            AnchorDay::DayOfMonth(day) => clamped_date(period.year(), period.month(), day),
            AnchorDay::Weekday(_) => {
                let weekday = anchor.chrono_weekday()?.unwrap_or(self.week_start);
                let into_week = days_from(self.week_start, period.weekday());
                let offset = days_from(self.week_start, weekday);
                period
                    .checked_sub_days(Days::new(into_week))
                    .and_then(|week_start| week_start.checked_add_days(Days::new(offset)))
            }
        };
        date.ok_or_else(|| {
            EngineError::InvalidAnchor(format!("{:?} has no date near {}", anchor.day, period))
        })
    }
}

/// Next occurrence using a Sunday-start scheduler.
pub fn next_occurrence(
    anchor: &Anchor,
    frequency: RecurrenceFrequency,
    now: NaiveDateTime,
) -> Result<NaiveDateTime> {
    Scheduler::default().next_occurrence_for(anchor, frequency, now)
}

/// Date `step` intervals after `origin`. Month-based steps with a day-of-month
/// anchor are rebuilt from the anchor day so 31 -> Apr 30 -> May 31.
fn step_from(
    origin: NaiveDate,
    anchor_day: Option<u32>,
    interval: TimeInterval,
    step: u32,
) -> Option<NaiveDate> {
    match (anchor_day, interval.months()) {
        (Some(day), Some(_)) => {
            let shifted = interval.nth_after(origin.with_day(1)?, step)?;
            clamped_date(shifted.year(), shifted.month(), day)
        }
        _ => interval.nth_after(origin, step),
    }
}

fn days_from(week_start: Weekday, weekday: Weekday) -> u64 {
    let start = week_start.num_days_from_monday();
    let target = weekday.num_days_from_monday();
    ((target + 7 - start) % 7) as u64
}
