use chrono::{Duration, NaiveDate};

use crate::error::ConfigError;
use crate::models::{Period, PeriodState};

pub const PERIOD_LENGTH: i64 = 10;

/// 1-based day number of `date` within a month starting on `start`.
///
/// Dates before the start give 0 or less, dates after the month give more
/// than its length. Callers decide how to label those (see [`MonthPhase`]).
pub fn day_number_for(date: NaiveDate, start: NaiveDate) -> i64 {
    (date - start).num_days() + 1
}

/// Calendar date of day `n`. Left inverse of [`day_number_for`].
pub fn date_for_day_number(n: i64, start: NaiveDate) -> NaiveDate {
    start + Duration::days(n - 1)
}

/// Split a month into 1-10, 11-20 and 21-end.
pub fn periods(month_length: u32) -> [Period; 3] {
    let end = month_length as i64;
    [
        Period {
            index: 1,
            start_day: 1,
            end_day: PERIOD_LENGTH,
        },
        Period {
            index: 2,
            start_day: PERIOD_LENGTH + 1,
            end_day: 2 * PERIOD_LENGTH,
        },
        Period {
            index: 3,
            start_day: 2 * PERIOD_LENGTH + 1,
            end_day: end,
        },
    ]
}

/// A period unlocks the moment its first day arrives, whether or not any
/// data has been entered for it.
pub fn is_period_available(period: &Period, today_day: i64) -> bool {
    today_day >= period.start_day
}

pub fn period_state(period: &Period, today_day: i64) -> PeriodState {
    if is_period_available(period, today_day) {
        PeriodState::Unlocked
    } else {
        PeriodState::Locked
    }
}

/// How many days of the month have been reached, in `0..=max_days`.
pub fn unlocked_days(today: NaiveDate, start: NaiveDate, max_days: u32) -> u32 {
    day_number_for(today, start).clamp(0, max_days as i64) as u32
}

pub fn days_remaining(today: NaiveDate, start: NaiveDate, total_days: u32) -> u32 {
    total_days - unlocked_days(today, start, total_days)
}

pub fn is_day_unlocked(day: u32, today: NaiveDate, start: NaiveDate, max_days: u32) -> bool {
    day <= unlocked_days(today, start, max_days)
}

/// The `n` dates ending on `today`, oldest first.
pub fn trailing_dates(today: NaiveDate, n: u32) -> Vec<NaiveDate> {
    (0..n as i64)
        .rev()
        .map(|back| today - Duration::days(back))
        .collect()
}

/// Group consecutive days into weeks of seven; the last week may be short.
pub fn weeks<T>(days: &[T]) -> Vec<&[T]> {
    days.chunks(7).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthPhase {
    NotStarted,
    InProgress(i64),
    Completed,
}

impl MonthPhase {
    pub fn of(day_number: i64, month_length: u32) -> Self {
        if day_number < 1 {
            MonthPhase::NotStarted
        } else if day_number > month_length as i64 {
            MonthPhase::Completed
        } else {
            MonthPhase::InProgress(day_number)
        }
    }

    pub fn label(&self) -> String {
        match self {
            MonthPhase::NotStarted => "Not started".to_string(),
            MonthPhase::InProgress(n) => format!("Day {} of Ramadan", n),
            MonthPhase::Completed => "Completed".to_string(),
        }
    }
}

/// A validated month: start date plus a length of 29 or 30 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    start: NaiveDate,
    length: u32,
}

impl MonthWindow {
    pub fn new(start: NaiveDate, length: u32) -> Result<Self, ConfigError> {
        if length != 29 && length != 30 {
            return Err(ConfigError::InvalidMonthLength(length));
        }
        Ok(Self { start, length })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn end(&self) -> NaiveDate {
        self.date_for(self.length as i64)
    }

    pub fn day_number(&self, date: NaiveDate) -> i64 {
        day_number_for(date, self.start)
    }

    pub fn date_for(&self, n: i64) -> NaiveDate {
        date_for_day_number(n, self.start)
    }

    pub fn phase(&self, today: NaiveDate) -> MonthPhase {
        MonthPhase::of(self.day_number(today), self.length)
    }

    pub fn periods(&self) -> [Period; 3] {
        periods(self.length)
    }

    pub fn period_for_day(&self, n: i64) -> Option<Period> {
        self.periods().into_iter().find(|p| p.contains(n))
    }

    /// Every date of the month in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        (1..=self.length as i64).map(|n| self.date_for(n)).collect()
    }

    /// Month dates up to and including `today`.
    pub fn dates_through(&self, today: NaiveDate) -> Vec<NaiveDate> {
        self.dates()
            .into_iter()
            .zip(1..)
            .filter(|(_, n)| is_day_unlocked(*n, today, self.start, self.length))
            .map(|(date, _)| date)
            .collect()
    }

    pub fn unlocked_days(&self, today: NaiveDate) -> u32 {
        unlocked_days(today, self.start, self.length)
    }

    pub fn days_remaining(&self, today: NaiveDate) -> u32 {
        days_remaining(today, self.start, self.length)
    }
}
