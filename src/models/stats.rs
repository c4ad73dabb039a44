use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A day record with its computed percentage. Derived on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredDay {
    pub date: NaiveDate,
    /// Offset from the month start, 1-based. Not clamped to the month.
    pub day_number: i64,
    pub prayers: u8,
    pub quran_pages: i64,
    pub morning_dhikr: bool,
    pub evening_dhikr: bool,
    pub custom_tasks_completed: usize,
    pub custom_tasks_total: usize,
    pub total_progress: u8,
}

impl ScoredDay {
    pub fn dhikr_sessions(&self) -> u32 {
        self.morning_dhikr as u32 + self.evening_dhikr as u32
    }
}

/// Inclusive range of day numbers inside the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub index: u8,
    pub start_day: i64,
    pub end_day: i64,
}

impl Period {
    pub fn len(&self) -> i64 {
        self.end_day - self.start_day + 1
    }

    pub fn contains(&self, day_number: i64) -> bool {
        day_number >= self.start_day && day_number <= self.end_day
    }

    pub fn label(&self) -> String {
        format!("Days {}-{}", self.start_day, self.end_day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodState {
    Locked,
    Unlocked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReport {
    pub period: Period,
    pub state: PeriodState,
    /// Empty while the period is locked.
    pub days: Vec<ScoredDay>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHighlight {
    pub date: NaiveDate,
    pub score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSummary {
    pub days: usize,
    pub total_prayers: u32,
    pub max_prayers: u32,
    pub total_pages: i64,
    pub morning_sessions: u32,
    pub evening_sessions: u32,
    pub avg_progress: u8,
    pub best_day: Option<DayHighlight>,
    pub weakest_day: Option<DayHighlight>,
    /// Longest run of consecutive days scoring 70 or more.
    pub best_streak: u32,
    pub top_days: Vec<DayHighlight>,
}

impl RangeSummary {
    pub fn total_dhikr(&self) -> u32 {
        self.morning_sessions + self.evening_sessions
    }

    pub fn prayer_ratio(&self) -> f64 {
        if self.max_prayers == 0 {
            0.0
        } else {
            self.total_prayers as f64 / self.max_prayers as f64
        }
    }
}
