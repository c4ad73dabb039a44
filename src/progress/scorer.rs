use serde::Serialize;

use crate::models::DayRecord;
use crate::models::day::CustomTask;

pub const PRAYER_WEIGHT: f64 = 35.0;
pub const MORNING_WEIGHT: f64 = 15.0;
pub const EVENING_WEIGHT: f64 = 15.0;
pub const QURAN_WEIGHT: f64 = 20.0;
/// Pages that earn full Quran credit.
pub const QURAN_TARGET_PAGES: f64 = 4.0;
pub const REQUIRED_TOTAL: f64 = PRAYER_WEIGHT + MORNING_WEIGHT + EVENING_WEIGHT + QURAN_WEIGHT;

pub const PAGES_PER_JUZ: f64 = 20.0;

/// Points earned by each required component, before normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressBreakdown {
    pub prayers: f64,
    pub morning: f64,
    pub evening: f64,
    pub quran: f64,
    pub total: u8,
}

impl ProgressBreakdown {
    pub fn raw(&self) -> f64 {
        self.prayers + self.morning + self.evening + self.quran
    }
}

pub fn breakdown(prayers_completed: i64, morning: bool, evening: bool, quran_pages: f64) -> ProgressBreakdown {
    let prayers = prayers_completed.clamp(0, 5) as f64 * PRAYER_WEIGHT / 5.0;
    let morning = if morning { MORNING_WEIGHT } else { 0.0 };
    let evening = if evening { EVENING_WEIGHT } else { 0.0 };
    let pages = if quran_pages.is_nan() { 0.0 } else { quran_pages.max(0.0) };
    let quran = (pages / QURAN_TARGET_PAGES).min(1.0) * QURAN_WEIGHT;

    let raw = prayers + morning + evening + quran;
    let total = (raw / REQUIRED_TOTAL * 100.0).round().clamp(0.0, 100.0) as u8;

    ProgressBreakdown {
        prayers,
        morning,
        evening,
        quran,
        total,
    }
}

/// Completion percentage for a day, 0..=100.
///
/// Only the required observances count: prayers, both dhikr sessions and
/// the Quran target. Custom tasks never move the number.
pub fn score(
    prayers_completed: i64,
    morning: bool,
    evening: bool,
    quran_pages: f64,
    _custom_tasks: &[CustomTask],
) -> u8 {
    breakdown(prayers_completed, morning, evening, quran_pages).total
}

pub fn score_record(day: &DayRecord) -> u8 {
    score(
        day.prayers_completed() as i64,
        day.morning_dhikr,
        day.evening_dhikr,
        day.quran_pages as f64,
        &day.custom_tasks,
    )
}

pub fn progress_message(progress: u8) -> &'static str {
    match progress {
        95..=u8::MAX => "Outstanding! MashaAllah!",
        85..=94 => "Excellent work! Keep it up!",
        70..=84 => "Great effort today!",
        50..=69 => "Good progress! Keep going!",
        30..=49 => "You're building momentum!",
        _ => "Every step counts! Start today!",
    }
}

pub fn pages_to_juz(pages: i64) -> f64 {
    pages.max(0) as f64 / PAGES_PER_JUZ
}
