use chrono::NaiveDate;

use crate::models::{DayHighlight, DayRecord, PeriodReport, PeriodState, RangeSummary, ScoredDay};
use crate::progress::scorer::score_record;
use crate::progress::window::{MonthWindow, period_state};

/// Days at or above this score extend a streak.
pub const STREAK_THRESHOLD: u8 = 70;
/// Days below this score are called out as the weakest.
pub const WEAK_DAY_THRESHOLD: u8 = 30;

pub fn score_day(month: &MonthWindow, date: NaiveDate, day: &DayRecord) -> ScoredDay {
    ScoredDay {
        date,
        day_number: month.day_number(date),
        prayers: day.prayers_completed(),
        quran_pages: day.quran_pages.max(0),
        morning_dhikr: day.morning_dhikr,
        evening_dhikr: day.evening_dhikr,
        custom_tasks_completed: day.tasks_completed(),
        custom_tasks_total: day.custom_tasks.len(),
        total_progress: score_record(day),
    }
}

pub fn score_days(month: &MonthWindow, days: &[(NaiveDate, DayRecord)]) -> Vec<ScoredDay> {
    days.iter()
        .map(|(date, day)| score_day(month, *date, day))
        .collect()
}

pub fn summarize(days: &[ScoredDay]) -> RangeSummary {
    if days.is_empty() {
        return RangeSummary::default();
    }

    let n = days.len();
    let progress_sum: u32 = days.iter().map(|d| d.total_progress as u32).sum();
    let avg_progress = (progress_sum as f64 / n as f64).round() as u8;

    // Stable sort keeps calendar order among ties.
    let mut ranked: Vec<&ScoredDay> = days.iter().collect();
    ranked.sort_by(|a, b| b.total_progress.cmp(&a.total_progress));

    let best_day = ranked
        .first()
        .filter(|d| d.total_progress > 0)
        .map(|d| highlight(d));
    let weakest_day = ranked
        .last()
        .filter(|d| d.total_progress < WEAK_DAY_THRESHOLD)
        .map(|d| highlight(d));
    let top_days = ranked.iter().take(3).map(|d| highlight(d)).collect();

    RangeSummary {
        days: n,
        total_prayers: days.iter().map(|d| d.prayers as u32).sum(),
        max_prayers: n as u32 * 5,
        total_pages: days.iter().map(|d| d.quran_pages).sum(),
        morning_sessions: days.iter().filter(|d| d.morning_dhikr).count() as u32,
        evening_sessions: days.iter().filter(|d| d.evening_dhikr).count() as u32,
        avg_progress,
        best_day,
        weakest_day,
        best_streak: best_streak(days),
        top_days,
    }
}

fn highlight(d: &ScoredDay) -> DayHighlight {
    DayHighlight {
        date: d.date,
        score: d.total_progress,
    }
}

fn best_streak(days: &[ScoredDay]) -> u32 {
    let mut best = 0u32;
    let mut current = 0u32;
    for day in days {
        if day.total_progress >= STREAK_THRESHOLD {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// Three period reports for the month as seen on `today`. Locked periods
/// never expose their days.
pub fn period_breakdown(month: &MonthWindow, today: NaiveDate, days: &[ScoredDay]) -> Vec<PeriodReport> {
    let today_day = month.day_number(today);
    month
        .periods()
        .into_iter()
        .map(|period| {
            let state = period_state(&period, today_day);
            let days = match state {
                PeriodState::Locked => vec![],
                PeriodState::Unlocked => days
                    .iter()
                    .filter(|d| period.contains(d.day_number))
                    .cloned()
                    .collect(),
            };
            PeriodReport { period, state, days }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerName;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn month() -> MonthWindow {
        MonthWindow::new(date("2026-02-18"), 30).unwrap()
    }

    fn full_day() -> DayRecord {
        let mut day = DayRecord::default();
        for p in PrayerName::ALL {
            day.toggle_prayer(p);
        }
        day.morning_dhikr = true;
        day.evening_dhikr = true;
        day.quran_pages = 6;
        day
    }

    fn scored(scores: &[u8]) -> Vec<ScoredDay> {
        let m = month();
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| ScoredDay {
                total_progress: *s,
                ..score_day(&m, m.date_for(i as i64 + 1), &DayRecord::default())
            })
            .collect()
    }

    #[test]
    fn scores_records_with_day_numbers() {
        let m = month();
        let mut partial = DayRecord::default();
        partial.toggle_prayer(PrayerName::Fajr);
        partial.toggle_prayer(PrayerName::Asr);
        partial.toggle_prayer(PrayerName::Isha);
        partial.morning_dhikr = true;
        partial.quran_pages = 2;

        let days = score_days(
            &m,
            &[
                (date("2026-02-18"), full_day()),
                (date("2026-02-19"), partial),
                (date("2026-02-20"), DayRecord::default()),
            ],
        );
        let progress: Vec<u8> = days.iter().map(|d| d.total_progress).collect();
        assert_eq!(progress, vec![100, 54, 0]);
        assert_eq!(days[1].day_number, 2);
        assert_eq!(days[1].prayers, 3);
        assert_eq!(days[0].quran_pages, 6);
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        let s = summarize(&[]);
        assert_eq!(s.days, 0);
        assert_eq!(s.avg_progress, 0);
        assert!(s.best_day.is_none());
        assert!(s.top_days.is_empty());
    }

    #[test]
    fn summary_totals_and_highlights() {
        let m = month();
        let days = score_days(
            &m,
            &[
                (date("2026-02-18"), full_day()),
                (date("2026-02-19"), DayRecord::default()),
            ],
        );
        let s = summarize(&days);
        assert_eq!(s.days, 2);
        assert_eq!(s.total_prayers, 5);
        assert_eq!(s.max_prayers, 10);
        assert_eq!(s.total_pages, 6);
        assert_eq!(s.total_dhikr(), 2);
        assert_eq!(s.avg_progress, 50);
        assert_eq!(s.best_day.map(|d| d.date), Some(date("2026-02-18")));
        assert_eq!(s.weakest_day.map(|d| d.score), Some(0));
        assert_eq!(s.best_streak, 1);
    }

    #[test]
    fn best_day_requires_some_progress() {
        let s = summarize(&scored(&[0, 0, 0]));
        assert!(s.best_day.is_none());
        assert_eq!(s.weakest_day.map(|d| d.score), Some(0));
    }

    #[test]
    fn weakest_day_only_when_low() {
        let s = summarize(&scored(&[80, 30, 90]));
        assert!(s.weakest_day.is_none());
        assert_eq!(s.avg_progress, 67);
    }

    #[test]
    fn streak_counts_consecutive_strong_days() {
        let s = summarize(&scored(&[70, 85, 40, 100, 100, 100, 69]));
        assert_eq!(s.best_streak, 3);
    }

    #[test]
    fn top_days_keep_calendar_order_on_ties() {
        let s = summarize(&scored(&[60, 90, 60, 90, 10]));
        let top: Vec<(u8, NaiveDate)> = s.top_days.iter().map(|d| (d.score, d.date)).collect();
        let m = month();
        assert_eq!(
            top,
            vec![(90, m.date_for(2)), (90, m.date_for(4)), (60, m.date_for(1))]
        );
    }

    #[test]
    fn locked_periods_hide_their_days() {
        let m = month();
        let days = scored(&[50; 30]);
        let report = period_breakdown(&m, date("2026-02-28"), &days);
        assert_eq!(report.len(), 3);
        assert_eq!(report[0].state, PeriodState::Unlocked);
        assert_eq!(report[0].days.len(), 10);
        assert_eq!(report[1].state, PeriodState::Unlocked);
        assert_eq!(report[1].days.len(), 10);
        assert_eq!(report[1].days[0].day_number, 11);
        assert_eq!(report[2].state, PeriodState::Locked);
        assert!(report[2].days.is_empty());
    }

    #[test]
    fn everything_locked_before_the_month() {
        let m = month();
        let report = period_breakdown(&m, date("2026-02-01"), &[]);
        assert!(report.iter().all(|r| r.state == PeriodState::Locked));
    }
}
