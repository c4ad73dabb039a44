use anyhow::{Result, anyhow};
use chrono::{NaiveDate, Utc};
use std::str::FromStr;

use crate::cli::args::{DhikrCommands, SummaryRange, TaskCommands};
use crate::config::{AppConfig, Session, parse_date};
use crate::config::session::validate_username;
use crate::db::repository::DayRepo;
use crate::db::store::KvStore;
use crate::models::{DayRecord, PeriodState, PrayerName, RangeSummary, ScoredDay};
use crate::progress::scorer::{pages_to_juz, progress_message};
use crate::progress::summary::{period_breakdown, score_days, summarize};
use crate::progress::window::{trailing_dates, weeks};
use crate::progress::{Badge, MonthPhase, MonthWindow, breakdown, score_record};
use crate::utils::format::{format_juz, pad_display, progress_bar, short_date};
use crate::utils::hijri::{detect_ramadan, to_hijri};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

fn score_color(score: u8) -> &'static str {
    match score {
        70..=u8::MAX => GREEN,
        40..=69 => AMBER,
        _ => DIM,
    }
}

fn tick(done: bool) -> String {
    if done {
        format!("{}✓\x1b[0m", GREEN)
    } else {
        format!("{}○\x1b[0m", DIM)
    }
}

/// Everything a command needs to know about who and when.
pub struct Ctx<'a> {
    pub store: &'a dyn KvStore,
    pub session: &'a Session,
    pub month: MonthWindow,
    pub today: NaiveDate,
    pub hijri_offset: i32,
}

// ─── Setup ───────────────────────────────────────────────────────────────────

pub struct SetupOptions {
    pub start: Option<String>,
    pub length: Option<u32>,
    pub user: Option<String>,
    pub detect: bool,
    pub hijri_offset: Option<i32>,
}

/// Merges the options into `config` and checks the result. The stored config
/// may be invalid on entry; only the merged values have to be valid.
pub fn apply_setup(
    config: &mut AppConfig,
    opts: &SetupOptions,
    today: NaiveDate,
) -> Result<(MonthWindow, Session)> {
    if let Some(offset) = opts.hijri_offset {
        config.month.hijri_offset = offset;
    }
    if opts.detect {
        let (start, length) = detect_ramadan(today, config.month.hijri_offset)?;
        config.month.start_date = start;
        config.month.length = length;
    }
    if let Some(start) = &opts.start {
        config.month.start_date = parse_date(start)?;
    }
    if let Some(length) = opts.length {
        config.month.length = length;
    }
    if let Some(user) = &opts.user {
        config.session.username = validate_username(user)?;
    }

    let month = config.month_window()?;
    let session = config.session()?;
    Ok((month, session))
}

pub fn handle_setup(config: &mut AppConfig, opts: SetupOptions, today: NaiveDate) -> Result<()> {
    let (month, session) = apply_setup(config, &opts, today)?;
    config.save()?;

    println!();
    println_colored!(GOLD, "  Ramadan Companion configured");
    println!();
    println!("  User:    {}", session.username);
    println!(
        "  Month:   {} to {} ({} days)",
        month.start(),
        month.end(),
        month.length()
    );
    if config.month.hijri_offset != 0 {
        println!("  Hijri offset: {:+} day(s)", config.month.hijri_offset);
    }
    println!();
    Ok(())
}

// ─── Today ───────────────────────────────────────────────────────────────────

pub fn handle_today(ctx: &Ctx) -> Result<()> {
    let day = DayRepo::load(ctx.store, &ctx.session.username, ctx.today);
    let b = breakdown(
        day.prayers_completed() as i64,
        day.morning_dhikr,
        day.evening_dhikr,
        day.quran_pages as f64,
    );

    println!();
    let hijri = to_hijri(ctx.today, ctx.hijri_offset)
        .map(|h| h.formatted())
        .unwrap_or_default();
    println_colored!(
        GOLD,
        "  {}  {}  {}",
        ctx.today.format("%A %d %B %Y"),
        hijri,
        ctx.month.phase(ctx.today).label()
    );
    if let MonthPhase::InProgress(n) = ctx.month.phase(ctx.today) {
        if let Some(period) = ctx.month.period_for_day(n) {
            println_colored!(
                DIM,
                "  Period {} ({})  ·  {} of {} days unlocked",
                period.index,
                period.label(),
                ctx.month.unlocked_days(ctx.today),
                ctx.month.length()
            );
        }
    }
    println!();
    if day.is_untouched() {
        println_colored!(DIM, "  Nothing recorded yet for this day");
        println!();
    }

    println_colored!(BOLD, "  Prayers   {}/5", day.prayers_completed());
    for name in PrayerName::ALL {
        println!("    {}  {}", tick(day.is_prayer_done(name)), name);
    }
    println!();
    println_colored!(BOLD, "  Adhkar");
    println!("    {}  Morning", tick(day.morning_dhikr));
    println!("    {}  Evening", tick(day.evening_dhikr));
    println!();
    println_colored!(BOLD, "  Quran     {} pages", day.quran_pages.max(0));
    println!();

    if !day.custom_tasks.is_empty() {
        println_colored!(
            BOLD,
            "  Tasks     {}/{}",
            day.tasks_completed(),
            day.custom_tasks.len()
        );
        print_tasks(&day);
        println!();
    }

    println_colored!(
        score_color(b.total),
        "  Progress  {} {}%  ({:.0}/85 pts)",
        progress_bar(b.total as u32, 100, 20),
        b.total,
        b.raw()
    );
    println_colored!(
        DIM,
        "  prayers {:.0}/35  morning {:.0}/15  evening {:.0}/15  quran {:.0}/20",
        b.prayers,
        b.morning,
        b.evening,
        b.quran
    );
    println!("  {}", progress_message(b.total));
    println!();
    Ok(())
}

fn print_tasks(day: &DayRecord) {
    for task in &day.custom_tasks {
        println!(
            "    {}  {}  {}{}\x1b[0m",
            tick(task.completed),
            pad_display(&task.text, 36),
            DIM,
            task.id
        );
    }
}

// ─── Tracking ────────────────────────────────────────────────────────────────

fn print_new_score(day: &DayRecord) {
    let score = score_record(day);
    println_colored!(score_color(score), "  Today: {}%", score);
}

pub fn handle_pray(ctx: &Ctx, prayer_str: &str) -> Result<()> {
    let prayer = PrayerName::from_str(prayer_str).map_err(|_| {
        anyhow!(
            "Unknown prayer '{}'. Use: fajr, dhuhr, asr, maghrib, isha",
            prayer_str
        )
    })?;

    let (done, day) = DayRepo::update(ctx.store, &ctx.session.username, ctx.today, |day| {
        Ok(day.toggle_prayer(prayer))
    })?;

    if done {
        println_colored!(GREEN, "  ✓ {} prayed", prayer);
    } else {
        println_colored!(DIM, "  ○ {} unmarked", prayer);
    }
    print_new_score(&day);
    Ok(())
}

pub fn handle_dhikr(ctx: &Ctx, which: DhikrCommands) -> Result<()> {
    let (done, day) = DayRepo::update(ctx.store, &ctx.session.username, ctx.today, |day| {
        Ok(match which {
            DhikrCommands::Morning => day.toggle_morning(),
            DhikrCommands::Evening => day.toggle_evening(),
        })
    })?;

    let label = match which {
        DhikrCommands::Morning => "Morning adhkar",
        DhikrCommands::Evening => "Evening adhkar",
    };
    if done {
        println_colored!(GREEN, "  ✓ {} done", label);
    } else {
        println_colored!(DIM, "  ○ {} unmarked", label);
    }
    print_new_score(&day);
    Ok(())
}

pub fn handle_quran(ctx: &Ctx, pages: i64) -> Result<()> {
    let (total, day) = DayRepo::update(ctx.store, &ctx.session.username, ctx.today, |day| {
        Ok(day.add_pages(pages))
    })?;
    println_colored!(
        GREEN,
        "  ✓ Logged {:+} pages, total for the day: {}",
        pages,
        total
    );
    print_new_score(&day);
    Ok(())
}

pub fn handle_task(ctx: &Ctx, action: &TaskCommands) -> Result<()> {
    let user = &ctx.session.username;
    match action {
        TaskCommands::Add { text } => {
            let text = text.join(" ");
            let (id, _) = DayRepo::update(ctx.store, user, ctx.today, |day| {
                Ok(day.add_task(&text, Utc::now())?.id.clone())
            })?;
            println_colored!(GREEN, "  ✓ Added task {}", id);
        }
        TaskCommands::Done { id } => {
            let (done, _) =
                DayRepo::update(ctx.store, user, ctx.today, |day| Ok(day.toggle_task(id)?))?;
            if done {
                println_colored!(GREEN, "  ✓ Task {} done", id);
            } else {
                println_colored!(DIM, "  ○ Task {} reopened", id);
            }
        }
        TaskCommands::Remove { id } => {
            let (removed, _) =
                DayRepo::update(ctx.store, user, ctx.today, |day| Ok(day.remove_task(id)?))?;
            println_colored!(AMBER, "  Removed task: {}", removed.text);
        }
        TaskCommands::List => {
            let day = DayRepo::load(ctx.store, user, ctx.today);
            println!();
            if day.custom_tasks.is_empty() {
                println_colored!(DIM, "  No tasks for {}", ctx.today);
            } else {
                println_colored!(GOLD, "  Tasks for {}", ctx.today);
                println!();
                print_tasks(&day);
                println!();
                println_colored!(DIM, "  Tasks are extras and do not change the daily score");
            }
            println!();
        }
    }
    Ok(())
}

// ─── Periods ─────────────────────────────────────────────────────────────────

fn month_to_date(ctx: &Ctx) -> Vec<ScoredDay> {
    let dates = ctx.month.dates_through(ctx.today);
    let records = DayRepo::load_range(ctx.store, &ctx.session.username, &dates);
    score_days(&ctx.month, &records)
}

pub fn handle_periods(ctx: &Ctx) -> Result<()> {
    let scored = month_to_date(ctx);
    let reports = period_breakdown(&ctx.month, ctx.today, &scored);

    println!();
    println_colored!(
        GOLD,
        "  Ramadan {} to {}  ·  {}",
        ctx.month.start(),
        ctx.month.end(),
        ctx.month.phase(ctx.today).label()
    );
    println!();

    for report in &reports {
        let p = &report.period;
        match report.state {
            PeriodState::Locked => {
                println_colored!(
                    DIM,
                    "  🔒 Period {}  {}  unlocks {}",
                    p.index,
                    p.label(),
                    ctx.month.date_for(p.start_day)
                );
            }
            PeriodState::Unlocked => {
                let summary = summarize(&report.days);
                println_colored!(
                    score_color(summary.avg_progress),
                    "  Period {}  {}  avg {}%  ({} of {} days so far)",
                    p.index,
                    p.label(),
                    summary.avg_progress,
                    report.days.len(),
                    p.len()
                );
                for day in &report.days {
                    print_day_row(day);
                }
            }
        }
        println!();
    }
    Ok(())
}

fn print_day_row(day: &ScoredDay) {
    println!(
        "    Day {:>2}  {}  {}  {}{:>3}%\x1b[0m  {}/5 prayers  {}/2 adhkar  {} pages",
        day.day_number,
        short_date(day.date),
        progress_bar(day.total_progress as u32, 100, 10),
        score_color(day.total_progress),
        day.total_progress,
        day.prayers,
        day.dhikr_sessions(),
        day.quran_pages
    );
}

// ─── Summary ─────────────────────────────────────────────────────────────────

pub fn handle_summary(ctx: &Ctx, range: SummaryRange) -> Result<()> {
    let title = match range {
        SummaryRange::TenDay => "Last 10 days",
        SummaryRange::Week => "Last 7 days",
        SummaryRange::Month => "Ramadan so far",
    };
    let scored = range_days(ctx, range);
    let summary = summarize(&scored);
    let badge = match range {
        SummaryRange::Month => Badge::for_month(summary.avg_progress),
        _ => Badge::for_period(summary.avg_progress),
    };

    println!();
    println_colored!(GOLD, "  {}  ·  {}", title, badge);
    println!();

    if summary.days == 0 {
        println_colored!(DIM, "  Ramadan has not started yet");
        println!();
        return Ok(());
    }

    print_summary(&summary);
    println!();

    if range == SummaryRange::Month {
        for (i, week) in weeks(&scored).iter().enumerate() {
            let s = summarize(week);
            println_colored!(
                score_color(s.avg_progress),
                "  Week {}  {}  {:>3}%",
                i + 1,
                progress_bar(s.avg_progress as u32, 100, 14),
                s.avg_progress
            );
        }
        println!();
    }

    for day in &scored {
        print_day_row(day);
    }
    println!();
    Ok(())
}

/// Scored days for a summary range. Dates before the month starts are left
/// out, so every range is empty until day 1.
fn range_days(ctx: &Ctx, range: SummaryRange) -> Vec<ScoredDay> {
    match range {
        SummaryRange::TenDay => trailing(ctx, 10),
        SummaryRange::Week => trailing(ctx, 7),
        SummaryRange::Month => month_to_date(ctx),
    }
}

fn trailing(ctx: &Ctx, n: u32) -> Vec<ScoredDay> {
    let dates: Vec<NaiveDate> = trailing_dates(ctx.today, n)
        .into_iter()
        .filter(|d| ctx.month.day_number(*d) >= 1)
        .collect();
    let records = DayRepo::load_range(ctx.store, &ctx.session.username, &dates);
    score_days(&ctx.month, &records)
}

fn print_summary(summary: &RangeSummary) {
    println_colored!(
        score_color(summary.avg_progress),
        "  Average     {} {}%",
        progress_bar(summary.avg_progress as u32, 100, 20),
        summary.avg_progress
    );
    println!(
        "  Prayers     {}/{} ({:.0}%)",
        summary.total_prayers,
        summary.max_prayers,
        summary.prayer_ratio() * 100.0
    );
    println!(
        "  Quran       {} pages ({})",
        summary.total_pages,
        format_juz(pages_to_juz(summary.total_pages))
    );
    println!(
        "  Adhkar      {} morning, {} evening",
        summary.morning_sessions, summary.evening_sessions
    );
    println!("  Best streak {} days at 70%+", summary.best_streak);
    if let Some(best) = summary.best_day {
        println_colored!(GREEN, "  Best day    {} ({}%)", short_date(best.date), best.score);
    }
    if let Some(weak) = summary.weakest_day {
        println_colored!(AMBER, "  Lowest day  {} ({}%)", short_date(weak.date), weak.score);
    }
}

// ─── History ─────────────────────────────────────────────────────────────────

pub fn handle_history(ctx: &Ctx) -> Result<()> {
    let dates = DayRepo::tracked_dates(ctx.store, &ctx.session.username)?;
    println!();
    if dates.is_empty() {
        println_colored!(DIM, "  Nothing recorded yet for {}", ctx.session.username);
        println!();
        return Ok(());
    }

    println_colored!(GOLD, "  {} recorded days", dates.len());
    println!();
    let records = DayRepo::load_range(ctx.store, &ctx.session.username, &dates);
    for day in score_days(&ctx.month, &records) {
        let phase = MonthPhase::of(day.day_number, ctx.month.length());
        println!(
            "  {}  {:<18} {}{:>3}%\x1b[0m",
            day.date,
            phase.label(),
            score_color(day.total_progress),
            day.total_progress
        );
    }
    println!();
    Ok(())
}

// ─── Clear ───────────────────────────────────────────────────────────────────

pub fn handle_clear(ctx: &Ctx) -> Result<()> {
    if DayRepo::clear(ctx.store, &ctx.session.username, ctx.today)? {
        println_colored!(AMBER, "  Cleared everything recorded for {}", ctx.today);
    } else {
        println_colored!(DIM, "  Nothing recorded for {}", ctx.today);
    }
    Ok(())
}

// ─── Export ──────────────────────────────────────────────────────────────────

pub fn handle_export(ctx: &Ctx) -> Result<()> {
    let scored = month_to_date(ctx);
    let summary = summarize(&scored);

    println!("# Ramadan Companion: {}", ctx.session.username);
    println!("# {}  ({})", ctx.today, ctx.month.phase(ctx.today).label());
    println!();
    println!(
        "Month: {} to {} ({} days, {} unlocked, {} remaining)",
        ctx.month.start(),
        ctx.month.end(),
        ctx.month.length(),
        ctx.month.unlocked_days(ctx.today),
        ctx.month.days_remaining(ctx.today)
    );
    println!();
    println!("## Daily progress");
    for day in &scored {
        println!(
            "  Day {:>2}  {}  {:>3}%  {}  {}/5  {} pages  {}{}",
            day.day_number,
            day.date,
            day.total_progress,
            progress_bar(day.total_progress as u32, 100, 10),
            day.prayers,
            day.quran_pages,
            if day.morning_dhikr { "M" } else { "-" },
            if day.evening_dhikr { "E" } else { "-" }
        );
    }
    println!();
    println!("## Summary");
    println!("  Average:     {}% ({})", summary.avg_progress, Badge::for_month(summary.avg_progress));
    println!("  Prayers:     {}/{}", summary.total_prayers, summary.max_prayers);
    println!(
        "  Quran:       {} pages ({})",
        summary.total_pages,
        format_juz(pages_to_juz(summary.total_pages))
    );
    println!("  Adhkar:      {} sessions", summary.total_dhikr());
    println!("  Best streak: {} days", summary.best_streak);
    if !summary.top_days.is_empty() {
        let top: Vec<String> = summary
            .top_days
            .iter()
            .map(|d| format!("{} ({}%)", d.date, d.score))
            .collect();
        println!("  Top days:    {}", top.join(", "));
    }
    Ok(())
}
