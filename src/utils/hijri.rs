use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate};
use hijri_date::HijriDate;

pub const RAMADAN: usize = 9;
const SHAWWAL: usize = 10;
/// How far ahead to look for the next Ramadan (a Hijri year is ~354 days).
const SEARCH_DAYS: i64 = 400;

/// Islamic month names in English (index 0 = Muharram = month 1)
const HIJRI_MONTH_NAMES: &[&str] = &[
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

fn hijri_month_name(month: usize) -> &'static str {
    if (1..=12).contains(&month) {
        HIJRI_MONTH_NAMES[month - 1]
    } else {
        "Unknown"
    }
}

pub struct HijriInfo {
    pub day: usize,
    pub month: usize,
    pub year: usize,
    pub month_name: String,
}

impl HijriInfo {
    pub fn formatted(&self) -> String {
        format!("{} {} {}", self.day, self.month_name, self.year)
    }
}

/// Hijri date for a Gregorian date, shifted by `offset_days` for local moon
/// sighting (e.g. -1 if your country is one day behind Saudi Arabia).
pub fn to_hijri(date: NaiveDate, offset_days: i32) -> Result<HijriInfo> {
    let adjusted = date + Duration::days(offset_days as i64);
    let hd = HijriDate::from_gr(
        adjusted.year() as usize,
        adjusted.month() as usize,
        adjusted.day() as usize,
    )
    .map_err(|e| anyhow!("Hijri conversion error: {}", e))?;

    let month = hd.month();
    Ok(HijriInfo {
        day: hd.day(),
        month,
        year: hd.year(),
        month_name: hijri_month_name(month).to_string(),
    })
}

/// First day and length of the Ramadan that contains `from`, or otherwise
/// the next one after it.
pub fn detect_ramadan(from: NaiveDate, offset_days: i32) -> Result<(NaiveDate, u32)> {
    let today = to_hijri(from, offset_days)?;
    let start = if today.month == RAMADAN {
        from - Duration::days(today.day as i64 - 1)
    } else {
        let mut found = None;
        for ahead in 1..=SEARCH_DAYS {
            let d = from + Duration::days(ahead);
            let h = to_hijri(d, offset_days)?;
            if h.month == RAMADAN && h.day == 1 {
                found = Some(d);
                break;
            }
        }
        found.ok_or_else(|| anyhow!("No Ramadan found within {} days of {}", SEARCH_DAYS, from))?
    };

    // Day 30 either is still Ramadan or already 1 Shawwal.
    let day_30 = start + Duration::days(29);
    let length = if to_hijri(day_30, offset_days)?.month == SHAWWAL { 29 } else { 30 };
    log::debug!("Detected Ramadan starting {} ({} days)", start, length);
    Ok((start, length))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn month_names() {
        assert_eq!(hijri_month_name(9), "Ramadan");
        assert_eq!(hijri_month_name(0), "Unknown");
        assert_eq!(hijri_month_name(13), "Unknown");
    }

    #[test]
    fn detected_start_is_first_of_ramadan() {
        let (start, length) = detect_ramadan(date("2026-01-01"), 0).unwrap();
        let h = to_hijri(start, 0).unwrap();
        assert_eq!((h.month, h.day), (RAMADAN, 1));
        assert!(length == 29 || length == 30);
        assert!(start > date("2026-01-01"));
        let before = to_hijri(start - Duration::days(1), 0).unwrap();
        assert_ne!(before.month, RAMADAN);
    }

    #[test]
    fn detection_inside_ramadan_backs_up_to_day_one() {
        let (start, _) = detect_ramadan(date("2026-01-01"), 0).unwrap();
        let (again, _) = detect_ramadan(start + Duration::days(12), 0).unwrap();
        assert_eq!(again, start);
    }

    #[test]
    fn offset_shifts_the_start() {
        let (start, _) = detect_ramadan(date("2026-01-01"), 0).unwrap();
        let (behind, _) = detect_ramadan(date("2026-01-01"), -1).unwrap();
        assert_eq!(behind, start + Duration::days(1));
    }
}
