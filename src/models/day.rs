use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TaskError;
use crate::models::PrayerName;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerEntry {
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTask {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: String,
}

fn default_prayers() -> Vec<PrayerEntry> {
    PrayerName::ALL
        .iter()
        .map(|p| PrayerEntry {
            name: p.display_name().to_string(),
            completed: false,
        })
        .collect()
}

/// Everything recorded for one user on one calendar date.
///
/// A date with nothing stored is the same as `DayRecord::default()`; any field
/// missing from a stored value falls back to its zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    #[serde(default = "default_prayers")]
    pub prayers: Vec<PrayerEntry>,
    #[serde(default)]
    pub quran_pages: i64,
    #[serde(default)]
    pub morning_dhikr: bool,
    #[serde(default)]
    pub evening_dhikr: bool,
    #[serde(default)]
    pub custom_tasks: Vec<CustomTask>,
}

impl Default for DayRecord {
    fn default() -> Self {
        Self {
            prayers: default_prayers(),
            quran_pages: 0,
            morning_dhikr: false,
            evening_dhikr: false,
            custom_tasks: vec![],
        }
    }
}

impl DayRecord {
    pub fn prayers_completed(&self) -> u8 {
        self.prayers.iter().filter(|p| p.completed).count().min(5) as u8
    }

    pub fn is_prayer_done(&self, prayer: PrayerName) -> bool {
        self.prayers
            .get(prayer.position())
            .map(|p| p.completed)
            .unwrap_or(false)
    }

    pub fn tasks_completed(&self) -> usize {
        self.custom_tasks.iter().filter(|t| t.completed).count()
    }

    pub fn is_untouched(&self) -> bool {
        *self == DayRecord::default()
    }

    /// Rebuild the prayer list into the five fixed slots, keeping the
    /// completion flag of every entry whose name is recognised.
    fn normalize_prayers(&mut self) {
        if self.prayers.len() == 5
            && self
                .prayers
                .iter()
                .zip(PrayerName::ALL.iter())
                .all(|(entry, name)| entry.name == name.display_name())
        {
            return;
        }
        let mut slots = default_prayers();
        for entry in &self.prayers {
            if let Ok(name) = PrayerName::from_str(&entry.name) {
                slots[name.position()].completed |= entry.completed;
            }
        }
        self.prayers = slots;
    }

    /// Flip a prayer and return its new state.
    pub fn toggle_prayer(&mut self, prayer: PrayerName) -> bool {
        self.normalize_prayers();
        let slot = &mut self.prayers[prayer.position()];
        slot.completed = !slot.completed;
        slot.completed
    }

    pub fn toggle_morning(&mut self) -> bool {
        self.morning_dhikr = !self.morning_dhikr;
        self.morning_dhikr
    }

    pub fn toggle_evening(&mut self) -> bool {
        self.evening_dhikr = !self.evening_dhikr;
        self.evening_dhikr
    }

    /// Add (or with a negative delta, remove) pages. Never goes below zero.
    pub fn add_pages(&mut self, delta: i64) -> i64 {
        self.quran_pages = self.quran_pages.max(0).saturating_add(delta).max(0);
        self.quran_pages
    }

    pub fn add_task(&mut self, text: &str, now: DateTime<Utc>) -> Result<&CustomTask, TaskError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskError::EmptyText);
        }

        // Ids are creation timestamps in millis; bump on collision.
        let mut stamp = now.timestamp_millis();
        while self.custom_tasks.iter().any(|t| t.id == stamp.to_string()) {
            stamp += 1;
        }

        self.custom_tasks.push(CustomTask {
            id: stamp.to_string(),
            text: text.to_string(),
            completed: false,
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        Ok(&self.custom_tasks[self.custom_tasks.len() - 1])
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<bool, TaskError> {
        let task = self
            .custom_tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    pub fn remove_task(&mut self, id: &str) -> Result<CustomTask, TaskError> {
        let idx = self
            .custom_tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        Ok(self.custom_tasks.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn default_is_zero_day() {
        let day = DayRecord::default();
        assert_eq!(day.prayers.len(), 5);
        assert_eq!(day.prayers[1].name, "Dhuhr");
        assert_eq!(day.prayers_completed(), 0);
        assert_eq!(day.quran_pages, 0);
        assert!(!day.morning_dhikr && !day.evening_dhikr);
        assert!(day.custom_tasks.is_empty());
        assert!(day.is_untouched());
    }

    #[test]
    fn empty_json_object_loads_as_zero_day() {
        let day: DayRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(day, DayRecord::default());
    }

    #[test]
    fn reads_stored_camel_case_shape() {
        let raw = r#"{
            "prayers": [
                {"name": "Fajr", "completed": true},
                {"name": "Dhuhr", "completed": false},
                {"name": "Asr", "completed": true},
                {"name": "Maghrib", "completed": true},
                {"name": "Isha", "completed": false}
            ],
            "quranPages": 3,
            "morningDhikr": true,
            "customTasks": [
                {"id": "1739854800000", "text": "Call mum", "completed": true,
                 "createdAt": "2026-02-18T05:00:00.000Z"}
            ]
        }"#;
        let day: DayRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(day.prayers_completed(), 3);
        assert_eq!(day.quran_pages, 3);
        assert!(day.morning_dhikr);
        assert!(!day.evening_dhikr);
        assert_eq!(day.tasks_completed(), 1);

        let back = serde_json::to_value(&day).unwrap();
        assert_eq!(back["quranPages"], 3);
        assert_eq!(back["customTasks"][0]["createdAt"], "2026-02-18T05:00:00.000Z");
    }

    #[test]
    fn toggle_prayer_repairs_short_lists() {
        let mut day = DayRecord {
            prayers: vec![PrayerEntry {
                name: "Isha".into(),
                completed: true,
            }],
            ..DayRecord::default()
        };
        assert!(day.toggle_prayer(PrayerName::Fajr));
        assert_eq!(day.prayers.len(), 5);
        assert!(day.is_prayer_done(PrayerName::Isha));
        assert!(day.is_prayer_done(PrayerName::Fajr));
        assert!(!day.toggle_prayer(PrayerName::Fajr));
    }

    #[test]
    fn pages_floor_at_zero() {
        let mut day = DayRecord::default();
        assert_eq!(day.add_pages(3), 3);
        assert_eq!(day.add_pages(-5), 0);
        day.quran_pages = -2;
        assert_eq!(day.add_pages(1), 1);
    }

    #[test]
    fn task_lifecycle() {
        let mut day = DayRecord::default();
        assert_eq!(day.add_task("   ", at(0)), Err(TaskError::EmptyText));

        let first = day.add_task("  Give sadaqah ", at(1_000)).unwrap().id.clone();
        let second = day.add_task("Visit family", at(1_000)).unwrap().id.clone();
        assert_ne!(first, second);
        assert_eq!(day.custom_tasks[0].text, "Give sadaqah");

        assert_eq!(day.toggle_task(&second), Ok(true));
        assert_eq!(day.tasks_completed(), 1);
        assert_eq!(
            day.toggle_task("nope"),
            Err(TaskError::NotFound("nope".into()))
        );

        let removed = day.remove_task(&first).unwrap();
        assert_eq!(removed.text, "Give sadaqah");
        assert_eq!(day.custom_tasks.len(), 1);
    }
}
