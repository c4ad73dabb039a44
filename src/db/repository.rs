use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::db::store::KvStore;
use crate::models::DayRecord;

const DAY_PREFIX: &str = "daily-tasks";

pub fn day_prefix(username: &str) -> String {
    format!("{}:{}:", DAY_PREFIX, username)
}

pub fn day_key(username: &str, date: NaiveDate) -> String {
    format!("{}{}", day_prefix(username), date.format("%Y-%m-%d"))
}

// ─── Day records ─────────────────────────────────────────────────────────────

pub struct DayRepo;

impl DayRepo {
    /// Strict read: `None` when nothing is stored, an error when the store
    /// fails or the stored value does not parse.
    pub fn try_load(store: &dyn KvStore, username: &str, date: NaiveDate) -> Result<Option<DayRecord>> {
        let key = day_key(username, date);
        match store.get(&key)? {
            None => Ok(None),
            Some(raw) => {
                let day = serde_json::from_str(&raw)
                    .with_context(|| format!("Parsing stored record {}", key))?;
                Ok(Some(day))
            }
        }
    }

    /// Read for display. Anything that goes wrong shows up as an untouched day.
    pub fn load(store: &dyn KvStore, username: &str, date: NaiveDate) -> DayRecord {
        match Self::try_load(store, username, date) {
            Ok(day) => day.unwrap_or_default(),
            Err(e) => {
                log::warn!("Treating {} as empty: {:#}", date, e);
                DayRecord::default()
            }
        }
    }

    pub fn load_range(
        store: &dyn KvStore,
        username: &str,
        dates: &[NaiveDate],
    ) -> Vec<(NaiveDate, DayRecord)> {
        dates
            .iter()
            .map(|date| (*date, Self::load(store, username, *date)))
            .collect()
    }

    pub fn save(store: &dyn KvStore, username: &str, date: NaiveDate, day: &DayRecord) -> Result<()> {
        let value = serde_json::to_string(day).context("Serializing day record")?;
        store
            .set(&day_key(username, date), &value)
            .with_context(|| format!("Saving record for {}", date))
    }

    /// Load, apply `edit`, save. Unlike [`DayRepo::load`] this refuses to
    /// overwrite a record it could not read.
    pub fn update<T>(
        store: &dyn KvStore,
        username: &str,
        date: NaiveDate,
        edit: impl FnOnce(&mut DayRecord) -> Result<T>,
    ) -> Result<(T, DayRecord)> {
        let mut day = Self::try_load(store, username, date)?.unwrap_or_default();
        let out = edit(&mut day)?;
        Self::save(store, username, date, &day)?;
        Ok((out, day))
    }

    pub fn clear(store: &dyn KvStore, username: &str, date: NaiveDate) -> Result<bool> {
        store.delete(&day_key(username, date))
    }

    pub fn tracked_dates(store: &dyn KvStore, username: &str) -> Result<Vec<NaiveDate>> {
        let prefix = day_prefix(username);
        let mut dates: Vec<NaiveDate> = store
            .list(&prefix)?
            .iter()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter_map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .collect();
        dates.sort();
        Ok(dates)
    }
}
