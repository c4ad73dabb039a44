use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::session::{validate_username, Session};
use crate::error::ConfigError;
use crate::progress::MonthWindow;

const CONFIG_ENV: &str = "RAMADAN_CONFIG";
const DB_ENV: &str = "RAMADAN_DB";

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 18).unwrap_or_default()
}
fn default_length() -> u32 {
    30
}
fn default_hijri_offset() -> i32 {
    0
}
fn default_username() -> String {
    "guest".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthConfig {
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    /// 29 or 30
    #[serde(default = "default_length")]
    pub length: u32,
    /// Days to add/subtract from Hijri date for local moon sighting.
    /// 0 = default (Saudi), -1 = one day behind, +1 = one day ahead
    #[serde(default = "default_hijri_offset")]
    pub hijri_offset: i32,
}

impl Default for MonthConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            length: default_length(),
            hijri_offset: default_hijri_offset(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default)]
    pub device_id: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            device_id: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub month: MonthConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "ramadan")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(DB_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(Self::data_dir()?.join("ramadan.db"))
    }

    pub fn exists() -> Result<bool> {
        Ok(Self::config_path()?.exists())
    }

    /// Reads the stored config without validating it, so `setup` can repair
    /// a file whose values are out of range.
    pub fn read() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("Reading {:?}", path))?;
        Self::parse_toml(&content)
    }

    pub fn load() -> Result<Self> {
        let config = Self::read()?;
        config
            .validate()
            .context("Invalid config, run `ramadan setup` to fix it")?;
        Ok(config)
    }

    pub fn parse_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Parsing config.toml")
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config = Self::parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(&path, content).with_context(|| format!("Writing {:?}", path))?;
        log::info!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn ensure_db_dir() -> Result<PathBuf> {
        let path = Self::db_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.month_window()?;
        validate_username(&self.session.username)?;
        Ok(())
    }

    pub fn month_window(&self) -> Result<MonthWindow, ConfigError> {
        MonthWindow::new(self.month.start_date, self.month.length)
    }

    /// The current user, assigning a device id the first time one is needed.
    pub fn session(&mut self) -> Result<Session, ConfigError> {
        if self.session.device_id.is_empty() {
            self.session.device_id = new_device_id();
        }
        Session::new(&self.session.username, &self.session.device_id)
    }
}

fn new_device_id() -> String {
    let now = Utc::now();
    format!(
        "dev-{:x}{:05x}",
        now.timestamp_millis(),
        now.timestamp_subsec_nanos() % 0x100000
    )
}

pub fn parse_date(s: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| ConfigError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.month.start_date, NaiveDate::from_ymd_opt(2026, 2, 18).unwrap());
        assert_eq!(config.month.length, 30);
        assert_eq!(config.session.username, "guest");
    }

    #[test]
    fn reads_month_and_session() {
        let config = AppConfig::from_toml(
            r#"
            [month]
            start_date = "2025-03-01"
            length = 29
            hijri_offset = -1

            [session]
            username = "amina"
            device_id = "dev-1"
            "#,
        )
        .unwrap();
        let month = config.month_window().unwrap();
        assert_eq!(month.length(), 29);
        assert_eq!(month.start(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(config.month.hijri_offset, -1);
        assert_eq!(config.session.username, "amina");
    }

    #[test]
    fn rejects_bad_month_length() {
        let err = AppConfig::from_toml("[month]\nlength = 28\n").unwrap_err();
        assert!(format!("{:#}", err).contains("29 or 30"));
    }

    #[test]
    fn unchecked_parse_keeps_out_of_range_values() {
        let text = "[month]\nlength = 31\n";
        let config = AppConfig::parse_toml(text).unwrap();
        assert_eq!(config.month.length, 31);
        assert_eq!(config.validate(), Err(ConfigError::InvalidMonthLength(31)));
        assert!(AppConfig::from_toml(text).is_err());
    }

    #[test]
    fn rejects_bad_username() {
        assert!(AppConfig::from_toml("[session]\nusername = \"a b\"\n").is_err());
    }

    #[test]
    fn session_gets_stable_device_id() {
        let mut config = AppConfig::default();
        let first = config.session().unwrap();
        assert!(first.device_id.starts_with("dev-"));
        let second = config.session().unwrap();
        assert_eq!(first.device_id, second.device_id);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = AppConfig::default();
        config.session.username = "bilal".into();
        config.month.length = 29;
        let text = toml::to_string_pretty(&config).unwrap();
        let back = AppConfig::from_toml(&text).unwrap();
        assert_eq!(back.session.username, "bilal");
        assert_eq!(back.month.length, 29);
    }

    #[test]
    fn parses_dates() {
        assert_eq!(parse_date(" 2026-02-18 ").unwrap(), NaiveDate::from_ymd_opt(2026, 2, 18).unwrap());
        assert_eq!(parse_date("18/02/2026"), Err(ConfigError::InvalidDate("18/02/2026".into())));
    }
}
