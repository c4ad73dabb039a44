use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub const ALL: [PrayerName; 5] = [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    /// Fixed slot of this prayer inside a day's prayer list
    pub fn position(&self) -> usize {
        match self {
            PrayerName::Fajr => 0,
            PrayerName::Dhuhr => 1,
            PrayerName::Asr => 2,
            PrayerName::Maghrib => 3,
            PrayerName::Isha => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "fajr",
            PrayerName::Dhuhr => "dhuhr",
            PrayerName::Asr => "asr",
            PrayerName::Maghrib => "maghrib",
            PrayerName::Isha => "isha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if let Some(prayer) = Self::ALL.into_iter().find(|p| p.as_str() == lower) {
            return Ok(prayer);
        }
        match lower.as_str() {
            "zuhr" | "dhuhur" => Ok(PrayerName::Dhuhr),
            _ => Err(anyhow::anyhow!("Unknown prayer: {}", s)),
        }
    }
}
