use serde::Serialize;

/// Recognition tier shown next to an average score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Badge {
    Champion,
    Star,
    Achiever,
    Growing,
    RamadanChampion,
    StarAchiever,
    DedicatedWorshipper,
    StrongEffort,
    GrowingSoul,
}

impl Badge {
    /// Tier for a rolling window (10-day or weekly view).
    pub fn for_period(avg_progress: u8) -> Self {
        match avg_progress {
            90..=u8::MAX => Badge::Champion,
            70..=89 => Badge::Star,
            50..=69 => Badge::Achiever,
            _ => Badge::Growing,
        }
    }

    /// Tier for the whole month, graded a little more finely.
    pub fn for_month(avg_progress: u8) -> Self {
        match avg_progress {
            90..=u8::MAX => Badge::RamadanChampion,
            75..=89 => Badge::StarAchiever,
            60..=74 => Badge::DedicatedWorshipper,
            40..=59 => Badge::StrongEffort,
            _ => Badge::GrowingSoul,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Badge::Champion => "Champion",
            Badge::Star => "Star",
            Badge::Achiever => "Achiever",
            Badge::Growing => "Growing",
            Badge::RamadanChampion => "Ramadan Champion",
            Badge::StarAchiever => "Star Achiever",
            Badge::DedicatedWorshipper => "Dedicated Worshipper",
            Badge::StrongEffort => "Strong Effort",
            Badge::GrowingSoul => "Growing Soul",
        }
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_tiers() {
        assert_eq!(Badge::for_period(90), Badge::Champion);
        assert_eq!(Badge::for_period(89), Badge::Star);
        assert_eq!(Badge::for_period(50), Badge::Achiever);
        assert_eq!(Badge::for_period(49), Badge::Growing);
    }

    #[test]
    fn month_tiers() {
        assert_eq!(Badge::for_month(100), Badge::RamadanChampion);
        assert_eq!(Badge::for_month(75), Badge::StarAchiever);
        assert_eq!(Badge::for_month(74), Badge::DedicatedWorshipper);
        assert_eq!(Badge::for_month(40), Badge::StrongEffort);
        assert_eq!(Badge::for_month(0).title(), "Growing Soul");
    }
}
