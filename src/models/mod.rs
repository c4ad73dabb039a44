pub mod day;
pub mod prayer;
pub mod stats;

pub use day::DayRecord;
pub use prayer::PrayerName;
pub use stats::{DayHighlight, Period, PeriodReport, PeriodState, RangeSummary, ScoredDay};
