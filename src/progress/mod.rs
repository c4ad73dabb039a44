pub mod badge;
pub mod scorer;
pub mod summary;
pub mod window;

pub use badge::Badge;
pub use scorer::{breakdown, score_record};
pub use window::{MonthPhase, MonthWindow};
