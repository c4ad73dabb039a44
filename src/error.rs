use thiserror::Error;

/// Problems with the month/session configuration. These are caught when the
/// config is loaded or edited, never inside the scoring path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("month length must be 29 or 30 days, got {0}")]
    InvalidMonthLength(u32),

    #[error("invalid username: {0}")]
    InvalidUsername(&'static str),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task text cannot be empty")]
    EmptyText,

    #[error("no task with id '{0}'")]
    NotFound(String),
}
