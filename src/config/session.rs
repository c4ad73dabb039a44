use crate::error::ConfigError;

/// Who is using the app on this device. Passed explicitly to anything that
/// reads or writes user data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub device_id: String,
}

impl Session {
    pub fn new(username: &str, device_id: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            username: validate_username(username)?,
            device_id: device_id.to_string(),
        })
    }
}

/// Normalise (trim, lowercase) and check a username.
pub fn validate_username(raw: &str) -> Result<String, ConfigError> {
    let name = raw.trim().to_lowercase();
    if name.is_empty() {
        return Err(ConfigError::InvalidUsername("username cannot be empty"));
    }
    if name.chars().count() < 3 {
        return Err(ConfigError::InvalidUsername("must be at least 3 characters"));
    }
    if name.chars().count() > 20 {
        return Err(ConfigError::InvalidUsername("must be at most 20 characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(ConfigError::InvalidUsername(
            "only letters, numbers, hyphens and underscores are allowed",
        ));
    }
    Ok(name)
}
