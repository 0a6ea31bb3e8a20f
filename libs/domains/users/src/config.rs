use core_config::{ConfigError, FromEnv, env_parse_or_default};

/// Minimum age applied when `USER_MIN_AGE` is not set.
pub const DEFAULT_MIN_AGE: u32 = 18;

/// Business rules for the users domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserConfig {
    /// Minimum age in full years a user must have reached
    pub min_age: u32,
}

impl UserConfig {
    pub fn new(min_age: u32) -> Self {
        Self { min_age }
    }
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            min_age: DEFAULT_MIN_AGE,
        }
    }
}

impl FromEnv for UserConfig {
    /// Reads `USER_MIN_AGE` (default 18).
    fn from_env() -> Result<Self, ConfigError> {
        let min_age = env_parse_or_default("USER_MIN_AGE", &DEFAULT_MIN_AGE.to_string())?;
        Ok(Self { min_age })
    }
}
