use crate::shared::time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_AUTONOMY_LEVEL: u8 = 1;
pub const MAX_AUTONOMY_LEVEL: u8 = 5;
pub const DEFAULT_PROFILE_NAME: &str = "Standard Profile";

// Autonomy level and the confirmation flag are carried but do not gate worker behavior yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    pub profile_name: String,
    pub autonomy_level: u8,
    pub require_confirmation_for_critical: bool,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    pub profile_name: String,
    pub autonomy_level: u8,
    pub require_confirmation_for_critical: bool,
}

impl Default for ProfileDraft {
    fn default() -> Self {
        Self {
            profile_name: DEFAULT_PROFILE_NAME.to_string(),
            autonomy_level: MIN_AUTONOMY_LEVEL,
            require_confirmation_for_critical: true,
        }
    }
}

impl ProfileDraft {
    pub fn validate(&self) -> Result<(), String> {
        if self.profile_name.trim().is_empty() {
            return Err("profile name must be non-empty".to_string());
        }
        if !(MIN_AUTONOMY_LEVEL..=MAX_AUTONOMY_LEVEL).contains(&self.autonomy_level) {
            return Err(format!(
                "autonomy level must be between {MIN_AUTONOMY_LEVEL} and {MAX_AUTONOMY_LEVEL}, got {}",
                self.autonomy_level
            ));
        }
        Ok(())
    }

    pub fn build(self) -> Result<SystemConfig, String> {
        self.validate()?;
        Ok(SystemConfig {
            profile_name: self.profile_name.trim().to_string(),
            autonomy_level: self.autonomy_level,
            require_confirmation_for_critical: self.require_confirmation_for_critical,
            generated_at: Some(time::now()),
        })
    }
}
