use super::ConfigError;
use crate::domain::{WorkerState, MAX_EFFICIENCY, MIN_EFFICIENCY};
use crate::shared::ids::validate_identifier_value;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const MIN_SPEED: u32 = 1;
pub const MAX_SPEED: u32 = 10;

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_speed() -> u32 {
    MIN_SPEED
}

fn default_thinking_delay_ms() -> u64 {
    600
}

fn default_upload_delay_ms() -> u64 {
    500
}

fn default_workers() -> Vec<WorkerSettings> {
    crate::domain::default_roster()
        .into_iter()
        .map(|worker| WorkerSettings {
            id: worker.id,
            name: worker.name,
            efficiency: worker.efficiency,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WorkerSettings {
    pub id: String,
    pub name: String,
    pub efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_speed")]
    pub speed: u32,
    #[serde(default = "default_thinking_delay_ms")]
    pub thinking_delay_ms: u64,
    #[serde(default = "default_upload_delay_ms")]
    pub upload_delay_ms: u64,
    #[serde(default = "default_workers")]
    pub workers: Vec<WorkerSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            speed: default_speed(),
            thinking_delay_ms: default_thinking_delay_ms(),
            upload_delay_ms: default_upload_delay_ms(),
            workers: default_workers(),
        }
    }
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "tick_interval_ms",
                "must be greater than zero",
            ));
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.speed) {
            return Err(ConfigError::invalid(
                "speed",
                format!("must be between {MIN_SPEED} and {MAX_SPEED}"),
            ));
        }
        if self.workers.is_empty() {
            return Err(ConfigError::invalid(
                "workers",
                "at least one worker is required",
            ));
        }

        let mut seen = HashSet::new();
        for worker in &self.workers {
            validate_identifier_value("worker id", &worker.id)
                .map_err(|reason| ConfigError::invalid("workers.id", reason))?;
            if !seen.insert(worker.id.as_str()) {
                return Err(ConfigError::invalid(
                    "workers.id",
                    format!("duplicate worker id `{}`", worker.id),
                ));
            }
            if worker.name.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "workers.name",
                    format!("worker `{}` needs a display name", worker.id),
                ));
            }
            if !(MIN_EFFICIENCY..=MAX_EFFICIENCY).contains(&worker.efficiency) {
                return Err(ConfigError::invalid(
                    "workers.efficiency",
                    format!(
                        "worker `{}` efficiency {} is outside {MIN_EFFICIENCY}..={MAX_EFFICIENCY}",
                        worker.id, worker.efficiency
                    ),
                ));
            }
        }
        Ok(())
    }

    pub fn roster(&self) -> Vec<WorkerState> {
        self.workers
            .iter()
            .map(|worker| WorkerState::new(&worker.id, &worker.name, worker.efficiency))
            .collect()
    }

    pub fn base_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }

    pub fn upload_delay(&self) -> Duration {
        Duration::from_millis(self.upload_delay_ms)
    }
}
