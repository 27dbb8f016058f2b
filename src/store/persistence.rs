use crate::config::StatePaths;
use crate::domain::AppState;
use crate::shared::errors::StoreError;
use crate::shared::fs_atomic::atomic_write_file;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

pub const STORAGE_KEY: &str = "hc_v1_1_state";

/// A durable key-value slot holding one serialized `AppState` blob.
pub trait SnapshotSlot: Send {
    fn key(&self) -> &str;
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn save(&mut self, blob: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct FileSlot {
    key: String,
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
        }
    }

    pub fn in_state_root(paths: &StatePaths) -> Self {
        Self::new(paths.snapshot_path(STORAGE_KEY), STORAGE_KEY)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSlot for FileSlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                key: self.key.clone(),
                path: self.path.display().to_string(),
                source,
            }),
        }
    }

    fn save(&mut self, blob: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }
        atomic_write_file(&self.path, blob.as_bytes()).map_err(|source| StoreError::Write {
            key: self.key.clone(),
            path: self.path.display().to_string(),
            source,
        })
    }
}

/// In-process slot; clones share the same contents.
#[derive(Debug, Clone)]
pub struct MemorySlot {
    key: String,
    contents: Arc<Mutex<Option<String>>>,
}

impl Default for MemorySlot {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySlot {
    pub fn new() -> Self {
        Self {
            key: STORAGE_KEY.to_string(),
            contents: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_contents(raw: impl Into<String>) -> Self {
        let slot = Self::new();
        *slot.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw.into());
        slot
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SnapshotSlot for MemorySlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.contents())
    }

    fn save(&mut self, blob: &str) -> Result<(), StoreError> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(blob.to_string());
        Ok(())
    }
}

pub fn encode_snapshot(key: &str, state: &AppState) -> Result<String, StoreError> {
    serde_json::to_string(state).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })
}

/// Shallow-merges a persisted blob onto `defaults`: every top-level key present
/// in the blob replaces the default wholesale, absent keys keep their defaults.
pub fn merge_snapshot(key: &str, defaults: &AppState, raw: &str) -> Result<AppState, StoreError> {
    let parse_error = |source: serde_json::Error| StoreError::Parse {
        key: key.to_string(),
        source,
    };
    let persisted: Value = serde_json::from_str(raw).map_err(parse_error)?;
    let Value::Object(persisted) = persisted else {
        return Err(parse_error(serde::de::Error::custom(
            "snapshot root must be a JSON object",
        )));
    };
    let mut merged = serde_json::to_value(defaults).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    if let Value::Object(base) = &mut merged {
        for (field, value) in persisted {
            base.insert(field, value);
        }
    }
    serde_json::from_value(merged).map_err(parse_error)
}

pub fn load_or_default(slot: &dyn SnapshotSlot, defaults: &AppState) -> AppState {
    let raw = match slot.load() {
        Ok(Some(raw)) => raw,
        Ok(None) => return defaults.clone(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to load state snapshot; starting from defaults");
            return defaults.clone();
        }
    };
    match merge_snapshot(slot.key(), defaults, &raw) {
        Ok(state) => state,
        Err(err) => {
            tracing::warn!(error = %err, "discarding unreadable state snapshot; starting from defaults");
            defaults.clone()
        }
    }
}
