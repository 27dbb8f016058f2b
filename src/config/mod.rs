pub mod error;
pub mod load;
pub mod paths;
pub mod save;
pub mod settings;

pub use error::ConfigError;
pub use load::load_settings;
pub use paths::{
    bootstrap_state_root, default_state_root_path, StatePaths, DEFAULT_STATE_ROOT_DIR,
    SETTINGS_FILE_NAME,
};
pub use save::save_settings;
pub use settings::{Settings, WorkerSettings, MAX_SPEED, MIN_SPEED};
