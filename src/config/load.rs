use super::{ConfigError, Settings, StatePaths};

// A missing settings file is not an error: the simulation runs on defaults.
pub fn load_settings(paths: &StatePaths) -> Result<Settings, ConfigError> {
    let path = paths.settings_file();
    if !path.exists() {
        return Ok(Settings::default());
    }
    let settings = Settings::from_path(&path)?;
    settings.validate()?;
    Ok(settings)
}
