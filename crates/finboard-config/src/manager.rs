use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{Config, ConfigError};

/// Overrides the application directory (default `~/.finboard`).
pub const HOME_ENV: &str = "FINBOARD_HOME";
/// Overrides `store.endpoint_url`.
pub const STORE_URL_ENV: &str = "FINBOARD_STORE_URL";
/// Overrides `store.api_key`.
pub const STORE_KEY_ENV: &str = "FINBOARD_STORE_KEY";

const APP_DIR_NAME: &str = ".finboard";
const TMP_SUFFIX: &str = "tmp";

/// Handles persistence of [`Config`] and layering of environment overrides.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let config_dir = base.join("config");
        fs::create_dir_all(&config_dir)?;
        Ok(Self::new(config_dir.join("config.json")))
    }

    /// Manager rooted at `$FINBOARD_HOME`, else `~/.finboard`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_base_dir(resolve_app_dir(env::var(HOME_ENV).ok()))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    /// [`ConfigManager::load`] with process environment overrides applied.
    pub fn load_with_env(&self) -> Result<Config, ConfigError> {
        let mut config = self.load()?;
        apply_overrides(&mut config, |key| env::var(key).ok());
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.config_path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }
}

/// Applies endpoint/credential overrides from `lookup`. Blank values are ignored.
pub fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
    if let Some(url) = non_blank(STORE_URL_ENV) {
        config.store.endpoint_url = Some(url);
    }
    if let Some(key) = non_blank(STORE_KEY_ENV) {
        config.store.api_key = Some(key);
    }
}

fn resolve_app_dir(home_override: Option<String>) -> PathBuf {
    if let Some(path) = home_override.filter(|value| !value.trim().is_empty()) {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to `path`, creating parent directories.
pub fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
