//! Engine settings and their JSON persistence.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{currency::CurrencyCode, errors::ConfigError, forecast::PacePolicy};

const CONFIG_FILE_NAME: &str = "engine.json";
const CONFIG_DIR_NAME: &str = "obligation_core";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_HORIZON_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Currency whose minor units drive result rounding.
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// First day of the week used to place weekday anchors in the current week.
    pub week_start: Weekday,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            week_start: Weekday::Sun,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default)]
    pub pace_policy: PacePolicy,
    #[serde(default = "default_horizon_days")]
    pub default_horizon_days: i64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            pace_policy: PacePolicy::default(),
            default_horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

fn default_horizon_days() -> i64 {
    DEFAULT_HORIZON_DAYS
}

impl EngineConfig {
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Loads and saves [`EngineConfig`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self::new(base.join(CONFIG_FILE_NAME)))
    }

    /// Platform configuration directory, e.g. `~/.config/obligation_core/engine.json`.
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<EngineConfig, ConfigError> {
        if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path)?;
            EngineConfig::from_json(&data)
        } else {
            debug!(
                path = %self.config_path.display(),
                "engine config not found, using defaults"
            );
            Ok(EngineConfig::default())
        }
    }

    pub fn save(&self, config: &EngineConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = config.to_json()?;
        let tmp = tmp_path(&self.config_path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }
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

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
