use crate::error::Result;
use crate::level::Level;
use crate::suffix::SuffixFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "rotalog.toml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub output: OutputConfig,
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub path_prefix: PathBuf, // Live log file; rotated files get ".<suffix>" appended
    pub suffix: SuffixFormat, // "day", "hour", "minute", "second" or a strftime pattern
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InputConfig {
    pub level: Level,           // Level stamped on lines read from stdin
    pub skip_empty_lines: bool, // Drop blank stdin lines instead of logging them
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            skip_empty_lines: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputConfig {
                path_prefix: PathBuf::from("logs/rotalog"),
                suffix: SuffixFormat::Day,
            },
            input: InputConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Loads the config file at `path`.
    /// If it doesn't exist, writes the defaults there and uses them.
    pub fn load(path: &Path) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match Self::from_toml_str(&content) {
                Ok(config) => return config,
                Err(e) => {
                    warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    return Config::default();
                }
            }
        }

        let default_config = Config::default();

        // Save default config to disk for the user to edit later
        let written = match default_config.to_toml_string() {
            Ok(toml_string) => fs::write(path, &toml_string).is_ok(),
            Err(_) => false,
        };
        if !written {
            warn!("Could not write default {} to disk.", path.display());
        }

        info!("Loaded default configuration.");
        default_config
    }
}
