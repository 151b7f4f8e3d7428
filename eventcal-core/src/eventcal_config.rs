//! Global eventcal configuration.

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::Deserialize;

use crate::error::{EventCalError, EventCalResult};
use crate::event::ShapePolicy;

static DEFAULT_PRODUCT_ID: &str = "EVENTCAL";

fn default_product_id() -> String {
    DEFAULT_PRODUCT_ID.to_string()
}

/// Global configuration at ~/.config/eventcal/config.toml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EventcalConfig {
    /// PRODID written into generated calendars
    #[serde(default = "default_product_id")]
    pub product_id: String,

    #[serde(default)]
    pub shape_policy: ShapePolicy,

    /// Base directory for relative output paths (`~` is expanded)
    pub output_dir: Option<PathBuf>,
}

impl Default for EventcalConfig {
    fn default() -> Self {
        EventcalConfig {
            product_id: default_product_id(),
            shape_policy: ShapePolicy::default(),
            output_dir: None,
        }
    }
}

impl EventcalConfig {
    pub fn config_path() -> EventCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EventCalError::Config("Could not determine config directory".into()))?
            .join("eventcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default on first run.
    pub fn load() -> EventCalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> EventCalResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| EventCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EventCalError::Config(e.to_string()))
    }

    /// Where to write `output`: absolute paths are kept, relative ones are
    /// placed under `output_dir` when it is set.
    pub fn resolve_output(&self, output: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) if output.is_relative() => {
                let expanded = shellexpand::tilde(&dir.to_string_lossy()).into_owned();
                PathBuf::from(expanded).join(output)
            }
            _ => output.to_path_buf(),
        }
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> EventCalResult<()> {
        let contents = format!(
            "\
# eventcal configuration

# PRODID written into generated calendars:
# product_id = \"{}\"

# How to treat events with keys for more than one shape
# (\"priority\": dates > date_start/date_end > recurrence > date, \"strict\": fail):
# shape_policy = \"priority\"

# Directory for relative output paths:
# output_dir = \"~/calendar\"
",
            DEFAULT_PRODUCT_ID
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EventCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| EventCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
