//! On-disk configuration
//!
//! One TOML file holds the key/axis bindings, the control points and the loop
//! timing. A missing file is written with the defaults on first start so it can
//! be edited afterwards.

use crate::control::{ControlPointConfig, ControlPoints};
use crate::error::ConfigError;
use crate::input::gamepad::GamepadSettings;
use crate::mapping::{BindingConfig, Translator};
use crate::session::SessionSettings;
use color_eyre::eyre::{eyre, Result};
use egui::Key;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_ENV: &str = "TELEOP_CONFIG";
const CONFIG_DIR: &str = "teleop";
const CONFIG_FILE: &str = "config.toml";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct TeleopConfig {
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub gamepad: GamepadSettings,
    pub control_points: Vec<ControlPointConfig>,
    pub bindings: BindingConfig<Key>,
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            session: SessionSettings::default(),
            gamepad: GamepadSettings::default(),
            control_points: vec![
                ControlPointConfig {
                    axis: "speed".to_string(),
                    step: 50.0,
                    adjust: 10.0,
                    max: 100.0,
                },
                ControlPointConfig {
                    axis: "turn".to_string(),
                    step: 50.0,
                    adjust: 10.0,
                    max: 100.0,
                },
            ],
            bindings: BindingConfig::standard(
                Key::Space,
                Key::Escape,
                (Key::W, Key::S, Key::ArrowUp, Key::ArrowDown),
                (Key::D, Key::A, Key::ArrowRight, Key::ArrowLeft),
            ),
        }
    }
}

impl TeleopConfig {
    /// `$TELEOP_CONFIG` if set, otherwise `<config dir>/teleop/config.toml`
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        path
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| eyre!("Failed to parse config: {}", e))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| eyre!("Failed to serialize config: {}", e))
    }

    /// Reads the config at `path`, writing the defaults there first if it does not exist
    pub async fn load_or_create(path: &Path) -> Result<Self> {
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|e| eyre!("Failed to check config file {}: {}", path.display(), e))?;

        if !exists {
            info!("No config at {}, writing defaults", path.display());
            let config = Self::default();
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| eyre!("Failed to create config directory: {}", e))?;
            }
            tokio::fs::write(path, config.to_toml()?)
                .await
                .map_err(|e| eyre!("Failed to write config file: {}", e))?;
            return Ok(config);
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;
        let config = Self::from_toml(&content)?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn translator(&self) -> Result<Translator<Key>, ConfigError> {
        Translator::new(&self.bindings)
    }

    pub fn control_points(&self) -> Result<ControlPoints, ConfigError> {
        ControlPoints::from_configs(&self.control_points)
    }
}
