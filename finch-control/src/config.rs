use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::{Context, eyre};
use crossterm::style::Color;
use finch_program::Parameters;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    /// Starting parameters for every new programming session.
    pub parameters: Parameters,
    pub simulator: SimulatorConfig,
}

/// Console colours, by crossterm colour name (`dark_blue`, `white`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub foreground: String,
    pub background: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            foreground: "dark_blue".into(),
            background: "white".into(),
        }
    }
}

impl Theme {
    pub fn colors(&self) -> Result<(Color, Color)> {
        Ok((parse_color(&self.foreground)?, parse_color(&self.background)?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub ambient_celsius: f64,
    /// Really sleep on `WAIT` instead of only logging it.
    pub realtime: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            ambient_celsius: 22.0,
            realtime: true,
        }
    }
}

pub fn parse_color(name: &str) -> Result<Color> {
    Color::try_from(name).map_err(|_| eyre!("unknown colour {name:?}"))
}

impl Config {
    /// Load the config at `path`, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let config = toml::from_str(&text)
            .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).wrap_err_with(|| format!("failed to write {}", path.display()))?;
        debug!("saved config to {}", path.display());
        Ok(())
    }
}

pub fn default_path() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre!("failed to locate config dir"))?;
    Ok(base.join("finch-control").join("config.toml"))
}
