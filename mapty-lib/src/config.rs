//src/config.rs
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

use crate::map::{Coords, TileLayer, DEFAULT_ZOOM_LEVEL, MAX_ZOOM_LEVEL};

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_CONFIG_DIR: &str = "mapty";
const CONFIG_ENV_VAR: &str = "MAPTY_CONFIG_DIR"; // Environment variable name

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not determine configuration directory.")]
    CannotDetermineConfigDir,
    #[error("I/O error accessing config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file (TOML): {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize config data (TOML): {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Invalid color name: {0}")]
    InvalidColor(String),
    #[error("Zoom level must be between 0 and 18, got {0}.")]
    InvalidZoom(u8),
    #[error("Home location {0} is out of range.")]
    InvalidHome(Coords),
}

// Define standard colors using strum for easy iteration/parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum StandardColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    DarkGrey,
    DarkRed,
    DarkGreen,
    DarkYellow,
    DarkBlue,
    DarkMagenta,
    DarkCyan,
    Grey,
}

// Helper to parse a string into our StandardColor enum
pub fn parse_color(color_str: &str) -> Result<StandardColor, Error> {
    StandardColor::iter()
        .find(|color| format!("{color:?}").eq_ignore_ascii_case(color_str.trim()))
        .ok_or_else(|| Error::InvalidColor(color_str.to_string()))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)] // Ensure defaults are used if fields are missing
pub struct Theme {
    pub header_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_color: "Green".to_string(),
        }
    }
}

/// Position reported as the user's location.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct HomeLocation {
    pub lat: f64,
    pub lng: f64,
}

impl From<HomeLocation> for Coords {
    fn from(home: HomeLocation) -> Self {
        Self::new(home.lat, home.lng)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub zoom_level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<HomeLocation>,
    pub tiles: TileLayer,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zoom_level: DEFAULT_ZOOM_LEVEL,
            home: None,
            tiles: TileLayer::default(),
            theme: Theme::default(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn home_coords(&self) -> Option<Coords> {
        self.home.map(Coords::from)
    }

    /// Checks values the TOML types alone cannot constrain.
    pub fn validate(&self) -> Result<(), Error> {
        if self.zoom_level > MAX_ZOOM_LEVEL {
            return Err(Error::InvalidZoom(self.zoom_level));
        }
        if let Some(home) = self.home_coords() {
            if !home.is_valid() {
                return Err(Error::InvalidHome(home));
            }
        }
        parse_color(&self.theme.header_color)?;
        Ok(())
    }
}

/// Determines the path to the configuration file.
pub fn get_config_path() -> Result<PathBuf, Error> {
    let config_dir_path = match std::env::var(CONFIG_ENV_VAR).ok() {
        Some(path_str) => PathBuf::from(path_str),
        None => dirs::config_dir()
            .ok_or(Error::CannotDetermineConfigDir)?
            .join(APP_CONFIG_DIR),
    };

    if !config_dir_path.exists() {
        fs::create_dir_all(&config_dir_path)?;
    }

    Ok(config_dir_path.join(CONFIG_FILE_NAME))
}

/// Loads the configuration, writing the defaults first if the file is missing.
pub fn load(config_path: &Path) -> Result<Config, Error> {
    if !config_path.exists() {
        let default_config = Config::default();
        save(config_path, &default_config)?;
        return Ok(default_config);
    }
    let config_content = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&config_content)?;
    config.validate()?;
    Ok(config)
}

/// Saves the configuration to the TOML file.
pub fn save(config_path: &Path, config: &Config) -> Result<(), Error> {
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }
    let config_content = toml::to_string_pretty(config)?;
    fs::write(config_path, config_content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let config = load(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
        assert_eq!(load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[home]\nlat = 51.5\nlng = -0.1\n").unwrap();
        let config = load(&path).unwrap();
        assert_eq!(config.zoom_level, DEFAULT_ZOOM_LEVEL);
        assert_eq!(config.home_coords(), Some(Coords::new(51.5, -0.1)));
        assert_eq!(config.tiles, TileLayer::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "zoom_level = 40\n").unwrap();
        assert!(matches!(load(&path), Err(Error::InvalidZoom(40))));

        fs::write(&path, "[theme]\nheader_color = \"Mauve\"\n").unwrap();
        assert!(matches!(load(&path), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn parse_color_ignores_case() {
        assert_eq!(parse_color("darkblue").unwrap(), StandardColor::DarkBlue);
        assert!(parse_color("mauve").is_err());
    }
}
