use crate::consts;
use crate::engine::{Cell, EngineConfig};
use crate::highscores::HighScores;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, PartialEq)]
pub(crate) struct Config {
    /// Board size & speed settings
    #[serde(default)]
    pub(crate) engine: ValidEngineConfig,

    /// Settings about data files
    #[serde(default)]
    pub(crate) files: FileConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("wormgame").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized or contain invalid values.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    pub(crate) fn engine(&self) -> EngineConfig {
        self.engine.0
    }

    /// Return the path at which highscores should be stored: the file given in
    /// the configuration or, if that is not set, the default highscores path
    pub(crate) fn highscores_file(&self) -> Option<PathBuf> {
        self.files
            .highscores_file
            .clone()
            .or_else(HighScores::default_path)
    }

    /// Return the path to write the log to: the file given in the
    /// configuration or, if that is not set, `wormgame.log` in the local data
    /// directory
    pub(crate) fn log_file(&self) -> Option<PathBuf> {
        self.files.log_file.clone().or_else(|| {
            dirs::data_local_dir().map(|p| p.join("wormgame").join("wormgame.log"))
        })
    }
}

/// Engine settings that have passed validation
#[derive(Clone, Copy, Deserialize, Debug, Default, PartialEq)]
#[serde(try_from = "RawEngineConfig")]
pub(crate) struct ValidEngineConfig(EngineConfig);

#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct RawEngineConfig {
    width: u16,
    height: u16,
    /// In milliseconds
    starting_interval: u64,
    speed_multiplier: f64,
    /// In milliseconds
    min_interval: u64,
    food_cell: Option<Cell>,
}

impl Default for RawEngineConfig {
    fn default() -> RawEngineConfig {
        RawEngineConfig {
            width: consts::BOARD_WIDTH,
            height: consts::BOARD_HEIGHT,
            starting_interval: millis(consts::STARTING_INTERVAL),
            speed_multiplier: consts::SPEED_MULTIPLIER,
            min_interval: millis(consts::MIN_INTERVAL),
            food_cell: None,
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl TryFrom<RawEngineConfig> for ValidEngineConfig {
    type Error = InvalidEngineConfig;

    fn try_from(value: RawEngineConfig) -> Result<ValidEngineConfig, InvalidEngineConfig> {
        if value.width == 0 || value.height == 0 {
            return Err(InvalidEngineConfig::EmptyBoard);
        }
        let m = value.speed_multiplier;
        if m.is_nan() || m <= 0.0 || m >= 1.0 {
            return Err(InvalidEngineConfig::Multiplier(m));
        }
        if value.min_interval == 0 {
            return Err(InvalidEngineConfig::ZeroInterval);
        }
        if value.min_interval > value.starting_interval {
            return Err(InvalidEngineConfig::FloorAboveStart);
        }
        let config = EngineConfig {
            width: value.width,
            height: value.height,
            starting_interval: Duration::from_millis(value.starting_interval),
            speed_multiplier: value.speed_multiplier,
            min_interval: Duration::from_millis(value.min_interval),
            food_cell: value.food_cell,
        };
        if let Some(cell) = value.food_cell.filter(|&c| !config.bounds().contains(c)) {
            return Err(InvalidEngineConfig::FoodCell(cell));
        }
        Ok(ValidEngineConfig(config))
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub(crate) enum InvalidEngineConfig {
    #[error("board width and height must be at least 1")]
    EmptyBoard,
    #[error("speed_multiplier must be between 0 and 1 exclusive, got {0}")]
    Multiplier(f64),
    #[error("min_interval must be at least 1 millisecond")]
    ZeroInterval,
    #[error("min_interval cannot be greater than starting_interval")]
    FloorAboveStart,
    #[error("food_cell {0} is not on the board")]
    FoodCell(Cell),
}

#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct FileConfig {
    /// Path at which highscores should be stored
    highscores_file: Option<PathBuf>,

    /// Path to which the log should be written
    log_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}
