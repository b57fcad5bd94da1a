//! Configuration management for ircspy.
//!
//! Loads configuration from ${IRCSPY_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::display::Pauses;

/// Display timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Milliseconds between render ticks.
    pub tick_ms: u64,
    /// Extra ticks a scrolling line holds its first window.
    pub start_pause: u16,
    /// Extra ticks a scrolling line holds its last window before wrapping.
    pub end_pause: u16,
}

impl DisplayConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn pauses(&self) -> Pauses {
        Pauses::new(self.start_pause, self.end_pause)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tick_ms: 200,
            start_pause: Pauses::DEFAULT,
            end_pause: Pauses::DEFAULT,
        }
    }
}

/// IRC connection behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IrcConfig {
    /// Seconds to wait before reconnecting after a disconnect.
    pub reconnect_secs: u64,
    /// Real name sent with USER.
    pub realname: String,
}

impl IrcConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_secs)
    }
}

impl Default for IrcConfig {
    fn default() -> Self {
        Self {
            reconnect_secs: 60,
            realname: "IRC Spy".to_string(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub irc: IrcConfig,
}

impl Config {
    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }
}

pub mod paths {
    //! Path resolution for ircspy configuration and logs.
    //!
    //! IRCSPY_HOME resolution order:
    //! 1. IRCSPY_HOME environment variable (if set)
    //! 2. ~/.config/ircspy (default)
    //! 3. ./.ircspy when no home directory is known

    use std::path::PathBuf;

    pub fn ircspy_home() -> PathBuf {
        if let Ok(home) = std::env::var("IRCSPY_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".ircspy"),
            |h| h.join(".config").join("ircspy"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        ircspy_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        ircspy_home().join("logs")
    }
}
