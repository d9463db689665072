//! Configuration structures for the uptime node.
//!
//! Supports TOML deserialization with defaults matching a 16-bit
//! 32.768 kHz real-time timer and a 64-byte response chunk.

use crate::error::UptimeError;
use crate::time::{TimeSourceMode, TimerSettings};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level node configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Tick timer and accumulator settings.
    pub timer: TimerConfig,

    /// Uptime resource settings.
    pub resource: ResourceConfig,

    /// HTTP binding settings.
    pub web: WebConfig,
}

/// Tick timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Count uptime from the tick timer. When false the coarse
    /// seconds-since-boot clock is used and no sampling task runs.
    pub enabled: bool,

    /// Timer resolution.
    pub ticks_per_second: u32,

    /// Largest raw register value before the timer wraps to zero.
    pub tick_max: u32,

    /// Pause between accumulator iterations. Zero yields to the
    /// scheduler without sleeping.
    #[serde(with = "humantime_serde")]
    pub sample_period: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ticks_per_second: 32_768,
            tick_max: u32::from(u16::MAX),
            sample_period: Duration::from_millis(10),
        }
    }
}

impl TimerConfig {
    /// Time source selected by this configuration.
    #[must_use]
    pub fn mode(&self) -> TimeSourceMode {
        TimeSourceMode::from_tick_flag(self.enabled)
    }

    /// Validated timer domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolution or width is zero, or if the
    /// sample period would let the register wrap more than once between
    /// samples.
    pub fn settings(&self) -> Result<TimerSettings, UptimeError> {
        let settings = TimerSettings::new(self.ticks_per_second, self.tick_max)?;
        settings.check_sample_period(self.sample_period)?;
        Ok(settings)
    }
}

/// Uptime resource configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Path the resource is registered under (no leading slash).
    pub path: String,

    /// Capacity of the working buffer handed to the resource handler.
    pub chunk_size: usize,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            path: String::from("system/uptime"),
            chunk_size: 64,
        }
    }
}

/// HTTP binding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Address to bind the server to.
    pub bind_addr: SocketAddr,

    /// Enable permissive CORS.
    pub enable_cors: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            enable_cors: false,
        }
    }
}

impl NodeConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or the timer settings are
    /// unusable.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Check settings that cannot be expressed through types alone.
    ///
    /// The timer section is only checked when tick counting is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unusable timer settings and
    /// [`ConfigError::EmptyChunk`] for a zero-capacity working buffer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer.enabled {
            self.timer.settings()?;
        }
        if self.resource.chunk_size == 0 {
            return Err(ConfigError::EmptyChunk);
        }
        Ok(())
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Timer settings the accumulator cannot work with.
    #[error("invalid timer settings: {0}")]
    Invalid(#[from] UptimeError),

    /// Zero-capacity response buffer.
    #[error("resource chunk_size must be non-zero")]
    EmptyChunk,
}

/// Serde helper module for `Duration` using humantime format.
mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
