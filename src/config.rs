//! # Configuration Management
//!
//! Centralized configuration for the codec: compression threshold and level,
//! scratch buffer pool sizing, and logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`
//!
//! ## Compression
//! `threshold` follows the protocol's Set Compression packet: a negative value
//! disables compression, any other value is the payload size at which frames
//! start to be deflated. The maximum decompressed packet size is fixed by the
//! protocol and is not configurable.

use crate::error::{ProtocolError, Result};
use crate::utils::buffer_pool::{DEFAULT_BUFFER_CAPACITY, DEFAULT_POOL_SIZE, MAX_POOLED_BUFFER_SIZE};
use crate::utils::compression::{DEFAULT_COMPRESSION_LEVEL, MAX_COMPRESSION_LEVEL, MAX_DATA_LENGTH};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Protocol version the shipped packet catalogue targets (1.16.4/1.16.5)
pub const PROTOCOL_VERSION: i32 = 754;

/// Threshold value that disables compression
pub const COMPRESSION_DISABLED: i32 = -1;

/// Compression threshold vanilla servers announce by default
pub const DEFAULT_COMPRESSION_THRESHOLD: i32 = 256;

/// Main codec configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CodecConfig {
    /// Frame compression settings
    #[serde(default)]
    pub compression: CompressionConfig,

    /// Scratch buffer pool settings
    #[serde(default)]
    pub pool: PoolConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(threshold) = std::env::var("MC_PROTOCOL_COMPRESSION_THRESHOLD") {
            config.compression.threshold = threshold.parse::<i32>().map_err(|e| {
                ProtocolError::ConfigError(format!("Invalid compression threshold: {e}"))
            })?;
        }

        if let Ok(level) = std::env::var("MC_PROTOCOL_COMPRESSION_LEVEL") {
            config.compression.level = level.parse::<u32>().map_err(|e| {
                ProtocolError::ConfigError(format!("Invalid compression level: {e}"))
            })?;
        }

        if let Ok(size) = std::env::var("MC_PROTOCOL_POOL_SIZE") {
            if let Ok(val) = size.parse::<usize>() {
                config.pool.pool_size = val;
            }
        }

        if let Ok(level) = std::env::var("MC_PROTOCOL_LOG_LEVEL") {
            if let Ok(val) = level.parse::<Level>() {
                config.logging.log_level = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.compression.validate());
        errors.extend(self.pool.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Frame compression configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompressionConfig {
    /// Minimum payload size (bytes) that gets compressed; negative disables compression
    pub threshold: i32,

    /// zlib compression level (0-9)
    pub level: u32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            threshold: COMPRESSION_DISABLED,
            level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl CompressionConfig {
    /// Whether frames use the compressed layout
    pub fn is_enabled(&self) -> bool {
        self.threshold >= 0
    }

    /// Validate compression configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.level > MAX_COMPRESSION_LEVEL {
            errors.push(format!(
                "Invalid compression level: {} (valid range: 0-{MAX_COMPRESSION_LEVEL})",
                self.level
            ));
        }

        if self.threshold > MAX_DATA_LENGTH as i32 {
            errors.push(format!(
                "Compression threshold too large: {} (maximum packet size: {MAX_DATA_LENGTH})",
                self.threshold
            ));
        }

        errors
    }
}

/// Scratch buffer pool configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoolConfig {
    /// Number of pre-allocated buffers, also the maximum number kept idle
    pub pool_size: usize,

    /// Initial capacity of each buffer in bytes
    pub buffer_capacity: usize,

    /// Buffers that grew beyond this capacity are freed instead of pooled
    pub max_pooled_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_pooled_capacity: MAX_POOLED_BUFFER_SIZE,
        }
    }
}

impl PoolConfig {
    /// Validate pool configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.pool_size == 0 {
            errors.push("Pool size must be greater than 0".to_string());
        } else if self.pool_size > 10_000 {
            errors.push(format!(
                "Pool size too large: {} (max recommended: 10,000)",
                self.pool_size
            ));
        }

        if self.buffer_capacity > self.max_pooled_capacity {
            errors.push(
                "Buffer capacity cannot be larger than max pooled capacity".to_string(),
            );
        }

        if self.max_pooled_capacity > 2 * MAX_DATA_LENGTH {
            errors.push(format!(
                "Max pooled capacity too large: {} bytes (maximum: {})",
                self.max_pooled_capacity,
                2 * MAX_DATA_LENGTH
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,

    /// Whether to include the event target in log lines
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            json_format: false,
            with_target: true,
        }
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
