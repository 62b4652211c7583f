//! Tunable limits for the ordering engine.
//!
//! Configuration resolves with the following priority (highest first):
//! 1. Values present in a TOML file (`[ordering]` and `[stats]` tables)
//! 2. Compiled defaults

use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::task::domain::{OrderGap, OrderKey};

/// Errors that can occur when loading ordering configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The configured order gap is not positive.
    #[error("order gap must be positive, got {0}")]
    InvalidOrderGap(i64),

    /// The configured statistics offset is not a `±HH:MM` UTC offset.
    #[error("invalid stats utc_offset {0:?}")]
    InvalidUtcOffset(String),
}

/// Top-level TOML config file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrderingConfigFile {
    ordering: OrderingFileSection,
    stats: StatsFileSection,
}

/// `[ordering]` section of the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrderingFileSection {
    order_gap: Option<i64>,
    baseline_key: Option<i64>,
    list_limit: Option<usize>,
    subscription_limit: Option<usize>,
}

/// `[stats]` section of the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatsFileSection {
    limit: Option<usize>,
    utc_offset: Option<String>,
}

/// Fully resolved engine configuration.
///
/// # Examples
///
/// ```
/// use todo_diaries::task::config::OrderingConfig;
///
/// let config = OrderingConfig::from_toml_str("[ordering]\norder_gap = 10\n")
///     .expect("valid config");
/// assert_eq!(config.order_gap.value(), 10);
/// assert_eq!(config.list_limit, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderingConfig {
    /// Distance between keys allocated at the same edge.
    pub order_gap: OrderGap,
    /// Key handed out in an empty partition.
    pub baseline_key: OrderKey,
    /// Default number of tasks returned by a list read.
    pub list_limit: usize,
    /// Number of tasks delivered per subscription snapshot.
    pub subscription_limit: usize,
    /// Maximum achieved tasks read for one monthly tally.
    pub stats_limit: usize,
    /// Calendar offset used to draw month and day boundaries in tallies.
    pub stats_utc_offset: FixedOffset,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            order_gap: OrderGap::DEFAULT,
            baseline_key: OrderKey::BASELINE,
            list_limit: 100,
            subscription_limit: 100,
            stats_limit: 1000,
            stats_utc_offset: Utc.fix(),
        }
    }
}

impl OrderingConfig {
    /// Parses configuration from TOML text; absent keys keep defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseToml`] for malformed TOML,
    /// [`ConfigError::InvalidOrderGap`] for a non-positive gap and
    /// [`ConfigError::InvalidUtcOffset`] for an unparsable offset.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: OrderingConfigFile = toml::from_str(contents)?;
        Self::resolve(&file)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadFile`] if the file cannot be read, plus
    /// the errors of [`Self::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    fn resolve(file: &OrderingConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let order_gap = match file.ordering.order_gap {
            Some(raw) => OrderGap::new(raw).ok_or(ConfigError::InvalidOrderGap(raw))?,
            None => defaults.order_gap,
        };
        let stats_utc_offset = match file.stats.utc_offset.as_deref() {
            Some(raw) => raw
                .parse::<FixedOffset>()
                .map_err(|_| ConfigError::InvalidUtcOffset(raw.to_owned()))?,
            None => defaults.stats_utc_offset,
        };

        Ok(Self {
            order_gap,
            baseline_key: file
                .ordering
                .baseline_key
                .map_or(defaults.baseline_key, OrderKey::new),
            list_limit: file.ordering.list_limit.unwrap_or(defaults.list_limit),
            subscription_limit: file
                .ordering
                .subscription_limit
                .unwrap_or(defaults.subscription_limit),
            stats_limit: file.stats.limit.unwrap_or(defaults.stats_limit),
            stats_utc_offset,
        })
    }
}
