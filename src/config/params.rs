use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::constants::{
    BOOTSTRAP_ROW_BYTE_ESTIMATE, DEFAULT_FETCH_SIZE, INITIAL_SAMPLE_SIZE, MAX_BUFFER_BYTE_SIZE,
    MAX_FETCH_SIZE, MIN_BUFFER_BYTE_SIZE, MIN_FETCH_SIZE, SAMPLE_FREQUENCY,
    TARGET_BUFFER_SIZE_RATIO,
};
use crate::estimation::buffer_size;

fn default_initial_sample_size() -> u64 {
    INITIAL_SAMPLE_SIZE
}
fn default_sample_frequency() -> u64 {
    SAMPLE_FREQUENCY
}
fn default_min_buffer_byte_size() -> u64 {
    MIN_BUFFER_BYTE_SIZE
}
fn default_max_buffer_byte_size() -> u64 {
    MAX_BUFFER_BYTE_SIZE
}
fn default_target_buffer_size_ratio() -> f64 {
    TARGET_BUFFER_SIZE_RATIO
}
fn default_bootstrap_row_byte_estimate() -> u64 {
    BOOTSTRAP_ROW_BYTE_ESTIMATE
}
fn default_min_fetch_size() -> u32 {
    MIN_FETCH_SIZE
}
fn default_default_fetch_size() -> u32 {
    DEFAULT_FETCH_SIZE
}
fn default_max_fetch_size() -> u32 {
    MAX_FETCH_SIZE
}

/// Thresholds driving row size estimation and buffer/fetch sizing.
///
/// Built once (from defaults or a JSON document) and then only read. The
/// struct is `Copy`, so every streamed read carries its own value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FetchSizeParams {
    #[serde(default = "default_initial_sample_size")]
    #[schemars(
        title = "Initial sample size",
        description = "Rows observed with the fixed bootstrap estimate before switching to the running average.",
        default = "default_initial_sample_size",
        range(min = 1)
    )]
    pub initial_sample_size: u64,

    #[serde(default = "default_sample_frequency")]
    #[schemars(
        title = "Sample frequency",
        description = "Rows between two fetch size refreshes once sampling has started.",
        default = "default_sample_frequency",
        range(min = 1)
    )]
    pub sample_frequency: u64,

    #[serde(default = "default_min_buffer_byte_size")]
    #[schemars(
        title = "Minimum buffer byte size",
        description = "Smallest client-side buffer budget (bytes). Also the fallback when no usable estimate exists.",
        default = "default_min_buffer_byte_size"
    )]
    pub min_buffer_byte_size: u64,

    #[serde(default = "default_max_buffer_byte_size")]
    #[schemars(
        title = "Maximum buffer byte size",
        description = "Largest client-side buffer budget (bytes).",
        default = "default_max_buffer_byte_size"
    )]
    pub max_buffer_byte_size: u64,

    #[serde(default = "default_target_buffer_size_ratio")]
    #[schemars(
        title = "Target buffer size ratio",
        description = "Multiplier applied to a byte estimate to obtain the raw buffer target.",
        default = "default_target_buffer_size_ratio"
    )]
    pub target_buffer_size_ratio: f64,

    #[serde(default = "default_bootstrap_row_byte_estimate")]
    #[schemars(
        title = "Bootstrap row byte estimate",
        description = "Average row size reported during the bootstrap stage (bytes).",
        default = "default_bootstrap_row_byte_estimate"
    )]
    pub bootstrap_row_byte_estimate: u64,

    #[serde(default = "default_min_fetch_size")]
    #[schemars(
        title = "Minimum fetch size",
        description = "Fewest rows requested per round trip.",
        default = "default_min_fetch_size",
        range(min = 1)
    )]
    pub min_fetch_size: u32,

    #[serde(default = "default_default_fetch_size")]
    #[schemars(
        title = "Default fetch size",
        description = "Rows per round trip when the row size is unknown.",
        default = "default_default_fetch_size",
        range(min = 1)
    )]
    pub default_fetch_size: u32,

    #[serde(default = "default_max_fetch_size")]
    #[schemars(
        title = "Maximum fetch size",
        description = "Most rows requested per round trip.",
        default = "default_max_fetch_size",
        range(min = 1)
    )]
    pub max_fetch_size: u32,
}

impl FetchSizeParams {
    /// The compiled-in constants table.
    pub const BUILT_IN: Self = Self {
        initial_sample_size: INITIAL_SAMPLE_SIZE,
        sample_frequency: SAMPLE_FREQUENCY,
        min_buffer_byte_size: MIN_BUFFER_BYTE_SIZE,
        max_buffer_byte_size: MAX_BUFFER_BYTE_SIZE,
        target_buffer_size_ratio: TARGET_BUFFER_SIZE_RATIO,
        bootstrap_row_byte_estimate: BOOTSTRAP_ROW_BYTE_ESTIMATE,
        min_fetch_size: MIN_FETCH_SIZE,
        default_fetch_size: DEFAULT_FETCH_SIZE,
        max_fetch_size: MAX_FETCH_SIZE,
    };

    /// Parses a JSON document (missing fields take their defaults) and
    /// validates the result.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let params: Self = serde_json::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_sample_size == 0 {
            return Err(ConfigError::InvalidParameter(
                "initial_sample_size must be > 0".into(),
            ));
        }
        if self.sample_frequency == 0 {
            return Err(ConfigError::InvalidParameter(
                "sample_frequency must be > 0".into(),
            ));
        }
        if self.min_buffer_byte_size > self.max_buffer_byte_size {
            return Err(ConfigError::InvalidParameter(format!(
                "min_buffer_byte_size ({}) exceeds max_buffer_byte_size ({})",
                self.min_buffer_byte_size, self.max_buffer_byte_size
            )));
        }
        if !self.target_buffer_size_ratio.is_finite() || self.target_buffer_size_ratio <= 0.0 {
            return Err(ConfigError::InvalidParameter(format!(
                "target_buffer_size_ratio must be a positive number, got {}",
                self.target_buffer_size_ratio
            )));
        }
        if self.min_fetch_size == 0 {
            return Err(ConfigError::InvalidParameter(
                "min_fetch_size must be > 0".into(),
            ));
        }
        if self.min_fetch_size > self.default_fetch_size
            || self.default_fetch_size > self.max_fetch_size
        {
            return Err(ConfigError::InvalidParameter(format!(
                "fetch sizes must satisfy min <= default <= max, got {} / {} / {}",
                self.min_fetch_size, self.default_fetch_size, self.max_fetch_size
            )));
        }
        Ok(())
    }

    /// Buffer budget for an estimate, bounded by these parameters.
    ///
    /// See [`buffer_size::target_buffer_byte_size`].
    #[inline]
    pub fn target_buffer_byte_size(&self, average_row_byte_size: Option<u64>) -> u64 {
        buffer_size::target_buffer_byte_size(self, average_row_byte_size)
    }

    /// Clamps an externally supplied buffer budget to the configured bounds.
    /// The lower bound wins if the two are inverted.
    #[inline]
    pub fn clamp_buffer_byte_size(&self, bytes: u64) -> u64 {
        bytes
            .min(self.max_buffer_byte_size)
            .max(self.min_buffer_byte_size)
    }
}

impl Default for FetchSizeParams {
    fn default() -> Self {
        Self::BUILT_IN
    }
}
