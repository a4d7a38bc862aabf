//! Trimming configuration
//!
//! One value per pipeline stage. Loaded from JSON when a config file is
//! given; any field left out falls back to its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrimError};

/// Samples per envelope chunk
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Envelope entries at or below this are treated as noise
pub const DEFAULT_SMOOTH_THRESHOLD: i32 = 100;

/// Fraction of the peak below which an envelope entry counts as silence
pub const DEFAULT_END_PERCENT: f64 = 0.1;

/// Consecutive silent entries that end the region of interest
pub const DEFAULT_ALLOWED_SILENCE: usize = 10;

/// Safety margin added on each side of the window, in chunks
pub const DEFAULT_PADDING_CHUNKS: usize = 2;

/// Parameters for every stage of the trimming pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    /// Envelope granularity in samples
    pub chunk_size: usize,
    /// Noise floor for the smoother
    pub smooth_threshold: i32,
    /// Fraction of the peak defining silence (0 to 1)
    pub end_percent: f64,
    /// Consecutive sub-threshold entries that end the window
    pub allowed_silence: usize,
    /// Padding around the detected window, in chunks
    pub padding_chunks: usize,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            smooth_threshold: DEFAULT_SMOOTH_THRESHOLD,
            end_percent: DEFAULT_END_PERCENT,
            allowed_silence: DEFAULT_ALLOWED_SILENCE,
            padding_chunks: DEFAULT_PADDING_CHUNKS,
        }
    }
}

impl TrimConfig {
    /// Load a config from a JSON file and validate it
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| TrimError::io(path, e))?;
        Self::from_json_str(&content)
    }

    /// Parse a config from a JSON string and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TrimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate parameters are within usable ranges
    ///
    /// `padding_chunks` must be at least one: with no padding a window whose
    /// start and end land on the same chunk would be empty.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(invalid("chunk_size", self.chunk_size, ">= 1"));
        }
        if self.smooth_threshold < 0 {
            return Err(invalid("smooth_threshold", self.smooth_threshold, ">= 0"));
        }
        if !(self.end_percent > 0.0 && self.end_percent <= 1.0) {
            return Err(invalid("end_percent", self.end_percent, "0 < x <= 1"));
        }
        if self.allowed_silence == 0 {
            return Err(invalid("allowed_silence", self.allowed_silence, ">= 1"));
        }
        if self.padding_chunks == 0 {
            return Err(invalid("padding_chunks", self.padding_chunks, ">= 1"));
        }
        self.padding_samples()?;
        Ok(())
    }

    /// Padding in samples
    ///
    /// # Errors
    /// * `InvalidParameter` - the padding does not fit in a sample index
    pub fn padding_samples(&self) -> Result<usize> {
        self.padding_chunks
            .checked_mul(self.chunk_size)
            .ok_or_else(|| {
                invalid(
                    "padding_chunks * chunk_size",
                    format!("{} * {}", self.padding_chunks, self.chunk_size),
                    "a product that fits in usize",
                )
            })
    }
}

fn invalid(param: &str, value: impl ToString, expected: &str) -> TrimError {
    TrimError::InvalidParameter {
        param: param.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}
