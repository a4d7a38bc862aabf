//! breath-trim - Exhalation Trimming for Breath Recordings
//!
//! Finds the exhalation inside a recorded WAV file and writes a copy with the
//! surrounding silence and noise cut away.
//!
//! # Architecture
//!
//! The pipeline runs in five stages:
//! - Engine: parses the 16-bit PCM container and rewrites trimmed copies
//! - Envelope: reduces one channel to per-chunk peak amplitudes
//! - Smoothing: zeroes envelope entries at the noise floor
//! - Location: finds the start and end of the breath around the peak
//! - Window: maps envelope indices back to samples, with padding

pub mod analysis;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;

pub use config::TrimConfig;
pub use error::{Result, TrimError};
pub use pipeline::{trim, trim_with_config, TrimAnalysis, TrimReport};
