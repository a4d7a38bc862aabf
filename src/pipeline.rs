//! Trimming pipeline
//!
//! Sequences the whole job: read for analysis, build and smooth the
//! envelope, locate the trim points, map them to samples, then re-read the
//! input byte for byte and write the trimmed copy.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::analysis::{
    arg_max, extract_envelope, find_end, find_start, sample_space, smooth, to_sample_window,
    Envelope, IndexedPoint, TrimWindow,
};
use crate::config::TrimConfig;
use crate::engine::{read_container, staging_path, trimmed_output_path, write_trimmed, ReadMode};
use crate::error::{Result, TrimError};

/// Status returned by [`trim`] on success
pub const STATUS_OK: i32 = 0;

/// Trim points computed from one envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimAnalysis {
    /// Number of envelope entries
    pub envelope_len: usize,
    /// Peak of the smoothed envelope
    pub peak: IndexedPoint,
    /// Envelope-domain start point
    pub start: IndexedPoint,
    /// Envelope-domain end point
    pub end: IndexedPoint,
    /// Padded sample-domain window
    pub window: TrimWindow,
}

/// Outcome of a successful [`trim_with_config`] run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimReport {
    pub input: PathBuf,
    /// File actually written
    pub output: PathBuf,
    /// Samples in the analysed channel
    pub sample_count: usize,
    pub analysis: TrimAnalysis,
}

/// Smooth an envelope and find the sample window to keep
///
/// `total_samples` bounds the padded end of the window.
///
/// # Errors
/// * `EmptyInput` - the envelope is empty
/// * `InvalidParameter` - the config is invalid or the window collapses
pub fn analyze_envelope(
    envelope: &Envelope,
    total_samples: usize,
    config: &TrimConfig,
) -> Result<TrimAnalysis> {
    config.validate()?;

    let smoothed = smooth(envelope, config.smooth_threshold);
    let max_index = arg_max(&smoothed)?;
    let peak = IndexedPoint {
        index: max_index,
        value: smoothed[max_index],
    };

    let start = find_start(&smoothed, max_index)?;
    let end = find_end(
        &smoothed,
        max_index,
        config.end_percent,
        config.allowed_silence,
    )?;
    debug!(
        "Envelope of {} entries: peak {:?}, start {:?}, end {:?}",
        smoothed.len(),
        peak,
        start,
        end
    );

    let window = to_sample_window(
        start.index,
        end.index,
        smoothed.len(),
        total_samples,
        config,
    )?;

    Ok(TrimAnalysis {
        envelope_len: smoothed.len(),
        peak,
        start,
        end,
        window,
    })
}

/// Analyse an envelope that did not come from a recording
///
/// The sample count is taken to be `envelope.len() * chunk_size`.
pub fn analyze_envelope_only(envelope: &Envelope, config: &TrimConfig) -> Result<TrimAnalysis> {
    let total_samples = sample_space(envelope.len(), config.chunk_size)?;
    analyze_envelope(envelope, total_samples, config)
}

/// Trim `input`, writing `<output stem>-trimmed.wav` next to `output`
///
/// Nothing is written unless every step before the write succeeds.
pub fn trim_with_config(input: &Path, output: &Path, config: &TrimConfig) -> Result<TrimReport> {
    config.validate()?;
    info!("Trimming {}", input.display());

    let target = trimmed_output_path(output);
    ensure_distinct(input, &target)?;
    ensure_distinct(input, &staging_path(&target))?;

    let samples = read_container(input, ReadMode::Analysis)?.into_samples()?;
    let sample_count = samples.len();

    let envelope = extract_envelope(&samples, config.chunk_size)?;
    drop(samples);

    let analysis = analyze_envelope(&envelope, sample_count, config)?;
    info!(
        "Keeping samples {}..{} of {}",
        analysis.window.start(),
        analysis.window.end(),
        sample_count
    );

    let container = read_container(input, ReadMode::Rewrite)?;
    let written = write_trimmed(output, container, analysis.window)?;
    info!("Wrote {}", written.display());

    Ok(TrimReport {
        input: input.to_path_buf(),
        output: written,
        sample_count,
        analysis,
    })
}

/// Trim with the default configuration, reporting an integer status
///
/// Returns [`STATUS_OK`] on success and [`TrimError::status_code`] otherwise.
pub fn trim(input: &Path, output: &Path) -> i32 {
    match trim_with_config(input, output, &TrimConfig::default()) {
        Ok(_) => STATUS_OK,
        Err(e) => {
            error!("Trimming {} failed: {}", input.display(), e);
            e.status_code()
        }
    }
}

/// A file the write touches must never be the input
fn ensure_distinct(input: &Path, target: &Path) -> Result<()> {
    if !target.exists() {
        return Ok(());
    }
    let input_real = fs::canonicalize(input).map_err(|e| TrimError::io(input, e))?;
    let target_real = fs::canonicalize(target).map_err(|e| TrimError::io(target, e))?;
    if input_real == target_real {
        return Err(TrimError::InvalidParameter {
            param: "output".to_string(),
            value: target.display().to_string(),
            expected: "a path other than the input file".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_scenario_envelope() {
        let envelope = Envelope::new(vec![5, 20, 15, 90, 85, 80, 2, 1, 1, 1, 1, 1, 1]);
        let config = TrimConfig {
            smooth_threshold: 10,
            ..TrimConfig::default()
        };
        let analysis = analyze_envelope_only(&envelope, &config).unwrap();

        assert_eq!(analysis.envelope_len, 13);
        assert_eq!(analysis.peak, IndexedPoint { index: 3, value: 90 });
        assert_eq!(analysis.start.index, 2);
        assert_eq!(analysis.end.index, 12);
        assert_eq!(analysis.window.start(), 0);
        assert_eq!(analysis.window.end(), 13 * 1024);
    }

    #[test]
    fn test_analyze_window_inside_sample_count() {
        let mut values = vec![0; 40];
        // a noise blip well before the breath
        values[10] = 800;
        values[11] = 200;
        values[20] = 5000;
        values[21] = 4000;
        values[22] = 3000;
        let envelope = Envelope::new(values);
        let analysis = analyze_envelope(&envelope, 39 * 1024 + 10, &TrimConfig::default()).unwrap();

        // first entry after the blip's falling edge
        assert_eq!(analysis.start.index, 12);
        // ten silent entries after the peak: 23..=32
        assert_eq!(analysis.end.index, 32);
        assert_eq!(analysis.window.start(), 10 * 1024);
        assert_eq!(analysis.window.end(), 34 * 1024);
    }

    #[test]
    fn test_analyze_huge_chunk_size_is_an_error() {
        let envelope = Envelope::new(vec![0, 500, 0]);
        let config = TrimConfig {
            chunk_size: 1 << (usize::BITS - 2),
            padding_chunks: 1,
            ..TrimConfig::default()
        };

        let err = analyze_envelope_only(&envelope, &config).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        let err = analyze_envelope(&envelope, 3, &config).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
    }

    #[test]
    fn test_analyze_empty_envelope() {
        let err = analyze_envelope_only(&Envelope::default(), &TrimConfig::default()).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_INPUT");
    }

    #[test]
    fn test_analyze_rejects_invalid_config() {
        let config = TrimConfig {
            allowed_silence: 0,
            ..TrimConfig::default()
        };
        let envelope = Envelope::new(vec![1, 500, 1]);
        assert!(analyze_envelope_only(&envelope, &config).is_err());
    }

    #[test]
    fn test_trim_refuses_input_at_staging_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("take-trimmed.partial");
        fs::write(&input, b"not touched").unwrap();

        let err = trim_with_config(&input, &dir.path().join("take.wav"), &TrimConfig::default())
            .unwrap_err();

        assert!(matches!(err, TrimError::InvalidParameter { .. }));
        assert_eq!(fs::read(&input).unwrap(), b"not touched");
        assert!(!dir.path().join("take-trimmed.wav").exists());
    }

    #[test]
    fn test_trim_missing_input_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.wav");
        let status = trim(&dir.path().join("missing.wav"), &output);

        assert_eq!(status, 3);
        assert!(!trimmed_output_path(&output).exists());
    }
}
