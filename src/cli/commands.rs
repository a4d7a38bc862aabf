//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::info;

use crate::analysis::read_envelope_text;
use crate::config::TrimConfig;
use crate::engine::{read_container, ReadMode};
use crate::error::Result;
use crate::pipeline::{analyze_envelope_only, trim_with_config, TrimAnalysis};

/// Load the config file if one was given, else the defaults.
pub fn load_config(path: Option<&Path>) -> Result<TrimConfig> {
    match path {
        Some(path) => {
            info!("Loading config: {}", path.display());
            TrimConfig::from_json_file(path)
        }
        None => Ok(TrimConfig::default()),
    }
}

/// Trim a recording.
pub fn trim(input: &Path, output: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config)?;
    let report = trim_with_config(input, output, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Trimmed: {}", report.output.display());
    print_analysis(&report.analysis);
    println!("Samples analysed: {}", report.sample_count);

    Ok(())
}

/// Compute trim points from an amplitude text file.
pub fn analyze(amplitudes: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config)?;
    info!("Analysing amplitudes: {}", amplitudes.display());

    let envelope = read_envelope_text(amplitudes)?;
    let analysis = analyze_envelope_only(&envelope, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_analysis(&analysis);
    }

    Ok(())
}

/// Print the header of a recording.
pub fn inspect(input: &Path) -> Result<()> {
    let container = read_container(input, ReadMode::Rewrite)?;
    let header = &container.header;

    println!("{}", input.display());
    println!("{:-<40}", "");
    println!("{}", header);
    println!("{:-<40}", "");
    println!("Duration: {:.2}s", header.duration_secs());

    Ok(())
}

fn print_analysis(analysis: &TrimAnalysis) {
    println!(
        "Envelope: {} chunks, peak {} at chunk {}",
        analysis.envelope_len, analysis.peak.value, analysis.peak.index
    );
    println!(
        "Chunks kept: {}..={}",
        analysis.start.index, analysis.end.index
    );
    println!(
        "Samples kept: {}..{} ({} samples)",
        analysis.window.start(),
        analysis.window.end(),
        analysis.window.len()
    );
}
