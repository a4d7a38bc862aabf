//! CLI Module
//!
//! Command-line interface for breath-trim.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// breath-trim - cut a breath recording down to the exhalation
#[derive(Parser, Debug)]
#[command(name = "breath-trim")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trim a recording down to the exhalation
    #[command(name = "trim")]
    Trim {
        /// Input WAV recording
        input: PathBuf,

        /// Output path; the file written is <stem>-trimmed.wav
        output: PathBuf,

        /// JSON file overriding the trimming parameters
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the trim report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute trim points from an amplitude text file (one value per line)
    #[command(name = "analyze")]
    Analyze {
        /// Amplitude data file
        amplitudes: PathBuf,

        /// JSON file overriding the trimming parameters
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the header of a recording
    #[command(name = "inspect")]
    Inspect {
        /// Input WAV recording
        input: PathBuf,
    },
}
