//! shm-spectra - vibration PSD estimation CLI
//!
//! Operator and debugging front end over the `shm_spectra` library.
//!
//! # Usage
//!
//! ```bash
//! # Per-axis PSD of one sensor file
//! shm-spectra psd readings.txt
//! shm-spectra psd --axis z readings.txt
//!
//! # Mean PSD across sensors
//! shm-spectra mean-psd device1.txt device2.txt device3.txt
//!
//! # Inspect resampling
//! shm-spectra resample --mode aligned device1.txt
//! ```
//!
//! # Environment Variables
//!
//! - `SHM_SPECTRA_CONFIG`: Path to a spectral_config.toml
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use shm_spectra::acquisition::{load_readings, save_readings, write_readings};
use shm_spectra::codes::{code_to_id, id_to_code};
use shm_spectra::{Axis, ResampleMode, SpectralConfig, SpectralPipeline, Stream};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "shm-spectra")]
#[command(about = "Vibration PSD estimation for structural health monitoring")]
#[command(version)]
struct CliArgs {
    /// Path to a spectral_config.toml (overrides SHM_SPECTRA_CONFIG and ./spectral_config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Per-axis PSD of a single sensor's reading file
    Psd {
        /// Print only this axis (x, y or z) instead of all three
        #[arg(long, value_parser = parse_axis)]
        axis: Option<Axis>,
        /// Reading file (timestamp;x;y;z per line)
        file: PathBuf,
    },

    /// Mean PSD across several sensors' reading files
    MeanPsd {
        /// One reading file per sensor
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// Resample a reading file onto the uniform grid and print it
    Resample {
        /// Resampling strategy: interpolated or aligned
        #[arg(long, default_value = "interpolated")]
        mode: ResampleMode,
        /// Reading file
        file: PathBuf,
    },

    /// Align several reading files onto their common timeline
    Align {
        /// One reading file per sensor
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
        /// Directory receiving one `<name>_aligned.txt` per input
        #[arg(long, value_name = "DIR")]
        out_dir: PathBuf,
    },

    /// Convert between numeric IDs and 5-digit display codes
    Code {
        #[command(subcommand)]
        action: CodeAction,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(clap::Subcommand, Debug)]
enum CodeAction {
    /// ID to display code
    Encode { id: u64 },
    /// Display code to ID
    Decode { code: String },
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_axis(value: &str) -> Result<Axis, String> {
    let wanted = value.trim().to_ascii_lowercase();
    Axis::ALL
        .into_iter()
        .find(|axis| axis.to_string() == wanted)
        .ok_or_else(|| format!("unknown axis '{value}' (expected x, y or z)"))
}

fn load_config(path: Option<&Path>) -> Result<SpectralConfig> {
    match path {
        Some(p) => SpectralConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => Ok(SpectralConfig::load()),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

fn load_all(files: &[PathBuf]) -> Result<Vec<Stream>> {
    files.iter().map(load_readings).collect()
}

fn aligned_file_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map_or_else(|| "stream".to_string(), |s| s.to_string_lossy().into_owned());
    format!("{stem}_aligned.txt")
}


// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries results
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    // Subcommands that need no pipeline
    match &args.command {
        SubCommand::Code { action } => {
            match action {
                CodeAction::Encode { id } => println!("{}", id_to_code(*id)),
                CodeAction::Decode { code } => println!("{}", code_to_id(code)?),
            }
            return Ok(());
        }
        SubCommand::Config => {
            let config = load_config(args.config.as_deref())?;
            print!("{}", config.to_toml()?);
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(args.config.as_deref())?;
    let pipeline = SpectralPipeline::new(&config).context("Invalid spectral configuration")?;

    match args.command {
        SubCommand::Psd { axis, file } => {
            let readings = load_readings(&file)?;
            let spectrum = pipeline.single_stream_readings(&readings);
            info!(
                file = %file.display(),
                readings = readings.len(),
                bins = spectrum.len(),
                "Single-stream PSD computed"
            );
            match axis {
                Some(axis) => print_json(&spectrum.axis_spectrum(axis), args.pretty)?,
                None => print_json(&spectrum, args.pretty)?,
            }
        }
        SubCommand::MeanPsd { files } => {
            let streams = load_all(&files)?;
            let mean = pipeline.multi_stream_readings(&streams)?;
            info!(
                sensors = mean.sensor_count,
                aligned_samples = mean.aligned_samples,
                bins = mean.spectrum.len(),
                "Mean PSD computed"
            );
            print_json(&mean, args.pretty)?;
        }
        SubCommand::Resample { mode, file } => {
            let readings = load_readings(&file)?;
            let resampled = pipeline.resampler().resample(&readings, mode);
            info!(
                file = %file.display(),
                mode = %mode,
                input = readings.len(),
                output = resampled.len(),
                "Resampled stream"
            );
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_readings(&mut out, &resampled)?;
            out.flush().context("Failed to flush stdout")?;
        }
        SubCommand::Align { files, out_dir } => {
            let streams = load_all(&files)?;
            let aligned = pipeline.aligner().align(&streams);
            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("Failed to create {}", out_dir.display()))?;
            for (input, stream) in files.iter().zip(&aligned) {
                let target = out_dir.join(aligned_file_name(input));
                save_readings(&target, stream)?;
                info!(
                    input = %input.display(),
                    output = %target.display(),
                    readings = stream.len(),
                    "Wrote aligned stream"
                );
            }
        }
        SubCommand::Code { .. } | SubCommand::Config => {}
    }

    Ok(())
}
