//! sub2header: convert SubGhz RAW capture files into C/C++ headers
//!
//! Each input `name.sub` becomes `name.h` holding a `static const int32_t`
//! array of its timings plus a `nameCount` constant.

use anyhow::{Context, Result};
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use sub2header::{run_batch, BatchConfig, BatchReport};
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "sub2header")]
#[command(author, version, about = "Convert SubGhz RAW captures into C/C++ headers", long_about = None)]
struct Cli {
    /// Capture files to convert
    inputs: Vec<PathBuf>,

    /// Write all headers to this directory instead of beside each input
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Directory used when an input's directory is not writable
    #[arg(long)]
    fallback_dir: Option<PathBuf>,

    /// Values per array row [default: 24]
    #[arg(short = 'w', long)]
    chunk_width: Option<NonZeroUsize>,

    /// Negate every timing value
    #[arg(long)]
    invert: bool,

    /// Declare the array PROGMEM (AVR program memory)
    #[arg(long)]
    progmem: bool,

    /// JSON batch configuration; command-line options take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn batch_config(&self) -> Result<BatchConfig> {
        let mut config = match &self.config {
            Some(path) => BatchConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => BatchConfig::default(),
        };

        if !self.inputs.is_empty() {
            config.inputs = self.inputs.clone();
        }
        if let Some(dir) = &self.out_dir {
            config.out_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.fallback_dir {
            config.fallback_dir = dir.clone();
        }
        if let Some(width) = self.chunk_width {
            config.render.chunk_width = width;
        }
        config.render.invert |= self.invert;
        config.render.use_memory_placement |= self.progmem;

        Ok(config)
    }
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Invalid log filter")?;

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = cli.batch_config()?;
    if config.inputs.is_empty() {
        tracing::warn!("No input files given");
    }
    tracing::debug!("Batch config: {:?}", config);

    let report = run_batch(&config);

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", format_summary(&report));
    }

    Ok(())
}

fn format_summary(report: &BatchReport) -> String {
    let mut out = String::new();
    if report.is_empty() {
        out.push_str("No headers generated. Check your input paths.\n");
    } else {
        out.push_str("Generated headers:\n");
        for entry in &report.generated {
            let freq = entry
                .frequency_hz
                .map_or_else(|| "none".to_string(), |hz| hz.to_string());
            out.push_str(&format!("- {}\n", entry.source.display()));
            out.push_str(&format!("  -> array: {}\n", entry.symbol));
            out.push_str(&format!("  -> count: {}\n", entry.count));
            out.push_str(&format!("  -> freq : {}\n", freq));
            out.push_str(&format!(
                "  -> proto: {}\n",
                entry.protocol.as_deref().unwrap_or("none")
            ));
            out.push_str(&format!("  -> file : {}\n\n", entry.header_path.display()));
        }
    }

    if !report.skipped.is_empty() {
        out.push_str("Skipped:\n");
        for skipped in &report.skipped {
            out.push_str(&format!("- {} ({})\n", skipped.source.display(), skipped.reason));
        }
    }
    out
}
