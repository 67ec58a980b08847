//! Parse capture file utility
//! Loads a SubGhz RAW capture and displays its metadata and timings

use std::env;
use std::num::NonZeroUsize;
use sub2header::capture::load_capture;
use sub2header::header::{render_nonempty, RenderConfig, SymbolName};

const PREVIEW_LEN: usize = 16;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage: {} <file.sub> [--header] [--progmem] [--invert] [--width N]",
            args[0]
        );
        eprintln!("\nExamples:");
        eprintln!("  {} gate.sub                    # Show capture summary", args[0]);
        eprintln!("  {} gate.sub --header           # Print generated header", args[0]);
        eprintln!(
            "  {} gate.sub --header --width 8 # Header with 8 values per row",
            args[0]
        );
        std::process::exit(1);
    }

    let sub_file = &args[1];
    let mut show_header = false;
    let mut config = RenderConfig::default();

    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--header" => show_header = true,
            "--progmem" => config = config.with_memory_placement(true),
            "--invert" => config = config.with_invert(true),
            "--width" => {
                let value = rest
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--width needs a value"))?;
                let width: NonZeroUsize = value.parse()?;
                config = config.with_chunk_width(width);
            }
            other => anyhow::bail!("Unknown argument: {}", other),
        }
    }

    let capture = load_capture(sub_file)?;

    if show_header {
        let symbol = SymbolName::from_path(sub_file);
        match render_nonempty(&symbol, &capture, &config) {
            Some(header) => print!("{}", header),
            None => anyhow::bail!(
                "{}: no RAW_Data values found; no header would be generated",
                sub_file
            ),
        }
        return Ok(());
    }

    println!("Capture file: {}", sub_file);
    match (capture.frequency_hz, capture.frequency_mhz()) {
        (Some(hz), Some(mhz)) => println!("  Frequency:    {} Hz ({:.3} MHz)", hz, mhz),
        _ => println!("  Frequency:    (none)"),
    }
    println!(
        "  Protocol:     {}",
        capture.protocol.as_deref().unwrap_or("(none)")
    );
    println!("  Values:       {}", capture.len());

    if capture.is_empty() {
        println!("\nNo RAW_Data values found; no header would be generated.");
        return Ok(());
    }

    println!("  Marks:        {}", capture.mark_count());
    println!("  Spaces:       {}", capture.space_count());
    println!("  Duration:     {} us", capture.total_duration());

    let preview: Vec<String> = capture
        .timings
        .iter()
        .take(PREVIEW_LEN)
        .map(|t| t.to_string())
        .collect();
    let ellipsis = if capture.len() > PREVIEW_LEN { ", ..." } else { "" };
    println!("  First values: {}{}", preview.join(", "), ellipsis);

    Ok(())
}
