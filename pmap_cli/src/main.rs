mod progress;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use pmap_core::{NoProgress, Progress};
use progress::ConsoleBar;

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "pmap",
    about = "Presence-map block codec — lossless, self-verifying container encode/decode",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a file into a presence-map container
    Encode {
        /// Source file
        input: PathBuf,
        /// Destination container file
        output: PathBuf,
        /// Suppress the progress bar
        #[arg(short, long)]
        quiet: bool,
    },
    /// Decode a presence-map container back to the original bytes
    ///
    /// Every block is self-verified during decode: its re-encoded,
    /// re-compressed bytes must match the stored chunk exactly, or the whole
    /// decode aborts.
    Decode {
        /// Source container file
        input: PathBuf,
        /// Destination file
        output: PathBuf,
        /// Suppress the progress bar
        #[arg(short, long)]
        quiet: bool,
    },
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

fn make_progress(quiet: bool) -> Box<dyn Progress> {
    if quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ConsoleBar::stderr())
    }
}

/// Distinct exit codes per failure class, for operability: compression 3,
/// decompression 4, verification 5; I/O and everything else 1. Argument
/// errors are clap's standard usage handling.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<pmap_core::Error>() {
        Some(pmap_core::Error::Compression(_)) => 3,
        Some(pmap_core::Error::Decompression(_)) => 4,
        Some(pmap_core::Error::Verification { .. }) => 5,
        _ => 1,
    }
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_encode(input: PathBuf, output: PathBuf, quiet: bool) -> anyhow::Result<()> {
    let file = File::open(&input).with_context(|| format!("opening input file {:?}", input))?;
    let input_len = file.metadata()?.len();
    let src = BufReader::new(file);

    let dst = BufWriter::new(
        File::create(&output).with_context(|| format!("creating output file {:?}", output))?,
    );

    let mut bar = make_progress(quiet);
    let t0 = Instant::now();
    let blocks = pmap_core::encode(src, input_len, dst, bar.as_mut())?;
    let elapsed = t0.elapsed();

    let container_size = std::fs::metadata(&output)?.len();
    let ratio = if container_size == 0 {
        1.0
    } else {
        input_len as f64 / container_size as f64
    };

    eprintln!("  blocks      : {}", blocks);
    eprintln!("  raw size    : {}", human_bytes(input_len));
    eprintln!("  container   : {}", human_bytes(container_size));
    eprintln!("  ratio       : {:.2}x", ratio);
    eprintln!(
        "  throughput  : {}/s",
        human_bytes((input_len as f64 / elapsed.as_secs_f64()) as u64)
    );
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_decode(input: PathBuf, output: PathBuf, quiet: bool) -> anyhow::Result<()> {
    let src = BufReader::new(
        File::open(&input).with_context(|| format!("opening container file {:?}", input))?,
    );
    let dst = BufWriter::new(
        File::create(&output).with_context(|| format!("creating output file {:?}", output))?,
    );

    let mut bar = make_progress(quiet);
    let t0 = Instant::now();
    let written = pmap_core::decode(src, dst, bar.as_mut())?;
    let elapsed = t0.elapsed();

    eprintln!("  raw size    : {}", human_bytes(written));
    eprintln!(
        "  throughput  : {}/s",
        human_bytes((written as f64 / elapsed.as_secs_f64()) as u64)
    );
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Encode {
            input,
            output,
            quiet,
        } => run_encode(input, output, quiet),
        Commands::Decode {
            input,
            output,
            quiet,
        } => run_decode(input, output, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}
