//! CLI handler for the `calibrate` command.
//!
//! Runs the calibration procedure for each selected check and pattern, then
//! prints a `Cutoffs` literal that can be pasted into the table for this
//! architecture family.

use adaptive_utf8::calibrate::{
    calibrate_with, suggest, Calibration, CalibrationConfig, CalibrationError, Pattern,
};
use adaptive_utf8::{Check, ACTIVE};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Measure the scalar/vectorized crossover on this machine.
#[derive(Debug, Parser)]
pub struct CalibrateArgs {
    /// Check to calibrate
    #[arg(long, default_value = "all")]
    pub check: CheckArg,

    /// Input pattern to probe with
    #[arg(long, default_value = "all")]
    pub pattern: PatternArg,

    /// Required speedup of the vectorized path, in percent
    #[arg(long)]
    pub margin: Option<u32>,

    /// Upper end of the search range (supports b, kb, mb, gb)
    #[arg(long, value_parser = crate::parse_size)]
    pub max_len: Option<usize>,

    /// Minimum duration of one timing sample, in milliseconds
    #[arg(long)]
    pub sample_time: Option<u64>,

    /// Timing samples per probe (median is used)
    #[arg(long)]
    pub samples: Option<usize>,

    /// JSON file with calibration settings (flags override it)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Stream one JSON object per run to this file
    #[arg(long)]
    pub jsonl: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CheckArg {
    Ascii,
    Utf8,
    All,
}

impl CheckArg {
    fn checks(self) -> Vec<Check> {
        match self {
            CheckArg::Ascii => vec![Check::Ascii],
            CheckArg::Utf8 => vec![Check::Utf8],
            CheckArg::All => Check::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PatternArg {
    /// `a` repeated
    Ascii,
    /// Two- and three-byte sequences only
    NonAscii,
    /// ASCII ending in one two-byte sequence
    MixedTail,
    All,
}

impl PatternArg {
    fn patterns(self) -> Vec<Pattern> {
        match self {
            PatternArg::Ascii => vec![Pattern::Ascii],
            PatternArg::NonAscii => vec![Pattern::NonAscii],
            PatternArg::MixedTail => vec![Pattern::MixedTail],
            PatternArg::All => Pattern::ALL.to_vec(),
        }
    }
}

/// Exit codes for the calibrate command.
pub mod exit_codes {
    /// All runs completed and no violations were seen.
    pub const SUCCESS: i32 = 0;
    /// Some run reported monotonicity violations.
    pub const NOT_MONOTONIC: i32 = 1;
    /// Scalar and vectorized paths disagreed on a probe buffer.
    pub const DISAGREEMENT: i32 = 3;
}

/// Build the effective config: defaults, then the file, then flags.
fn load_config(args: &CalibrateArgs) -> Result<CalibrationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid calibration config in {}", path.display()))?
        }
        None => CalibrationConfig::default(),
    };

    if let Some(margin) = args.margin {
        config = config.with_margin_percent(margin);
    }
    if let Some(max_len) = args.max_len {
        config = config.with_max_len(max_len);
    }
    if let Some(ms) = args.sample_time {
        config = config.with_sample_time(Duration::from_millis(ms));
    }
    if let Some(samples) = args.samples {
        config = config.with_samples(samples);
    }

    config.validate()?;
    Ok(config)
}

/// Run the calibrate command.
pub fn run(args: CalibrateArgs) -> Result<i32> {
    let config = load_config(&args)?;

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::SeqCst);
        eprintln!("\nInterrupted! Stopping after the current run...");
    })
    .context("Failed to set Ctrl+C handler")?;

    eprintln!("Calibrating on {}...", std::env::consts::ARCH);
    eprintln!("  Active table: {}", ACTIVE);
    eprintln!("  Margin: {}%", config.margin_percent);
    eprintln!(
        "  Sample time: {} ms x {} samples",
        config.sample_time_ms, config.samples
    );
    eprintln!();

    let mut jsonl_file = args
        .jsonl
        .as_deref()
        .map(|p| {
            std::fs::File::create(p).with_context(|| format!("Failed to create {}", p.display()))
        })
        .transpose()?;

    let mut runs = Vec::new();

    'outer: for check in args.check.checks() {
        for pattern in args.pattern.patterns() {
            if interrupted.load(Ordering::SeqCst) {
                break 'outer;
            }

            eprint!(
                "  {} {} (up to {})",
                check,
                pattern,
                format_bytes(config.max_len_for(check))
            );
            std::io::stderr().flush()?;

            let result = calibrate_with(check, pattern, &config, |_| {
                eprint!(".");
                let _ = std::io::stderr().flush();
            });
            eprintln!();

            let run = match result {
                Ok(run) => run,
                Err(err @ CalibrationError::PathDisagreement { .. }) => {
                    eprintln!("error: {}", err);
                    return Ok(exit_codes::DISAGREEMENT);
                }
                Err(err) => return Err(err.into()),
            };

            println!("{}", summary_line(&run));
            for len in &run.violations {
                eprintln!("  warning: vectorized path lost at n={} above the cutoff", len);
            }

            if let Some(ref mut f) = jsonl_file {
                serde_json::to_writer(&mut *f, &run)?;
                writeln!(f)?;
                f.flush()?;
            }

            runs.push(run);
        }
    }

    eprintln!();
    eprintln!("Completed {} calibration runs", runs.len());
    if !runs.is_empty() {
        let suggested = suggest(&runs, ACTIVE.cutoffs);
        println!("suggested: {}", cutoffs_literal(suggested.ascii, suggested.utf8));
    }

    if let Some(path) = args.jsonl.as_deref() {
        eprintln!("Wrote {}", path.display());
    }

    Ok(if runs.iter().all(Calibration::is_monotonic) {
        exit_codes::SUCCESS
    } else {
        exit_codes::NOT_MONOTONIC
    })
}

fn summary_line(run: &Calibration) -> String {
    let mut line = format!(
        "calibration: {} {} cutoff = {}",
        run.check, run.pattern, run.cutoff
    );
    if run.is_saturated() {
        line.push_str(" (vectorized never won)");
    }
    line
}

fn cutoffs_literal(ascii: usize, utf8: usize) -> String {
    let fmt = |n: usize| {
        if n == usize::MAX {
            "usize::MAX".to_string()
        } else {
            n.to_string()
        }
    };
    format!("Cutoffs::new({}, {})", fmt(ascii), fmt(utf8))
}

/// Format bytes as human-readable string
fn format_bytes(bytes: usize) -> String {
    if bytes >= 1024 * 1024 * 1024 {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if bytes >= 1024 * 1024 {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}
