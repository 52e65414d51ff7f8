//! adaptive-utf8 CLI: validate files, inspect and calibrate cutoff tables.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

mod calibrate;
mod check;

#[derive(Debug, Parser)]
#[command(name = "adaptive-utf8")]
#[command(about = "Length-adaptive ASCII and UTF-8 validation", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check files (or stdin) for UTF-8 or ASCII
    Check(check::CheckArgs),
    /// Print the cutoff tables
    Cutoffs(CutoffsArgs),
    /// Measure cutoffs on this machine
    Calibrate(calibrate::CalibrateArgs),
}

/// Print the cutoff tables
#[derive(Debug, Parser)]
struct CutoffsArgs {
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

/// Parse size string like "1mb", "512KB", "2GB", "1024" (case insensitive)
fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim().to_lowercase();

    // Try parsing as plain number first
    if let Ok(bytes) = s.parse::<usize>() {
        return Ok(bytes);
    }

    let (num_str, unit) = if let Some(n) = s.strip_suffix("gb") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("mb") {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("kb") {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('b') {
        (n, 1)
    } else {
        return Err(format!(
            "Invalid size format: '{}'. Use format like '4kb', '16KB', or '1024'",
            s
        ));
    };

    num_str
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_mul(unit))
        .ok_or_else(|| format!("Invalid number in size: '{}'", s))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn print_cutoffs(args: &CutoffsArgs) -> Result<()> {
    use adaptive_utf8::cutoff::tables;
    use adaptive_utf8::ACTIVE;

    if args.json {
        let report = serde_json::json!({
            "active": ACTIVE,
            "tables": tables::ALL,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("active: {}", ACTIVE);
        for table in tables::ALL {
            println!("  {}", table);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match cli.command {
        Command::Check(args) => check::run(args)?,
        Command::Cutoffs(args) => {
            print_cutoffs(&args)?;
            0
        }
        Command::Calibrate(args) => calibrate::run(args)?,
    };

    std::process::exit(code);
}
