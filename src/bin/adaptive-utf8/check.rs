//! CLI handler for the `check` command.

use adaptive_utf8::{validate, Check};
use anyhow::{Context, Result};
use clap::Parser;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Check files for UTF-8 (or ASCII) compliance.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Input files to check (reads from stdin if none provided)
    #[arg(trailing_var_arg = true)]
    pub files: Vec<PathBuf>,

    /// Require ASCII instead of UTF-8
    #[arg(long)]
    pub ascii: bool,

    /// Quiet mode: exit code only, no output
    #[arg(short, long)]
    pub quiet: bool,

    /// Force color output even when not a TTY
    #[arg(short = 'C', long = "color")]
    pub color: bool,

    /// Disable color output
    #[arg(short = 'M', long = "no-color")]
    pub no_color: bool,
}

/// Exit codes for the check command.
pub mod exit_codes {
    /// Every input passed.
    pub const SUCCESS: i32 = 0;
    /// At least one input failed the check.
    pub const INVALID: i32 = 1;
    /// I/O error (file not found, permission denied, etc.).
    pub const IO_ERROR: i32 = 2;
}

mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const LOCATION: &str = "\x1b[1;34m"; // Bold blue
}

/// Color scheme that can be disabled.
struct ColorScheme {
    error: &'static str,
    location: &'static str,
    reset: &'static str,
}

impl ColorScheme {
    fn new(use_color: bool) -> Self {
        if use_color {
            Self {
                error: colors::ERROR,
                location: colors::LOCATION,
                reset: colors::RESET,
            }
        } else {
            Self {
                error: "",
                location: "",
                reset: "",
            }
        }
    }
}

/// Run the check command.
pub fn run(args: CheckArgs) -> Result<i32> {
    let use_color = if args.no_color {
        false
    } else if args.color {
        true
    } else {
        atty::is(atty::Stream::Stderr)
    };
    let scheme = ColorScheme::new(use_color);
    let check = if args.ascii { Check::Ascii } else { Check::Utf8 };

    if args.files.is_empty() {
        let mut input = Vec::new();
        io::stdin()
            .read_to_end(&mut input)
            .context("failed to read from stdin")?;
        return Ok(check_input(check, &input, "<stdin>", &args, &scheme));
    }

    let mut any_invalid = false;
    let mut any_io_error = false;

    for path in &args.files {
        let result = with_mapped(path, |input| {
            check_input(check, input, &path.to_string_lossy(), &args, &scheme)
        });
        match result {
            Ok(exit_codes::INVALID) => any_invalid = true,
            Ok(_) => {}
            Err(e) => {
                any_io_error = true;
                if !args.quiet {
                    eprintln!(
                        "{}error{}: {}: {}",
                        scheme.error,
                        scheme.reset,
                        path.display(),
                        e
                    );
                }
            }
        }
    }

    Ok(if any_io_error {
        exit_codes::IO_ERROR
    } else if any_invalid {
        exit_codes::INVALID
    } else {
        exit_codes::SUCCESS
    })
}

/// Memory-map `path` and pass its contents to `f`.
fn with_mapped<T>(path: &Path, f: impl FnOnce(&[u8]) -> T) -> io::Result<T> {
    let file = File::open(path)?;
    // Zero-length files cannot be mapped on every platform.
    if file.metadata()?.len() == 0 {
        return Ok(f(&[]));
    }
    // SAFETY: the map is read-only and dropped before returning. Concurrent
    // truncation by another process is outside what this tool guards against.
    let map = unsafe { Mmap::map(&file)? };
    Ok(f(&map))
}

fn check_input(
    check: Check,
    input: &[u8],
    name: &str,
    args: &CheckArgs,
    scheme: &ColorScheme,
) -> i32 {
    if validate(check, input) {
        return exit_codes::SUCCESS;
    }
    if !args.quiet {
        if let Some(failure) = locate(check, input) {
            print_failure(&failure, name, scheme);
        }
    }
    exit_codes::INVALID
}

/// Where and why an input failed.
#[derive(Debug, PartialEq, Eq)]
struct Failure {
    /// Byte offset of the first offending byte.
    offset: usize,
    /// 1-based line number.
    line: usize,
    /// 1-based byte column.
    column: usize,
    message: String,
}

/// Find the first offending byte. Only called once validation has failed.
fn locate(check: Check, input: &[u8]) -> Option<Failure> {
    let (offset, message) = match check {
        Check::Ascii => {
            let offset = input.iter().position(|&b| b >= 0x80)?;
            (offset, format!("non-ASCII byte 0x{:02X}", input[offset]))
        }
        Check::Utf8 => {
            let err = std::str::from_utf8(input).err()?;
            let offset = err.valid_up_to();
            let message = match err.error_len() {
                Some(_) => format!("invalid UTF-8 sequence (byte 0x{:02X})", input[offset]),
                None => "truncated UTF-8 sequence at end of input".to_string(),
            };
            (offset, message)
        }
    };

    let prefix = &input[..offset];
    let line = prefix.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = prefix.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1);

    Some(Failure {
        offset,
        line,
        column: offset - line_start + 1,
        message,
    })
}

fn print_failure(failure: &Failure, name: &str, scheme: &ColorScheme) {
    eprintln!("{}error{}: {}", scheme.error, scheme.reset, failure.message);
    eprintln!(
        "  {}--> {}:{}:{}{} (offset {})",
        scheme.location, name, failure.line, failure.column, scheme.reset, failure.offset
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(files: Vec<PathBuf>, ascii: bool) -> CheckArgs {
        CheckArgs {
            files,
            ascii,
            quiet: true,
            color: false,
            no_color: true,
        }
    }

    mod locate {
        use super::*;

        #[test]
        fn utf8_invalid_byte() {
            let failure = locate(Check::Utf8, b"ok\nab\xFFcd").unwrap();
            assert_eq!(failure.offset, 5);
            assert_eq!(failure.line, 2);
            assert_eq!(failure.column, 3);
            assert_eq!(failure.message, "invalid UTF-8 sequence (byte 0xFF)");
        }

        #[test]
        fn utf8_truncated() {
            let failure = locate(Check::Utf8, &[0x61, 0x61, 0xE2]).unwrap();
            assert_eq!(failure.offset, 2);
            assert_eq!(failure.message, "truncated UTF-8 sequence at end of input");
        }

        #[test]
        fn ascii_first_high_byte() {
            let failure = locate(Check::Ascii, "line\nnaïve".as_bytes()).unwrap();
            assert_eq!(failure.offset, 7);
            assert_eq!((failure.line, failure.column), (2, 3));
            assert_eq!(failure.message, "non-ASCII byte 0xC3");
        }

        #[test]
        fn valid_input_has_no_failure() {
            assert_eq!(locate(Check::Utf8, "日本語".as_bytes()), None);
            assert_eq!(locate(Check::Ascii, b"plain"), None);
        }
    }

    mod files {
        use super::*;

        fn write_temp(contents: &[u8]) -> tempfile::NamedTempFile {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            file.write_all(contents).unwrap();
            file.flush().unwrap();
            file
        }

        #[test]
        fn valid_files_succeed() {
            let long = write_temp("日本語 text ".repeat(1000).as_bytes());
            let empty = write_temp(b"");
            let files = vec![long.path().to_path_buf(), empty.path().to_path_buf()];
            assert_eq!(run(args(files, false)).unwrap(), exit_codes::SUCCESS);
        }

        #[test]
        fn invalid_file_fails() {
            let mut contents = vec![b'#'; 4096];
            contents.extend_from_slice(&[0xED, 0xA0, 0x80]);
            let bad = write_temp(&contents);
            let files = vec![bad.path().to_path_buf()];
            assert_eq!(run(args(files, false)).unwrap(), exit_codes::INVALID);
        }

        #[test]
        fn ascii_mode() {
            let utf8 = write_temp("café".as_bytes());
            let files = vec![utf8.path().to_path_buf()];
            assert_eq!(run(args(files.clone(), false)).unwrap(), exit_codes::SUCCESS);
            assert_eq!(run(args(files, true)).unwrap(), exit_codes::INVALID);
        }

        #[test]
        fn missing_file_is_io_error() {
            let dir = tempfile::tempdir().unwrap();
            let bad = write_temp(&[0xC0, 0x80]);
            let files = vec![dir.path().join("missing.txt"), bad.path().to_path_buf()];
            assert_eq!(run(args(files, false)).unwrap(), exit_codes::IO_ERROR);
        }
    }
}
