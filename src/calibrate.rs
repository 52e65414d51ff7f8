//! Empirical cutoff calibration.
//!
//! Finds, on the current machine, the smallest buffer length at which the
//! vectorized path is reliably faster than the scalar one. The result is only
//! reported; updating [`crate::cutoff::tables`] is left to a human.
//!
//! ## Procedure
//!
//! For one [`Check`] and one [`Pattern`], binary-search `[0, max_len]` for the
//! smallest `n` such that
//!
//! ```text
//! scalar_ns(n) * 100 > vectorized_ns(n) * (100 + margin_percent)
//! ```
//!
//! where each `*_ns(n)` is the median time per call over several samples on an
//! `n`-byte buffer of the pattern. `n = 0` counts as a win, so the search
//! always terminates with a valid lower bound. The search assumes the
//! predicate is monotone in `n`; after it finishes, a few longer lengths are
//! re-probed and any that still lose after retries are reported as
//! [`Calibration::violations`].
//!
//! Timing uses the wall clock and assumes the core is otherwise idle. Do not
//! run two calibrations at once.
//!
//! ## Example
//!
//! ```no_run
//! use adaptive_utf8::calibrate::{calibrate, CalibrationConfig, Pattern};
//! use adaptive_utf8::Check;
//!
//! let config = CalibrationConfig::default().with_margin_percent(10);
//! let result = calibrate(Check::Utf8, Pattern::NonAscii, &config).unwrap();
//! println!("calibration: utf8 non-ascii cutoff = {}", result.cutoff);
//! ```

use std::hint::black_box;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cutoff::Cutoffs;
use crate::dispatch::Check;
use crate::utf8::is_valid_utf8_scalar;

/// Upper bound on iterations per timing window.
const MAX_ITERS: u64 = 1_000_000_000;

// =============================================================================
// Input patterns
// =============================================================================

/// Buffer contents used while probing.
///
/// The scalar word scan and the SIMD early exits are sensitive to where the
/// first non-ASCII byte sits, so each pattern is calibrated separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Pattern {
    /// `a` repeated.
    Ascii,
    /// Two- and three-byte sequences only (`α` repeated, one `€` for odd lengths).
    NonAscii,
    /// `#` repeated, ending in `α`.
    MixedTail,
}

impl Pattern {
    /// All patterns.
    pub const ALL: [Pattern; 3] = [Pattern::Ascii, Pattern::NonAscii, Pattern::MixedTail];

    /// Short kebab-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Pattern::Ascii => "ascii",
            Pattern::NonAscii => "non-ascii",
            Pattern::MixedTail => "mixed-tail",
        }
    }

    /// Build a `len`-byte buffer of this pattern.
    ///
    /// Every buffer is valid UTF-8. Lengths too short to hold a multi-byte
    /// sequence (1 for `NonAscii`, below 2 for `MixedTail`) come out as ASCII.
    pub fn fill(self, len: usize) -> Vec<u8> {
        match self {
            Pattern::Ascii => vec![b'a'; len],
            Pattern::NonAscii => {
                let mut buf = Vec::with_capacity(len);
                if len % 2 == 1 {
                    if len >= 3 {
                        buf.extend_from_slice("€".as_bytes());
                    } else {
                        buf.push(b'a');
                    }
                }
                while buf.len() < len {
                    buf.extend_from_slice("α".as_bytes());
                }
                buf
            }
            Pattern::MixedTail => {
                let mut buf = vec![b'#'; len];
                if len >= 2 {
                    buf[len - 2..].copy_from_slice("α".as_bytes());
                }
                buf
            }
        }
    }
}

impl core::fmt::Display for Pattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Tuning parameters for a calibration run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CalibrationConfig {
    /// How much faster the vectorized path must be, in percent (default: 10)
    pub margin_percent: u32,
    /// Upper end of the search range (default: 16 KiB for ASCII, 4 KiB for UTF-8)
    pub max_len: Option<usize>,
    /// Minimum duration of one timing sample in milliseconds (default: 100)
    pub sample_time_ms: u64,
    /// Timing samples per path per probe; the median is used (default: 3)
    pub samples: usize,
    /// Lengths above the cutoff re-probed for monotonicity (default: 4)
    pub verify_points: usize,
    /// Extra attempts before a losing verification probe is reported (default: 2)
    pub retries: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            margin_percent: 10,
            max_len: None,
            sample_time_ms: 100,
            samples: 3,
            verify_points: 4,
            retries: 2,
        }
    }
}

impl CalibrationConfig {
    /// A fast, noisy configuration for smoke tests.
    pub fn quick() -> Self {
        Self {
            sample_time_ms: 1,
            samples: 1,
            verify_points: 1,
            retries: 0,
            ..Self::default()
        }
    }

    /// Set the required speedup in percent.
    pub fn with_margin_percent(mut self, margin_percent: u32) -> Self {
        self.margin_percent = margin_percent;
        self
    }

    /// Set the upper end of the search range for every check.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Set the minimum duration of one timing sample.
    pub fn with_sample_time(mut self, sample_time: Duration) -> Self {
        self.sample_time_ms = sample_time.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    /// Set the number of timing samples per probe.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Set how many lengths above the cutoff are re-probed.
    pub fn with_verify_points(mut self, verify_points: usize) -> Self {
        self.verify_points = verify_points;
        self
    }

    /// Set how many times a losing verification probe is retried.
    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    /// Minimum duration of one timing sample.
    pub fn sample_time(&self) -> Duration {
        Duration::from_millis(self.sample_time_ms)
    }

    /// Upper end of the search range for `check`.
    pub fn max_len_for(&self, check: Check) -> usize {
        self.max_len.unwrap_or(match check {
            Check::Ascii => 16 * 1024,
            Check::Utf8 => 4 * 1024,
        })
    }

    /// Reject configurations that cannot produce a measurement.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.max_len == Some(0) {
            return Err(CalibrationError::InvalidConfig("max_len must be at least 1"));
        }
        if self.samples == 0 {
            return Err(CalibrationError::InvalidConfig("samples must be at least 1"));
        }
        if self.sample_time_ms == 0 {
            return Err(CalibrationError::InvalidConfig(
                "sample_time_ms must be at least 1",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Results
// =============================================================================

/// One measurement: both paths timed on the same buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Probe {
    /// Buffer length in bytes.
    pub len: usize,
    /// Median scalar time per call, in nanoseconds.
    pub scalar_ns: f64,
    /// Median vectorized time per call, in nanoseconds.
    pub vectorized_ns: f64,
    /// Whether the vectorized path beat the scalar one by the margin.
    pub vectorized_wins: bool,
}

/// Outcome of one calibration run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Calibration {
    /// Check that was calibrated.
    pub check: Check,
    /// Input pattern used for every probe.
    pub pattern: Pattern,
    /// Required speedup in percent.
    pub margin_percent: u32,
    /// Upper end of the search range.
    pub max_len: usize,
    /// Smallest length at which the vectorized path won.
    ///
    /// Capped at `max_len`; see `saturated` to tell a win at exactly
    /// `max_len` from no win at all.
    pub cutoff: usize,
    /// True if the vectorized path lost at every probed length, `max_len`
    /// included.
    pub saturated: bool,
    /// Every measurement taken, in order.
    pub probes: Vec<Probe>,
    /// Lengths above `cutoff` where the vectorized path still lost after retries.
    pub violations: Vec<usize>,
}

impl Calibration {
    /// True if no verification probe contradicted the cutoff.
    pub fn is_monotonic(&self) -> bool {
        self.violations.is_empty()
    }

    /// True if the vectorized path never won inside the search range.
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    /// Value to commit to the table: the cutoff, or `usize::MAX` if the
    /// vectorized path never won.
    pub fn suggested_cutoff(&self) -> usize {
        if self.is_saturated() {
            usize::MAX
        } else {
            self.cutoff
        }
    }
}

/// Fold several runs into a table row.
///
/// For each check that was calibrated, the largest suggested cutoff across its
/// patterns wins, so the vectorized path is only taken where it won for every
/// pattern. Checks without a run keep their value from `base`.
pub fn suggest(runs: &[Calibration], base: Cutoffs) -> Cutoffs {
    Check::ALL.iter().fold(base, |cutoffs, &check| {
        runs.iter()
            .filter(|run| run.check == check)
            .map(Calibration::suggested_cutoff)
            .max()
            .map_or(cutoffs, |cutoff| cutoffs.with(check, cutoff))
    })
}

// =============================================================================
// Errors
// =============================================================================

/// Reasons a calibration run stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalibrationError {
    /// The configuration cannot produce a measurement.
    InvalidConfig(&'static str),
    /// A generated pattern buffer is not valid UTF-8.
    InvalidPattern {
        /// The offending pattern.
        pattern: Pattern,
        /// Buffer length.
        len: usize,
    },
    /// The scalar and vectorized paths returned different answers.
    PathDisagreement {
        /// Check being calibrated.
        check: Check,
        /// Pattern of the buffer.
        pattern: Pattern,
        /// Buffer length.
        len: usize,
        /// Scalar answer.
        scalar: bool,
        /// Vectorized answer.
        vectorized: bool,
    },
}

impl core::fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidConfig(reason) => write!(f, "invalid calibration config: {}", reason),
            Self::InvalidPattern { pattern, len } => {
                write!(f, "{} pattern of {} bytes is not valid UTF-8", pattern, len)
            }
            Self::PathDisagreement {
                check,
                pattern,
                len,
                scalar,
                vectorized,
            } => write!(
                f,
                "{} paths disagree on {} bytes of {}: scalar={} vectorized={}",
                check, len, pattern, scalar, vectorized
            ),
        }
    }
}

impl std::error::Error for CalibrationError {}

// =============================================================================
// Procedure
// =============================================================================

/// Calibrate `check` on `pattern`.
pub fn calibrate(
    check: Check,
    pattern: Pattern,
    config: &CalibrationConfig,
) -> Result<Calibration, CalibrationError> {
    calibrate_with(check, pattern, config, |_| {})
}

/// [`calibrate`], calling `observe` after every probe.
pub fn calibrate_with<F>(
    check: Check,
    pattern: Pattern,
    config: &CalibrationConfig,
    observe: F,
) -> Result<Calibration, CalibrationError>
where
    F: FnMut(&Probe),
{
    let paths = (check.scalar(), check.vectorized());
    run_calibration(check, pattern, config, paths, observe)
}

/// Scalar and vectorized implementations timed against each other.
type Paths = (fn(&[u8]) -> bool, fn(&[u8]) -> bool);

fn run_calibration<F>(
    check: Check,
    pattern: Pattern,
    config: &CalibrationConfig,
    paths: Paths,
    mut observe: F,
) -> Result<Calibration, CalibrationError>
where
    F: FnMut(&Probe),
{
    config.validate()?;
    let max_len = config.max_len_for(check);
    let mut probes = Vec::new();

    let mut run_probe = |len: usize| -> Result<Probe, CalibrationError> {
        let probe = measure(check, pattern, len, paths, config)?;
        log::debug!(
            "{} {} n={}: scalar={:.1}ns vectorized={:.1}ns{}",
            check,
            pattern,
            len,
            probe.scalar_ns,
            probe.vectorized_ns,
            if probe.vectorized_wins { " (vectorized wins)" } else { "" }
        );
        observe(&probe);
        probes.push(probe);
        Ok(probe)
    };

    let found = search(max_len, |len| run_probe(len).map(|probe| probe.vectorized_wins))?;
    let saturated = found > max_len;
    let cutoff = found.min(max_len);

    for len in verify_lengths(cutoff, max_len, config.verify_points) {
        let mut wins = run_probe(len)?.vectorized_wins;
        let mut attempt = 0;
        while !wins && attempt < config.retries {
            wins = run_probe(len)?.vectorized_wins;
            attempt += 1;
        }
    }

    let violations = find_violations(&probes);
    for len in &violations {
        log::warn!(
            "{} {}: vectorized path lost at n={} above cutoff {}; cost curve is not monotone",
            check,
            pattern,
            len,
            cutoff
        );
    }
    log::info!("calibration: {} {} cutoff = {}", check, pattern, cutoff);

    Ok(Calibration {
        check,
        pattern,
        margin_percent: config.margin_percent,
        max_len,
        cutoff,
        saturated,
        probes,
        violations,
    })
}

/// Smallest `n` in `[0, max_len]` with `wins(n)`, or `max_len + 1` if none.
///
/// `wins(0)` is true by definition and never evaluated. `wins` must be
/// monotone (false ... false true ... true) for the answer to be meaningful.
fn search<F, E>(max_len: usize, mut wins: F) -> Result<usize, E>
where
    F: FnMut(usize) -> Result<bool, E>,
{
    let (mut lo, mut hi) = (0, max_len.saturating_add(1));
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if mid == 0 || wins(mid)? {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Ok(lo)
}

/// Lengths above `cutoff` to re-probe: doubling from the cutoff, capped at
/// `max_len`.
fn verify_lengths(cutoff: usize, max_len: usize, points: usize) -> Vec<usize> {
    let mut lengths = Vec::with_capacity(points);
    let mut len = cutoff.max(1);
    while lengths.len() < points {
        len = len.saturating_mul(2).min(max_len);
        if len <= cutoff || lengths.last() == Some(&len) {
            break;
        }
        lengths.push(len);
    }
    lengths
}

/// Lengths that lost although a shorter length won.
///
/// When a length was probed more than once, a single win clears it: losses on
/// retry are attributed to noise only if some attempt won.
fn find_violations(probes: &[Probe]) -> Vec<usize> {
    let mut by_len: Vec<(usize, bool)> = Vec::with_capacity(probes.len());
    for probe in probes {
        match by_len.iter_mut().find(|(len, _)| *len == probe.len) {
            Some((_, wins)) => *wins |= probe.vectorized_wins,
            None => by_len.push((probe.len, probe.vectorized_wins)),
        }
    }
    by_len.sort_unstable_by_key(|&(len, _)| len);

    let first_win = match by_len.iter().position(|&(_, wins)| wins) {
        Some(i) => i,
        None => return Vec::new(),
    };
    by_len[first_win..]
        .iter()
        .filter(|&&(_, wins)| !wins)
        .map(|&(len, _)| len)
        .collect()
}

/// Time both paths on one `len`-byte buffer.
fn measure(
    check: Check,
    pattern: Pattern,
    len: usize,
    (scalar, vectorized): Paths,
    config: &CalibrationConfig,
) -> Result<Probe, CalibrationError> {
    let buf = pattern.fill(len);
    if !is_valid_utf8_scalar(&buf) {
        return Err(CalibrationError::InvalidPattern { pattern, len });
    }

    let (scalar_ok, vectorized_ok) = (scalar(&buf), vectorized(&buf));
    if scalar_ok != vectorized_ok {
        return Err(CalibrationError::PathDisagreement {
            check,
            pattern,
            len,
            scalar: scalar_ok,
            vectorized: vectorized_ok,
        });
    }

    let window = config.sample_time();
    let mut scalar_samples = Vec::with_capacity(config.samples);
    let mut vectorized_samples = Vec::with_capacity(config.samples);
    for _ in 0..config.samples {
        scalar_samples.push(time_per_op(scalar, &buf, window));
        vectorized_samples.push(time_per_op(vectorized, &buf, window));
    }
    let scalar_ns = median(&mut scalar_samples);
    let vectorized_ns = median(&mut vectorized_samples);

    Ok(Probe {
        len,
        scalar_ns,
        vectorized_ns,
        vectorized_wins: vectorized_wins(scalar_ns, vectorized_ns, config.margin_percent),
    })
}

/// `scalar * 100 > vectorized * (100 + margin)`.
#[inline]
fn vectorized_wins(scalar_ns: f64, vectorized_ns: f64, margin_percent: u32) -> bool {
    scalar_ns * 100.0 > vectorized_ns * (100.0 + f64::from(margin_percent))
}

/// Nanoseconds per call of `f(input)`, growing the iteration count until one
/// timed run lasts at least `window`.
fn time_per_op(f: fn(&[u8]) -> bool, input: &[u8], window: Duration) -> f64 {
    let mut iters: u64 = 1;
    loop {
        let start = Instant::now();
        for _ in 0..iters {
            black_box(f(black_box(input)));
        }
        let elapsed = start.elapsed();

        if elapsed >= window || iters >= MAX_ITERS {
            return elapsed.as_nanos() as f64 / iters as f64;
        }
        iters = next_iters(iters, elapsed, window);
    }
}

/// Predict the iteration count for the next run: aim 20% past the window,
/// grow by at least 1 and at most 100x.
fn next_iters(iters: u64, elapsed: Duration, window: Duration) -> u64 {
    let per_iter = (elapsed.as_nanos() / u128::from(iters)).max(1);
    let goal = window.as_nanos() * 6 / 5 / per_iter;
    let goal = goal.min(u128::from(MAX_ITERS)) as u64;
    goal.clamp(iters + 1, iters.saturating_mul(100).min(MAX_ITERS))
}

fn median(samples: &mut [f64]) -> f64 {
    samples.sort_unstable_by(f64::total_cmp);
    samples[samples.len() / 2]
}
