//! Per-architecture cutoff tables.
//!
//! A cutoff is the largest buffer length still handled by the scalar path:
//! buffers of `len <= cutoff` are scanned in-process, longer ones go to the
//! SIMD validator. The values in [`tables`] were produced by the calibration
//! procedure (`adaptive-utf8 calibrate`) and committed by hand; bump the
//! entry's `revision` whenever its numbers change.
//!
//! | Family      | ASCII | UTF-8 | Provenance |
//! |-------------|-------|-------|------------|
//! | x86_64      | 1024  | 32    | Calibrated |
//! | aarch64     | 1024  | 64    | Calibrated |
//! | unverified  | 1024  | 64    | Estimated  |
//! | scalar-only | max   | max   | Disabled   |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dispatch::Check;

/// Scalar/vectorized crossover lengths for one architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cutoffs {
    /// Largest length validated by the scalar ASCII scanner.
    pub ascii: usize,
    /// Largest length validated by the scalar UTF-8 validator.
    pub utf8: usize,
}

impl Cutoffs {
    /// Cutoffs that never select the vectorized path.
    pub const DISABLED: Self = Self {
        ascii: usize::MAX,
        utf8: usize::MAX,
    };

    /// Create a pair of cutoffs.
    pub const fn new(ascii: usize, utf8: usize) -> Self {
        Self { ascii, utf8 }
    }

    /// The cutoff that applies to `check`.
    #[inline]
    pub const fn for_check(&self, check: Check) -> usize {
        match check {
            Check::Ascii => self.ascii,
            Check::Utf8 => self.utf8,
        }
    }

    /// Returns a copy with the cutoff for `check` replaced.
    pub const fn with(mut self, check: Check, cutoff: usize) -> Self {
        match check {
            Check::Ascii => self.ascii = cutoff,
            Check::Utf8 => self.utf8 = cutoff,
        }
        self
    }

    /// True if neither check ever uses the vectorized path.
    pub const fn is_disabled(&self) -> bool {
        self.ascii == usize::MAX && self.utf8 == usize::MAX
    }
}

/// Where a table entry's numbers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Provenance {
    /// Measured with the calibration procedure on this architecture family.
    Calibrated,
    /// Not measured. Guessed from a calibrated family; treat as unverified.
    Estimated,
    /// The SIMD validator offers nothing over the scalar path here.
    Disabled,
}

impl core::fmt::Display for Provenance {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Calibrated => write!(f, "calibrated"),
            Self::Estimated => write!(f, "estimated"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// One versioned row of the cutoff table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CutoffTable {
    /// Architecture family this row applies to.
    pub family: &'static str,
    /// Incremented each time the row's cutoffs are re-committed.
    pub revision: u32,
    /// How the cutoffs were obtained.
    pub provenance: Provenance,
    /// The cutoffs themselves.
    pub cutoffs: Cutoffs,
}

impl core::fmt::Display for CutoffTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} r{} ({}): ascii={} utf8={}",
            self.family,
            self.revision,
            self.provenance,
            DisplayCutoff(self.cutoffs.ascii),
            DisplayCutoff(self.cutoffs.utf8)
        )
    }
}

/// Renders `usize::MAX` as `max`.
struct DisplayCutoff(usize);

impl core::fmt::Display for DisplayCutoff {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.0 == usize::MAX {
            write!(f, "max")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Every known table row.
pub mod tables {
    use super::{CutoffTable, Cutoffs, Provenance};

    /// x86_64 (SSE2/AVX2).
    pub const X86_64: CutoffTable = CutoffTable {
        family: "x86_64",
        revision: 1,
        provenance: Provenance::Calibrated,
        cutoffs: Cutoffs::new(1024, 32),
    };

    /// aarch64 (NEON).
    pub const AARCH64: CutoffTable = CutoffTable {
        family: "aarch64",
        revision: 1,
        provenance: Provenance::Calibrated,
        cutoffs: Cutoffs::new(1024, 64),
    };

    /// Architectures nobody has calibrated yet. Copied from [`AARCH64`].
    ///
    /// If you have access to one of these machines, run
    /// `adaptive-utf8 calibrate` and add a calibrated row.
    pub const UNVERIFIED: CutoffTable = CutoffTable {
        family: "unverified",
        revision: 1,
        provenance: Provenance::Estimated,
        cutoffs: AARCH64.cutoffs,
    };

    /// 32-bit ARM and WASM: no native acceleration, the vectorized path would
    /// only re-run the scalar algorithm.
    pub const SCALAR_ONLY: CutoffTable = CutoffTable {
        family: "scalar-only",
        revision: 1,
        provenance: Provenance::Disabled,
        cutoffs: Cutoffs::DISABLED,
    };

    /// All rows, in the order above.
    pub const ALL: [CutoffTable; 4] = [X86_64, AARCH64, UNVERIFIED, SCALAR_ONLY];
}

/// The row selected for the compilation target.
#[cfg(target_arch = "x86_64")]
pub const ACTIVE: CutoffTable = tables::X86_64;

/// The row selected for the compilation target.
#[cfg(target_arch = "aarch64")]
pub const ACTIVE: CutoffTable = tables::AARCH64;

/// The row selected for the compilation target.
#[cfg(any(target_arch = "arm", target_arch = "wasm32", target_arch = "wasm64"))]
pub const ACTIVE: CutoffTable = tables::SCALAR_ONLY;

/// The row selected for the compilation target.
#[cfg(not(any(
    target_arch = "x86_64",
    target_arch = "aarch64",
    target_arch = "arm",
    target_arch = "wasm32",
    target_arch = "wasm64"
)))]
pub const ACTIVE: CutoffTable = tables::UNVERIFIED;
