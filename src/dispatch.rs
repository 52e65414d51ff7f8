//! Scalar/vectorized path selection.
//!
//! The choice depends only on the kind of check, the buffer length and the
//! cutoffs, and is made before any byte is read:
//!
//! - `len <= cutoff` -> [`Path::Scalar`]
//! - `len > cutoff` -> [`Path::Vectorized`]
//!
//! Both paths take the same borrowed slice and return the same answer, so the
//! selection is invisible to callers apart from latency.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cutoff::{Cutoffs, ACTIVE};
use crate::{ascii, simd, utf8};

/// The property being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Check {
    /// Every byte is below 0x80.
    Ascii,
    /// The buffer is well-formed UTF-8.
    Utf8,
}

impl Check {
    /// Both checks, ASCII first.
    pub const ALL: [Check; 2] = [Check::Ascii, Check::Utf8];

    /// Short lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Check::Ascii => "ascii",
            Check::Utf8 => "utf8",
        }
    }

    /// The in-process implementation of this check.
    pub const fn scalar(self) -> fn(&[u8]) -> bool {
        match self {
            Check::Ascii => ascii::is_ascii_scalar,
            Check::Utf8 => utf8::is_valid_utf8_scalar,
        }
    }

    /// The SIMD implementation of this check.
    pub const fn vectorized(self) -> fn(&[u8]) -> bool {
        match self {
            Check::Ascii => simd::is_ascii,
            Check::Utf8 => simd::is_valid_utf8,
        }
    }

    /// The implementation behind `path`.
    #[inline]
    pub const fn path(self, path: Path) -> fn(&[u8]) -> bool {
        match path {
            Path::Scalar => self.scalar(),
            Path::Vectorized => self.vectorized(),
        }
    }
}

impl core::fmt::Display for Check {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which implementation validates a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Path {
    /// In-process scan.
    Scalar,
    /// SIMD validator.
    Vectorized,
}

/// Choose the path for a `len`-byte buffer.
///
/// # Examples
///
/// ```
/// use adaptive_utf8::{select_path, Check, Cutoffs, Path};
///
/// let cutoffs = Cutoffs::new(1024, 32);
/// assert_eq!(select_path(Check::Utf8, 32, &cutoffs), Path::Scalar);
/// assert_eq!(select_path(Check::Utf8, 33, &cutoffs), Path::Vectorized);
/// assert_eq!(select_path(Check::Ascii, 0, &Cutoffs::DISABLED), Path::Scalar);
/// assert_eq!(select_path(Check::Ascii, usize::MAX, &Cutoffs::DISABLED), Path::Scalar);
/// ```
#[inline]
pub const fn select_path(check: Check, len: usize, cutoffs: &Cutoffs) -> Path {
    if len <= cutoffs.for_check(check) {
        Path::Scalar
    } else {
        Path::Vectorized
    }
}

/// Run `check` on `input` with explicit cutoffs.
#[inline]
pub fn validate_with(check: Check, input: &[u8], cutoffs: &Cutoffs) -> bool {
    // Empty input is valid for both checks, on either path.
    if input.is_empty() {
        return true;
    }

    match (check, select_path(check, input.len(), cutoffs)) {
        (Check::Ascii, Path::Scalar) => ascii::is_ascii_scalar(input),
        (Check::Ascii, Path::Vectorized) => simd::is_ascii(input),
        (Check::Utf8, Path::Scalar) => utf8::is_valid_utf8_scalar(input),
        (Check::Utf8, Path::Vectorized) => simd::is_valid_utf8(input),
    }
}

/// Run `check` on `input` with the cutoffs of the compilation target.
#[inline]
pub fn validate(check: Check, input: &[u8]) -> bool {
    validate_with(check, input, &ACTIVE.cutoffs)
}

/// Returns `true` if every byte of `input` is ASCII (below 0x80).
///
/// # Examples
///
/// ```
/// use adaptive_utf8::is_ascii;
///
/// assert!(is_ascii(b""));
/// assert!(is_ascii(&[b'#'; 4096]));
/// assert!(!is_ascii("brэд".as_bytes()));
/// ```
#[inline]
pub fn is_ascii(input: &[u8]) -> bool {
    validate(Check::Ascii, input)
}

/// [`is_ascii`] for string slices.
#[inline]
pub fn is_ascii_str(input: &str) -> bool {
    is_ascii(input.as_bytes())
}

/// Returns `true` if `input` is well-formed UTF-8.
///
/// # Examples
///
/// ```
/// use adaptive_utf8::is_valid_utf8;
///
/// assert!(is_valid_utf8(b""));
/// assert!(is_valid_utf8("☺☻☹".as_bytes()));
/// assert!(!is_valid_utf8(&[0xED, 0xA0, 0x80])); // U+D800
/// ```
#[inline]
pub fn is_valid_utf8(input: &[u8]) -> bool {
    validate(Check::Utf8, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cutoff::tables;

    mod selection {
        use super::*;

        #[test]
        fn boundary_is_inclusive() {
            let cutoffs = Cutoffs::new(8, 16);
            assert_eq!(select_path(Check::Ascii, 8, &cutoffs), Path::Scalar);
            assert_eq!(select_path(Check::Ascii, 9, &cutoffs), Path::Vectorized);
            assert_eq!(select_path(Check::Utf8, 16, &cutoffs), Path::Scalar);
            assert_eq!(select_path(Check::Utf8, 17, &cutoffs), Path::Vectorized);
        }

        #[test]
        fn checks_use_their_own_cutoff() {
            let cutoffs = Cutoffs::new(100, 10);
            assert_eq!(select_path(Check::Ascii, 50, &cutoffs), Path::Scalar);
            assert_eq!(select_path(Check::Utf8, 50, &cutoffs), Path::Vectorized);
        }

        #[test]
        fn empty_always_scalar() {
            for table in tables::ALL {
                for check in Check::ALL {
                    assert_eq!(select_path(check, 0, &table.cutoffs), Path::Scalar);
                }
            }
        }

        #[test]
        fn disabled_never_vectorized() {
            for len in [0, 1, 1 << 20, usize::MAX - 1, usize::MAX] {
                for check in Check::ALL {
                    assert_eq!(select_path(check, len, &Cutoffs::DISABLED), Path::Scalar);
                }
            }
        }

        #[test]
        fn zero_cutoff_vectorizes_everything_nonempty() {
            let cutoffs = Cutoffs::new(0, 0);
            assert_eq!(select_path(Check::Ascii, 1, &cutoffs), Path::Vectorized);
            assert!(validate_with(Check::Ascii, b"", &cutoffs));
            assert!(validate_with(Check::Utf8, b"", &cutoffs));
        }
    }

    mod entry_points {
        use super::*;

        #[test]
        fn empty_input() {
            assert!(is_ascii(b""));
            assert!(is_ascii_str(""));
            assert!(is_valid_utf8(b""));
            for path in [Path::Scalar, Path::Vectorized] {
                for check in Check::ALL {
                    assert!(check.path(path)(&b""[..]), "{} {:?}", check, path);
                }
            }
        }

        #[test]
        fn both_paths_agree_across_cutoffs() {
            let text = "Ж☺ ascii 日本語 🎉".repeat(200);
            for table in tables::ALL {
                for check in Check::ALL {
                    let cutoff = table.cutoffs.for_check(check).min(2048);
                    let lo = cutoff.saturating_sub(9);
                    for len in lo..=cutoff + 9 {
                        let input = &text.as_bytes()[..len];
                        let expected = check.scalar()(input);
                        assert_eq!(check.vectorized()(input), expected, "{} len {}", check, len);
                        assert_eq!(
                            validate_with(check, input, &table.cutoffs),
                            expected,
                            "{} {} len {}",
                            table.family,
                            check,
                            len
                        );
                    }
                }
            }
        }

        #[test]
        fn ascii_str_matches_bytes() {
            assert!(is_ascii_str(&"x".repeat(5000)));
            assert!(!is_ascii_str(&format!("{}é", "x".repeat(5000))));
        }

        #[test]
        fn check_names() {
            assert_eq!(Check::Ascii.to_string(), "ascii");
            assert_eq!(Check::Utf8.to_string(), "utf8");
        }
    }
}
