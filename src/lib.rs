//! # adaptive-utf8
//!
//! ASCII and UTF-8 validation that picks, per call, between an in-process
//! scalar check and a SIMD validator.
//!
//! The SIMD validator has a fixed per-call cost that only pays off once the
//! buffer is long enough. The crossover length differs by CPU family, so each
//! supported architecture carries its own measured cutoffs, and the
//! [`calibrate`] module (behind the `calibrate` feature) re-derives them on the
//! machine it runs on.
//!
//! ## Module Organization
//!
//! - [`ascii`] - Word-at-a-time scalar ASCII scanner
//! - [`utf8`] - Scalar UTF-8 validation (strict RFC 3629)
//! - [`simd`] - Vectorized validators (SSE2/AVX2, NEON, portable fallback)
//! - [`cutoff`] - Per-architecture cutoff tables
//! - [`dispatch`] - Path selection and the public entry points
//! - [`calibrate`] - Empirical cutoff discovery (feature `calibrate`)
//!
//! ## Quick Start
//!
//! ```
//! use adaptive_utf8::{is_ascii, is_valid_utf8};
//!
//! assert!(is_ascii(b"Hello, world!"));
//! assert!(!is_ascii("日本語".as_bytes()));
//!
//! assert!(is_valid_utf8("日本語".as_bytes()));
//! assert!(!is_valid_utf8(&[0xC0, 0x80])); // overlong NUL
//!
//! // Empty input is both ASCII and UTF-8
//! assert!(is_ascii(b""));
//! assert!(is_valid_utf8(b""));
//! ```
//!
//! ## Features
//!
//! - `std` (default) - Runtime CPU feature detection (AVX2 on x86_64)
//! - `calibrate` - Calibration procedure for the cutoff table
//! - `serde` - Enable serialization/deserialization support
//! - `cli` - The `adaptive-utf8` command line tool

// Use no_std unless std feature is enabled or we're in test mode
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// =============================================================================
// Scalar paths
// =============================================================================

/// Word-at-a-time scalar ASCII scanner.
pub mod ascii;

/// Scalar UTF-8 validation.
pub mod utf8;

// =============================================================================
// Vectorized path and dispatch
// =============================================================================

/// SIMD-accelerated validators.
pub mod simd;

/// Per-architecture cutoff tables.
pub mod cutoff;

/// Scalar/vectorized path selection.
pub mod dispatch;

/// Empirical cutoff calibration.
#[cfg(feature = "calibrate")]
pub mod calibrate;

// =============================================================================
// Public re-exports
// =============================================================================

pub use cutoff::{CutoffTable, Cutoffs, Provenance, ACTIVE};
pub use dispatch::{
    is_ascii, is_ascii_str, is_valid_utf8, select_path, validate, validate_with, Check, Path,
};
