//! Vectorized ASCII and UTF-8 validation.
//!
//! These are the high-throughput paths. Each call pays a fixed setup cost
//! (feature detection, vector loads, the tail of the buffer handled
//! separately), which is why the dispatcher only routes buffers longer than
//! the architecture's cutoff here.
//!
//! On x86_64, SSE2 (or AVX2 when detected at runtime) scans 64-128 bytes per
//! iteration. On ARM, NEON scans 64 bytes per iteration. UTF-8 validation is
//! provided by `simdutf8`, which selects its own implementation per CPU.
//!
//! Every function here has the scalar signature `fn(&[u8]) -> bool` and must
//! return exactly what the scalar path returns for the same input.

#[cfg(target_arch = "x86_64")]
pub mod x86;

#[cfg(target_arch = "aarch64")]
pub mod neon;

#[cfg(target_arch = "x86_64")]
pub use x86::is_ascii;

#[cfg(target_arch = "aarch64")]
pub use neon::is_ascii;

/// Returns `true` if every byte of `input` is below 0x80.
///
/// Fallback for platforms without a hand-written SIMD scan (e.g., 32-bit x86,
/// RISC-V, WASM). The core library's check is already word-parallel there.
#[cfg(not(any(target_arch = "aarch64", target_arch = "x86_64")))]
#[inline]
pub fn is_ascii(input: &[u8]) -> bool {
    input.is_ascii()
}

/// Returns `true` if `input` is well-formed UTF-8.
#[inline]
pub fn is_valid_utf8(input: &[u8]) -> bool {
    simdutf8::basic::from_utf8(input).is_ok()
}
