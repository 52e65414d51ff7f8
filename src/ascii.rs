//! Scalar ASCII scanning.
//!
//! Used for buffers too short to justify the fixed cost of the SIMD
//! validator. The scan reads 8 bytes per step and tests all of their high bits
//! with one OR-and-mask:
//!
//! ```text
//! word = b0 | b1 << 8 | b2 << 16 | ... | b7 << 56
//! word & 0x8080_8080_8080_8080 != 0  =>  some byte >= 0x80
//! ```
//!
//! Words are assembled from individual bytes, so the result does not depend on
//! the alignment of the slice or on the native byte order.

/// Number of bytes tested per step.
pub const WORD_BYTES: usize = 8;

/// The high bit of every byte lane.
pub const HIGH_BITS: u64 = 0x8080_8080_8080_8080;

/// Returns `true` if every byte of `input` is below 0x80.
///
/// Empty input is ASCII.
///
/// # Examples
///
/// ```
/// use adaptive_utf8::ascii::is_ascii_scalar;
///
/// assert!(is_ascii_scalar(b""));
/// assert!(is_ascii_scalar(b"plain text\n"));
/// assert!(!is_ascii_scalar("café".as_bytes()));
/// ```
#[inline]
pub fn is_ascii_scalar(input: &[u8]) -> bool {
    let mut chunks = input.chunks_exact(WORD_BYTES);

    for chunk in &mut chunks {
        if load_word(chunk) & HIGH_BITS != 0 {
            // Decide from this word alone.
            return chunk.iter().all(|&byte| byte & 0x80 == 0);
        }
    }

    chunks.remainder().iter().all(|&byte| byte & 0x80 == 0)
}

/// [`is_ascii_scalar`] for string slices.
#[inline]
pub fn is_ascii_str_scalar(input: &str) -> bool {
    is_ascii_scalar(input.as_bytes())
}

/// Pack 8 bytes into a word, byte `i` in lane `i`.
///
/// `chunk` must hold exactly [`WORD_BYTES`] bytes.
#[inline(always)]
fn load_word(chunk: &[u8]) -> u64 {
    u64::from_le_bytes([
        chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
    ])
}
