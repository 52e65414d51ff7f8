//! x86_64 SIMD implementations.
//!
//! SSE2 is part of the x86_64 baseline and is always available. AVX2 is used
//! when runtime detection is available (`std`) and the CPU reports it.

use core::arch::x86_64::*;

use crate::ascii::is_ascii_scalar;

/// Returns `true` if every byte of `input` is below 0x80.
#[inline]
pub fn is_ascii(input: &[u8]) -> bool {
    #[cfg(any(test, feature = "std"))]
    if input.len() >= 128 && is_x86_feature_detected!("avx2") {
        // SAFETY: AVX2 verified via runtime detection
        return unsafe { is_ascii_avx2(input) };
    }

    // SAFETY: SSE2 is always present on x86_64
    unsafe { is_ascii_sse2(input) }
}

/// SSE2 scan: 4 x 16 bytes per iteration, then 16 at a time, then scalar.
///
/// # Safety
///
/// CPU must support SSE2.
#[target_feature(enable = "sse2")]
unsafe fn is_ascii_sse2(input: &[u8]) -> bool {
    let len = input.len();
    let ptr = input.as_ptr();
    let mut offset = 0;

    unsafe {
        while offset + 64 <= len {
            let a = _mm_loadu_si128(ptr.add(offset) as *const __m128i);
            let b = _mm_loadu_si128(ptr.add(offset + 16) as *const __m128i);
            let c = _mm_loadu_si128(ptr.add(offset + 32) as *const __m128i);
            let d = _mm_loadu_si128(ptr.add(offset + 48) as *const __m128i);
            let any = _mm_or_si128(_mm_or_si128(a, b), _mm_or_si128(c, d));

            // movemask collects the sign bit of each byte, i.e. bit 7
            if _mm_movemask_epi8(any) != 0 {
                return false;
            }
            offset += 64;
        }

        while offset + 16 <= len {
            let v = _mm_loadu_si128(ptr.add(offset) as *const __m128i);
            if _mm_movemask_epi8(v) != 0 {
                return false;
            }
            offset += 16;
        }
    }

    is_ascii_scalar(&input[offset..])
}

/// AVX2 scan: 4 x 32 bytes per iteration, then 32 at a time, then scalar.
///
/// # Safety
///
/// CPU must support AVX2 (caller should check).
#[target_feature(enable = "avx2")]
unsafe fn is_ascii_avx2(input: &[u8]) -> bool {
    let len = input.len();
    let ptr = input.as_ptr();
    let mut offset = 0;

    unsafe {
        while offset + 128 <= len {
            let a = _mm256_loadu_si256(ptr.add(offset) as *const __m256i);
            let b = _mm256_loadu_si256(ptr.add(offset + 32) as *const __m256i);
            let c = _mm256_loadu_si256(ptr.add(offset + 64) as *const __m256i);
            let d = _mm256_loadu_si256(ptr.add(offset + 96) as *const __m256i);
            let any = _mm256_or_si256(_mm256_or_si256(a, b), _mm256_or_si256(c, d));
            if _mm256_movemask_epi8(any) != 0 {
                return false;
            }
            offset += 128;
        }

        while offset + 32 <= len {
            let v = _mm256_loadu_si256(ptr.add(offset) as *const __m256i);
            if _mm256_movemask_epi8(v) != 0 {
                return false;
            }
            offset += 32;
        }
    }

    is_ascii_scalar(&input[offset..])
}
