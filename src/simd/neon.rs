//! ARM NEON SIMD implementations.
//!
//! NEON is mandatory on aarch64, so no runtime detection is needed.

use core::arch::aarch64::*;

use crate::ascii::is_ascii_scalar;

/// Returns `true` if every byte of `input` is below 0x80.
#[inline]
pub fn is_ascii(input: &[u8]) -> bool {
    // SAFETY: NEON is always available on aarch64
    unsafe { is_ascii_neon(input) }
}

/// NEON scan: 4 x 16 bytes per iteration, then 16 at a time, then scalar.
///
/// # Safety
///
/// CPU must support NEON.
#[target_feature(enable = "neon")]
unsafe fn is_ascii_neon(input: &[u8]) -> bool {
    let len = input.len();
    let ptr = input.as_ptr();
    let mut offset = 0;

    unsafe {
        while offset + 64 <= len {
            let a = vld1q_u8(ptr.add(offset));
            let b = vld1q_u8(ptr.add(offset + 16));
            let c = vld1q_u8(ptr.add(offset + 32));
            let d = vld1q_u8(ptr.add(offset + 48));
            let any = vorrq_u8(vorrq_u8(a, b), vorrq_u8(c, d));

            // Horizontal max: >= 0x80 iff some lane has bit 7 set
            if vmaxvq_u8(any) >= 0x80 {
                return false;
            }
            offset += 64;
        }

        while offset + 16 <= len {
            if vmaxvq_u8(vld1q_u8(ptr.add(offset))) >= 0x80 {
                return false;
            }
            offset += 16;
        }
    }

    is_ascii_scalar(&input[offset..])
}
