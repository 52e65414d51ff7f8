//! Scalar UTF-8 validation.
//!
//! The scalar path delegates to the core library's validator, which enforces
//! the strict RFC 3629 rules:
//!
//! | Bytes | First byte    | Continuation bytes | Code point range     |
//! |-------|---------------|-------------------|----------------------|
//! | 1     | `0xxxxxxx`    | -                 | U+0000 - U+007F      |
//! | 2     | `110xxxxx`    | `10xxxxxx`        | U+0080 - U+07FF      |
//! | 3     | `1110xxxx`    | `10xxxxxx` × 2    | U+0800 - U+FFFF      |
//! | 4     | `11110xxx`    | `10xxxxxx` × 3    | U+10000 - U+10FFFF   |
//!
//! Rejected: bare continuation bytes, lead bytes 0xC0, 0xC1 and 0xF5-0xFF,
//! overlong encodings, surrogates (U+D800-U+DFFF), code points above
//! U+10FFFF, and sequences truncated by the end of the buffer.
//!
//! This is the reference the vectorized path is tested against.

/// Returns `true` if `input` is well-formed UTF-8.
///
/// # Examples
///
/// ```
/// use adaptive_utf8::utf8::is_valid_utf8_scalar;
///
/// assert!(is_valid_utf8_scalar(b""));
/// assert!(is_valid_utf8_scalar("émoji: 🎉".as_bytes()));
///
/// // Invalid: bare continuation byte
/// assert!(!is_valid_utf8_scalar(&[0x80]));
///
/// // Invalid: truncated sequence
/// assert!(!is_valid_utf8_scalar(&[0x61, 0x61, 0xE2]));
/// ```
#[inline]
pub fn is_valid_utf8_scalar(input: &[u8]) -> bool {
    core::str::from_utf8(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Valid UTF-8
    // =========================================================================

    mod valid_utf8 {
        use super::*;

        #[test]
        fn empty_input() {
            assert!(is_valid_utf8_scalar(b""));
        }

        #[test]
        fn ascii_single_byte() {
            for byte in 0x00..=0x7F {
                assert!(
                    is_valid_utf8_scalar(&[byte]),
                    "ASCII byte 0x{:02X} should be valid",
                    byte
                );
            }
        }

        #[test]
        fn multi_byte_text() {
            assert!(is_valid_utf8_scalar("Ж".as_bytes()));
            assert!(is_valid_utf8_scalar("ЖЖ".as_bytes()));
            assert!(is_valid_utf8_scalar("брэд-ЛГТМ".as_bytes()));
            assert!(is_valid_utf8_scalar("☺☻☹".as_bytes()));
            assert!(is_valid_utf8_scalar("a\u{FFFD}b".as_bytes()));
            assert!(is_valid_utf8_scalar("Hello! 你好 مرحبا 🌍🚀 Ñoño café".as_bytes()));
        }

        #[test]
        fn boundary_code_points() {
            // First code point of each length
            assert!(is_valid_utf8_scalar(&[0x00])); // U+0000
            assert!(is_valid_utf8_scalar(&[0xC2, 0x80])); // U+0080
            assert!(is_valid_utf8_scalar(&[0xE0, 0xA0, 0x80])); // U+0800
            assert!(is_valid_utf8_scalar(&[0xF0, 0x90, 0x80, 0x80])); // U+10000

            // Last code point of each length
            assert!(is_valid_utf8_scalar(&[0x7F])); // U+007F
            assert!(is_valid_utf8_scalar(&[0xDF, 0xBF])); // U+07FF
            assert!(is_valid_utf8_scalar(&[0xEF, 0xBF, 0xBF])); // U+FFFF
            assert!(is_valid_utf8_scalar(&[0xF4, 0x8F, 0xBF, 0xBF])); // U+10FFFF
        }

        #[test]
        fn around_surrogates() {
            assert!(is_valid_utf8_scalar(&[0xED, 0x9F, 0xBF])); // U+D7FF
            assert!(is_valid_utf8_scalar(&[0xEE, 0x80, 0x80])); // U+E000
        }
    }

    // =========================================================================
    // Invalid UTF-8
    // =========================================================================

    mod invalid_utf8 {
        use super::*;

        #[test]
        fn continuation_byte_as_lead() {
            for byte in 0x80..=0xBF {
                assert!(
                    !is_valid_utf8_scalar(&[byte]),
                    "byte 0x{:02X} should be invalid as lead",
                    byte
                );
            }
        }

        #[test]
        fn never_valid_lead_bytes() {
            for byte in [0xC0, 0xC1, 0xF5, 0xF8, 0xFB, 0xFE, 0xFF] {
                assert!(!is_valid_utf8_scalar(&[byte, 0x80, 0x80, 0x80]));
            }
            assert!(!is_valid_utf8_scalar(&[66, 250]));
            assert!(!is_valid_utf8_scalar(&[66, 250, 67]));
        }

        #[test]
        fn missing_continuation() {
            assert!(!is_valid_utf8_scalar(&[0xC2, b'A']));
            assert!(!is_valid_utf8_scalar(&[0xE0, 0xA0, b'A']));
            assert!(!is_valid_utf8_scalar(&[0xF0, 0x90, 0x80, b'A']));
        }

        #[test]
        fn overlong() {
            assert!(!is_valid_utf8_scalar(&[0xC0, 0x80])); // U+0000
            assert!(!is_valid_utf8_scalar(&[0xC1, 0x81])); // 'A'
            assert!(!is_valid_utf8_scalar(&[0xE0, 0x80, 0x80])); // U+0000
            assert!(!is_valid_utf8_scalar(&[0xE0, 0x9F, 0xBF])); // U+07FF
            assert!(!is_valid_utf8_scalar(&[0xF0, 0x8F, 0xBF, 0xBF])); // U+FFFF
            assert!(!is_valid_utf8_scalar(&[0xC0, 0xAF])); // '/'
        }

        #[test]
        fn surrogates() {
            assert!(!is_valid_utf8_scalar(&[0xED, 0xA0, 0x80])); // U+D800
            assert!(!is_valid_utf8_scalar(&[0xED, 0xAF, 0xBF])); // U+DBFF
            assert!(!is_valid_utf8_scalar(&[0xED, 0xB0, 0x80])); // U+DC00
            assert!(!is_valid_utf8_scalar(&[0xED, 0xBF, 0xBF])); // U+DFFF
        }

        #[test]
        fn out_of_range() {
            assert!(!is_valid_utf8_scalar(&[0xF4, 0x90, 0x80, 0x80])); // U+110000
            assert!(!is_valid_utf8_scalar(&[0xF7, 0xBF, 0xBF, 0xBF])); // 0x1FFFFF
            assert!(!is_valid_utf8_scalar(&[0xFB, 0xBF, 0xBF, 0xBF, 0xBF])); // 0x3FFFFFF
        }

        #[test]
        fn truncated() {
            assert!(!is_valid_utf8_scalar(&[0xC2]));
            assert!(!is_valid_utf8_scalar(&[0xE0, 0xA0]));
            assert!(!is_valid_utf8_scalar(&[0xF0, 0x90, 0x80]));
            assert!(!is_valid_utf8_scalar(b"aa\xE2"));
        }
    }
}
