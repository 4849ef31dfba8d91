//! Hex codec for APDU field text
//!
//! Converts between byte values/buffers and their textual hexadecimal
//! representation, and validates hex character input. Canonical output is
//! always uppercase; input is accepted case-insensitively.

use bytes::Bytes;

use crate::error::Error;

/// Convert a byte to its two-character uppercase hex representation
///
/// Total over the byte range: `0x0A` becomes `"0A"`.
pub fn byte_to_hex(value: u8) -> String {
    format!("{value:02X}")
}

/// Parse exactly two hex characters into a byte
///
/// Fails with [`Error::InvalidFormat`] for empty, too short, too long or
/// non-hex input.
pub fn hex_to_byte(text: &str) -> Result<u8, Error> {
    if text.len() != 2 || !is_valid_hex_digits(text) {
        return Err(Error::InvalidFormat("expected exactly two hex digits"));
    }

    u8::from_str_radix(text, 16).map_err(|_| Error::InvalidFormat("expected exactly two hex digits"))
}

/// Convert a byte buffer to its uppercase hex representation, no separators
///
/// Empty input yields empty text.
pub fn buffer_to_hex(data: &[u8]) -> String {
    hex::encode_upper(data)
}

/// Decode a hex string into a byte buffer
///
/// ASCII whitespace is stripped first. If the remaining length is odd, the
/// single trailing character is discarded before decoding; this data loss is
/// inherited from the legacy text format. Decoding is fail-fast: any invalid
/// two-character group fails the whole call with [`Error::InvalidFormat`].
pub fn hex_to_buffer(text: &str) -> Result<Bytes, Error> {
    let mut stripped: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    if stripped.chars().count() % 2 != 0 {
        stripped.pop();
    }

    hex::decode(&stripped)
        .map(Bytes::from)
        .map_err(|_| Error::InvalidFormat("invalid hex digits in buffer"))
}

/// Check that every character is a hex digit (`0-9`, `A-F`, `a-f`)
///
/// Vacuously true for empty text.
pub fn is_valid_hex_digits(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_hexdigit())
}
