//! Dual display/parsed field state
//!
//! Each command field keeps the raw text the caller typed alongside the last
//! successfully parsed value. Partial or invalid text is retained for display
//! but never overwrites the parsed value used for transmission.

use bytes::Bytes;
use cardlab_apdu_core::hex;

/// A byte-valued field edited as two-character hex text
#[derive(Debug, Clone)]
pub struct ByteField {
    text: String,
    value: u8,
}

impl ByteField {
    /// Create a field holding the given byte, displayed as uppercase hex
    pub fn new(value: u8) -> Self {
        Self {
            text: hex::byte_to_hex(value),
            value,
        }
    }

    /// Store new display text
    ///
    /// The parsed byte is updated only when the text is exactly two valid
    /// hex digits. Returns whether the parse succeeded.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        self.text = text.into();
        match hex::hex_to_byte(&self.text) {
            Ok(value) => {
                self.value = value;
                true
            }
            Err(_) => false,
        }
    }

    /// The raw display text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The last successfully parsed byte
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Whether the display text is exactly two valid hex digits
    pub fn is_valid(&self) -> bool {
        self.text.len() == 2 && hex::is_valid_hex_digits(&self.text)
    }
}

/// A buffer-valued field edited as even-length hex text
#[derive(Debug, Clone)]
pub struct DataField {
    text: String,
    value: Bytes,
}

impl DataField {
    /// Create a field holding the given buffer, displayed as uppercase hex
    pub fn new(value: Bytes) -> Self {
        Self {
            text: hex::buffer_to_hex(&value),
            value,
        }
    }

    /// Store new display text
    ///
    /// The parsed buffer is updated only when the text is valid: even length
    /// (zero included) and all valid hex digits. Returns whether it was.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        self.text = text.into();
        if !self.is_valid() {
            return false;
        }
        match hex::hex_to_buffer(&self.text) {
            Ok(value) => {
                self.value = value;
                true
            }
            Err(_) => false,
        }
    }

    /// The raw display text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The last successfully parsed buffer
    pub const fn value(&self) -> &Bytes {
        &self.value
    }

    /// Whether the display text has even length and only valid hex digits
    pub fn is_valid(&self) -> bool {
        self.text.len() % 2 == 0 && hex::is_valid_hex_digits(&self.text)
    }
}

/// A byte-valued field edited as decimal text
///
/// The expected-length field is decimal in the exchange surface, an
/// asymmetry inherited from the legacy format.
#[derive(Debug, Clone)]
pub struct DecimalField {
    text: String,
    value: u8,
}

impl DecimalField {
    /// Create a field holding the given byte, displayed as decimal
    pub fn new(value: u8) -> Self {
        Self {
            text: value.to_string(),
            value,
        }
    }

    /// Store new display text
    ///
    /// The parsed byte is updated only when the text is a decimal value in
    /// 0-255. Returns whether the parse succeeded.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        self.text = text.into();
        match self.text.parse::<u8>() {
            Ok(value) => {
                self.value = value;
                true
            }
            Err(_) => false,
        }
    }

    /// The raw display text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The last successfully parsed byte
    pub const fn value(&self) -> u8 {
        self.value
    }
}
