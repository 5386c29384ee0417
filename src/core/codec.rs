//! Reversible obfuscation of dataset payloads
//!
//! Two layers, applied in this order on encode and reversed on decode:
//!
//! 1. A keyed substitution over three character classes: `A-Z` and `a-z`
//!    rotate by 13, `0-9` rotates by 5. Everything else, including
//!    non-ASCII text, passes through unchanged. The substitution is its own
//!    inverse.
//! 2. An optional base64 armor layer for transport.
//!
//! This keeps casual scrapers away from the raw file. It is not encryption.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::core::error::DecodeError;

/// Apply the substitution to a single character
fn substitute_char(c: char) -> char {
    match c {
        'A'..='Z' => rotate(c, b'A', 26, 13),
        'a'..='z' => rotate(c, b'a', 26, 13),
        '0'..='9' => rotate(c, b'0', 10, 5),
        _ => c,
    }
}

fn rotate(c: char, base: u8, modulus: u8, shift: u8) -> char {
    // Callers only pass ASCII characters
    let offset = c as u8 - base;
    char::from(base + (offset + shift) % modulus)
}

/// Apply the substitution layer
///
/// `substitute(substitute(x)) == x` for every string.
pub fn substitute(text: &str) -> String {
    text.chars().map(substitute_char).collect()
}

/// Codec for encoded dataset blobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    armor: bool,
}

impl Codec {
    /// Create a codec; `armor` enables the base64 layer
    pub fn new(armor: bool) -> Self {
        Self { armor }
    }

    /// Substitution only, no base64 layer
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Whether the base64 layer is enabled
    pub fn is_armored(&self) -> bool {
        self.armor
    }

    /// Encode text into its blob form
    pub fn encode(&self, text: &str) -> String {
        let substituted = substitute(text);
        if self.armor {
            STANDARD.encode(substituted.as_bytes())
        } else {
            substituted
        }
    }

    /// Decode a blob back into text
    ///
    /// ASCII whitespace around and inside the armor is ignored, so blobs
    /// wrapped over several lines decode the same as single-line ones.
    pub fn decode(&self, blob: &str) -> Result<String, DecodeError> {
        if !self.armor {
            return Ok(substitute(blob));
        }

        let compact: String = blob.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| DecodeError::Armor(e.to_string()))?;
        let text = String::from_utf8(bytes).map_err(|e| DecodeError::Utf8(e.to_string()))?;

        Ok(substitute(&text))
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(true)
    }
}
