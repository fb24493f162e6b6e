//! Character sets for telegram text fields.
//!
//! Legacy interchange formats are frequently not UTF-8, so byte/text
//! conversion is pluggable: a [`Charset`] is a copyable table of conversion
//! functions plus the fill byte used when padding fixed-width fields.
//! Decoding is lossy by contract. Undecodable bytes become replacement
//! characters and never abort a telegram.

use core::fmt;

/// Byte/text conversion for a telegram's character set.
///
/// Built-in sets cover [`Charset::UTF_8`] (the default) and
/// [`Charset::ASCII`]. Legacy encodings (EBCDIC variants, national code
/// pages) can be supplied with [`Charset::custom`].
#[derive(Clone, Copy)]
pub struct Charset {
    name: &'static str,
    decoder: fn(&[u8]) -> String,
    encoder: fn(&str) -> Vec<u8>,
    space: u8,
}

impl Charset {
    /// UTF-8 with lossy decoding.
    pub const UTF_8: Charset = Charset {
        name: "UTF-8",
        decoder: decode_utf8,
        encoder: encode_utf8,
        space: b' ',
    };

    /// US-ASCII. Non-ASCII input decodes to the replacement character and
    /// non-ASCII output encodes as `?`.
    pub const ASCII: Charset = Charset {
        name: "US-ASCII",
        decoder: decode_ascii,
        encoder: encode_ascii,
        space: b' ',
    };

    /// Builds a charset from user-supplied conversion functions.
    ///
    /// `space` is the single fill byte used for padding. Encodings whose
    /// space character is wider than one byte are not supported.
    pub const fn custom(
        name: &'static str,
        decoder: fn(&[u8]) -> String,
        encoder: fn(&str) -> Vec<u8>,
        space: u8,
    ) -> Self {
        Self {
            name,
            decoder,
            encoder,
            space,
        }
    }

    /// Canonical name of this charset.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Decodes raw bytes to text. Lossy, never fails.
    pub fn decode(&self, bytes: &[u8]) -> String {
        (self.decoder)(bytes)
    }

    /// Encodes text to raw bytes.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        (self.encoder)(text)
    }

    /// The fill byte used when padding fixed-width fields.
    pub fn space(&self) -> u8 {
        self.space
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::UTF_8
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Charset").field(&self.name).finish()
    }
}

fn decode_utf8(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn encode_utf8(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

fn decode_ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b.is_ascii() {
                b as char
            } else {
                char::REPLACEMENT_CHARACTER
            }
        })
        .collect()
}

fn encode_ascii(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_lossy_decode() {
        assert_eq!(Charset::UTF_8.decode(b"caf\xc3\xa9"), "caf\u{e9}");
        assert_eq!(Charset::UTF_8.decode(b"caf\xff"), "caf\u{fffd}");
    }

    #[test]
    fn test_ascii_replacement() {
        assert_eq!(Charset::ASCII.decode(b"ok\x80"), "ok\u{fffd}");
        assert_eq!(Charset::ASCII.encode("ok\u{e9}"), b"ok?");
    }

    #[test]
    fn test_custom_charset() {
        fn upper(bytes: &[u8]) -> String {
            bytes.iter().map(|b| (*b as char).to_ascii_uppercase()).collect()
        }
        fn lower(text: &str) -> Vec<u8> {
            text.to_ascii_lowercase().into_bytes()
        }
        let cs = Charset::custom("SHOUT", upper, lower, b'_');
        assert_eq!(cs.decode(b"abc"), "ABC");
        assert_eq!(cs.encode("ABC"), b"abc");
        assert_eq!(cs.space(), b'_');
        assert_eq!(cs.name(), "SHOUT");
    }
}
