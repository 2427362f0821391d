//! Byte/text conversion for string slots
//!
//! The radio stores every string in a single-byte legacy code page. The
//! factory firmware uses Windows-1250 (Central European), which is what
//! [`Windows1250`] implements. Other firmware builds can be supported by
//! handing a different [`TextCodec`] to the client configuration.

use encoding_rs::WINDOWS_1250;

/// Reversible conversion between text and the device's single-byte encoding
pub trait TextCodec: Send + Sync + std::fmt::Debug {
    /// Encode `text`, one byte per character
    ///
    /// Characters the code page cannot represent become `?`.
    fn encode(&self, text: &str) -> Vec<u8>;

    /// Decode bytes that contain no NUL
    fn decode(&self, bytes: &[u8]) -> String;
}

/// The Windows-1250 code page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Windows1250;

impl TextCodec for Windows1250 {
    fn encode(&self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        let mut utf8 = [0u8; 4];

        for c in text.chars() {
            let (bytes, _, had_errors) = WINDOWS_1250.encode(c.encode_utf8(&mut utf8));
            if had_errors || bytes.len() != 1 {
                out.push(b'?');
            } else {
                out.push(bytes[0]);
            }
        }
        out
    }

    fn decode(&self, bytes: &[u8]) -> String {
        let (text, _) = WINDOWS_1250.decode_without_bom_handling(bytes);
        text.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Radio 1", b"Radio 1".to_vec())]
    #[case("Český rozhlas", vec![0xC8, b'e', b's', b'k', 0xFD, b' ', b'r', b'o', b'z', b'h', b'l', b'a', b's'])]
    #[case("Łódź", vec![0xA3, 0xF3, b'd', 0x9F])]
    fn test_round_trip(#[case] text: &str, #[case] bytes: Vec<u8>) {
        assert_eq!(Windows1250.encode(text), bytes);
        assert_eq!(Windows1250.decode(&bytes), text);
    }

    #[test]
    fn test_unmappable_characters_become_question_marks() {
        assert_eq!(Windows1250.encode("FM 日本"), b"FM ??".to_vec());
    }

    #[test]
    fn test_encoding_is_one_byte_per_char() {
        let text = "Žluťoučký kůň";
        assert_eq!(Windows1250.encode(text).len(), text.chars().count());
    }
}
