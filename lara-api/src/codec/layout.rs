//! Offset tables and bounds-checked frame access
//!
//! Every frame the radio exchanges is a fixed layout with no self-describing
//! schema. Instead of indexing buffers with magic numbers, each layout is a
//! [`Layout`]: a named, versioned list of [`Field`]s. Records that repeat
//! (stations, equalizer bands) are read and written through a base offset
//! plus the record stride.
//!
//! Read responses and write requests carry the same records, the write side
//! shifted by [`WRITE_SHIFT`] bytes, so a single table serves both
//! directions.

use std::net::Ipv4Addr;

use crate::codec::text::TextCodec;
use crate::error::{ApiError, Result};

/// Distance between a field in a read response and the same field in a
/// write request
pub const WRITE_SHIFT: usize = 34;

/// How a field is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    /// Big-endian
    U16,
    /// Big-endian, sign-extended from bit 15
    I16,
    /// Big-endian 24-bit unsigned
    U24,
    /// Four octets, most significant first
    Ipv4,
    /// UTC offset in hours, one byte, values >= 128 are negative
    Utc,
    /// NUL-terminated string of at most `max_len` bytes in a
    /// `max_len + 1` byte slot
    Text { max_len: usize },
}

impl FieldKind {
    /// Bytes occupied in a frame
    pub const fn width(&self) -> usize {
        match self {
            FieldKind::U8 | FieldKind::Utc => 1,
            FieldKind::U16 | FieldKind::I16 => 2,
            FieldKind::U24 => 3,
            FieldKind::Ipv4 => 4,
            FieldKind::Text { max_len } => *max_len + 1,
        }
    }

    /// Bytes a decoder needs to read
    ///
    /// Strings are read up to `max_len` bytes; the terminator slot may lie
    /// past the end of a short response.
    pub const fn read_width(&self) -> usize {
        match self {
            FieldKind::Text { max_len } => *max_len,
            other => other.width(),
        }
    }
}

/// One named entry of a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    /// Offset within a read response (or within one record)
    pub offset: usize,
    pub kind: FieldKind,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, kind: FieldKind) -> Self {
        Self { name, offset, kind }
    }
}

/// A named, versioned frame layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub name: &'static str,
    pub version: u8,
    pub fields: &'static [Field],
}

impl Layout {
    /// Smallest response length that holds every field when read at `base`
    pub fn read_extent(&self, base: usize) -> usize {
        self.fields
            .iter()
            .map(|f| base + f.offset + f.kind.read_width())
            .max()
            .unwrap_or(base)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// UTC byte to signed hours
pub fn decode_utc(byte: u8) -> i8 {
    if byte >= 128 {
        (i16::from(byte) - 256) as i8
    } else {
        byte as i8
    }
}

/// Signed hours to UTC byte
pub fn encode_utc(hours: i8) -> u8 {
    if hours < 0 {
        (i16::from(hours) + 256) as u8
    } else {
        hours as u8
    }
}

/// Bounds-checked reads from a response buffer
#[derive(Debug, Clone, Copy)]
pub struct FrameReader<'a> {
    frame: &'static str,
    data: &'a [u8],
    base: usize,
}

impl<'a> FrameReader<'a> {
    pub fn new(frame: &'static str, data: &'a [u8]) -> Self {
        Self {
            frame,
            data,
            base: 0,
        }
    }

    /// A reader whose field offsets are relative to `base`
    pub fn at(&self, base: usize) -> Self {
        Self { base, ..*self }
    }

    /// Fail with `TruncatedResponse` unless `layout` fits at the current base
    pub fn require(&self, layout: &Layout) -> Result<()> {
        self.require_len(layout.read_extent(self.base))
    }

    pub fn require_len(&self, needed: usize) -> Result<()> {
        if self.data.len() < needed {
            return Err(ApiError::TruncatedResponse {
                frame: self.frame,
                needed,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    fn bytes(&self, field: &Field, width: usize) -> Result<&'a [u8]> {
        let start = self.base + field.offset;
        let end = start + width;
        self.require_len(end)?;
        Ok(&self.data[start..end])
    }

    pub fn u8(&self, field: &Field) -> Result<u8> {
        Ok(self.bytes(field, 1)?[0])
    }

    pub fn u16(&self, field: &Field) -> Result<u16> {
        let b = self.bytes(field, 2)?;
        Ok(u16::from(b[0]) << 8 | u16::from(b[1]))
    }

    pub fn i16(&self, field: &Field) -> Result<i16> {
        Ok(self.u16(field)? as i16)
    }

    pub fn u24(&self, field: &Field) -> Result<u32> {
        let b = self.bytes(field, 3)?;
        Ok(u32::from(b[0]) << 16 | u32::from(b[1]) << 8 | u32::from(b[2]))
    }

    pub fn ipv4(&self, field: &Field) -> Result<Ipv4Addr> {
        let b = self.bytes(field, 4)?;
        Ok(Ipv4Addr::new(b[0], b[1], b[2], b[3]))
    }

    pub fn utc(&self, field: &Field) -> Result<i8> {
        Ok(decode_utc(self.u8(field)?))
    }

    /// Decode a string slot, stopping at the first NUL
    pub fn text(&self, field: &Field, codec: &dyn TextCodec) -> Result<String> {
        let slot = self.bytes(field, field.kind.read_width())?;
        let len = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
        Ok(codec.decode(&slot[..len]))
    }
}

/// Bounds-checked writes into a fixed-size request buffer
#[derive(Debug, Clone)]
pub struct FrameWriter {
    frame: &'static str,
    buf: Vec<u8>,
}

impl FrameWriter {
    /// A zero-filled frame of `len` bytes
    pub fn new(frame: &'static str, len: usize) -> Self {
        Self {
            frame,
            buf: vec![0u8; len],
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Write raw bytes at an absolute offset
    pub fn put_bytes(&mut self, name: &'static str, offset: usize, bytes: &[u8]) -> Result<()> {
        let end = offset + bytes.len();
        if end > self.buf.len() {
            return Err(ApiError::FrameOverflow {
                frame: self.frame,
                field: name,
                end,
                len: self.buf.len(),
            });
        }
        self.buf[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Write a field of a read layout at its write-side offset plus `base`
    fn slot(&mut self, field: &Field, base: usize, bytes: &[u8]) -> Result<()> {
        self.put_bytes(field.name, base + field.offset + WRITE_SHIFT, bytes)
    }

    pub fn u8(&mut self, field: &Field, base: usize, value: u8) -> Result<()> {
        self.slot(field, base, &[value])
    }

    pub fn u16(&mut self, field: &Field, base: usize, value: u16) -> Result<()> {
        self.slot(field, base, &value.to_be_bytes())
    }

    pub fn i16(&mut self, field: &Field, base: usize, value: i16) -> Result<()> {
        self.slot(field, base, &value.to_be_bytes())
    }

    pub fn ipv4(&mut self, field: &Field, base: usize, value: Ipv4Addr) -> Result<()> {
        self.slot(field, base, &value.octets())
    }

    pub fn utc(&mut self, field: &Field, base: usize, hours: i8) -> Result<()> {
        self.u8(field, base, encode_utc(hours))
    }

    /// Zero the whole slot, then write at most `max_len` encoded bytes
    pub fn text(
        &mut self,
        field: &Field,
        base: usize,
        text: &str,
        codec: &dyn TextCodec,
    ) -> Result<()> {
        let FieldKind::Text { max_len } = field.kind else {
            return self.slot(field, base, text.as_bytes());
        };

        self.slot(field, base, &vec![0u8; max_len + 1])?;

        let mut encoded = codec.encode(text);
        encoded.truncate(max_len);
        self.slot(field, base, &encoded)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::text::Windows1250;
    use proptest::prelude::*;

    const NAME: Field = Field::new("name", 2, FieldKind::Text { max_len: 4 });
    const LEVEL: Field = Field::new("level", 0, FieldKind::I16);

    #[test]
    fn test_i16_sign_extension() {
        assert_eq!(FrameReader::new("t", &[0xFF, 0xFF]).i16(&LEVEL).unwrap(), -1);
        assert_eq!(FrameReader::new("t", &[0x00, 0x01]).i16(&LEVEL).unwrap(), 1);
        assert_eq!(FrameReader::new("t", &[0x80, 0x00]).i16(&LEVEL).unwrap(), i16::MIN);
        assert_eq!(FrameReader::new("t", &[0x7F, 0xFF]).i16(&LEVEL).unwrap(), i16::MAX);
    }

    #[test]
    fn test_text_stops_at_first_nul_despite_garbage() {
        let data = [0, 0, b'F', b'M', 0, b'X', b'Y'];
        let reader = FrameReader::new("t", &data);
        assert_eq!(reader.text(&NAME, &Windows1250).unwrap(), "FM");
    }

    #[test]
    fn test_text_without_nul_uses_whole_read_window() {
        let data = [0, 0, b'A', b'B', b'C', b'D', b'E'];
        let reader = FrameReader::new("t", &data);
        assert_eq!(reader.text(&NAME, &Windows1250).unwrap(), "ABCD");
    }

    #[test]
    fn test_truncated_read_is_an_error() {
        let data = [0u8; 3];
        match FrameReader::new("station page", &data).u16(&Field::new("port", 2, FieldKind::U16)) {
            Err(ApiError::TruncatedResponse { frame, needed, actual }) => {
                assert_eq!(frame, "station page");
                assert_eq!(needed, 4);
                assert_eq!(actual, 3);
            }
            other => panic!("Expected TruncatedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_reader_at_base() {
        let data = [0, 0, 0, 0, 0x12, 0x34];
        let field = Field::new("port", 0, FieldKind::U16);
        assert_eq!(FrameReader::new("t", &data).at(4).u16(&field).unwrap(), 0x1234);
    }

    #[test]
    fn test_writer_zero_fills_slot_and_truncates() {
        let mut writer = FrameWriter::new("t", WRITE_SHIFT + 8);
        writer
            .put_bytes("garbage", WRITE_SHIFT + 2, &[0xAA; 5])
            .unwrap();
        writer.text(&NAME, 0, "Radio", &Windows1250).unwrap();

        let bytes = writer.into_bytes();
        let slot = &bytes[WRITE_SHIFT + 2..WRITE_SHIFT + 7];
        assert_eq!(slot, b"Radi\0");
        assert_eq!(bytes[WRITE_SHIFT + 7], 0);
    }

    #[test]
    fn test_writer_rejects_overflow() {
        let mut writer = FrameWriter::new("equalizer", WRITE_SHIFT + 1);
        match writer.u16(&LEVEL, 0, 1) {
            Err(ApiError::FrameOverflow { field, end, len, .. }) => {
                assert_eq!(field, "level");
                assert_eq!(end, WRITE_SHIFT + 2);
                assert_eq!(len, WRITE_SHIFT + 1);
            }
            other => panic!("Expected FrameOverflow, got {:?}", other),
        }
    }

    #[test]
    fn test_read_extent() {
        const FIELDS: &[Field] = &[
            Field::new("a", 0, FieldKind::U8),
            Field::new("b", 10, FieldKind::Text { max_len: 16 }),
            Field::new("c", 20, FieldKind::Ipv4),
        ];
        let layout = Layout {
            name: "test",
            version: 1,
            fields: FIELDS,
        };
        assert_eq!(layout.read_extent(0), 26);
        assert_eq!(layout.read_extent(100), 126);
        assert_eq!(layout.field("c").map(|f| f.offset), Some(20));
    }

    proptest! {
        #[test]
        fn prop_utc_decode_then_encode_is_identity(byte in any::<u8>()) {
            let decoded = decode_utc(byte);
            let expected = if byte < 128 { i16::from(byte) } else { i16::from(byte) - 256 };
            prop_assert_eq!(i16::from(decoded), expected);
            prop_assert_eq!(encode_utc(decoded), byte);
        }

        #[test]
        fn prop_i16_write_then_read(value in any::<i16>()) {
            let mut writer = FrameWriter::new("t", WRITE_SHIFT + 2);
            writer.i16(&LEVEL, 0, value).unwrap();
            let bytes = writer.into_bytes();
            let reader = FrameReader::new("t", &bytes).at(WRITE_SHIFT);
            prop_assert_eq!(reader.i16(&LEVEL).unwrap(), value);
        }
    }
}
