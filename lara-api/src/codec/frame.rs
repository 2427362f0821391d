//! Request frame headers
//!
//! Query and write frames start with the data preamble, two sequence bytes
//! and a short opcode header. Remote-control frames are six bytes with
//! their own preamble and no sequence bytes.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::codec::layout::FrameWriter;
use crate::error::Result;

/// Preamble of query and write frames
pub const QUERY_PREAMBLE: [u8; 4] = [255, 250, 250, 255];

/// Preamble of remote-control frames
pub const REMOTE_PREAMBLE: [u8; 4] = [255, 251, 251, 204];

/// Marks a configuration query (as opposed to the bare info request)
pub const CONFIG_MARKER: u8 = 192;

/// Opcodes carried after the data preamble
pub mod opcode {
    /// Basic info, directly after the `0, 128` header
    pub const INFO: u8 = 2;
    pub const SETTINGS_READ: u8 = 2;
    pub const SETTINGS_WRITE: u8 = 4;
    /// Station page reads, one opcode per page
    pub const STATION_PAGE_READ: [u8; 4] = [6, 12, 13, 14];
    pub const STATION_PAGE_WRITE: u8 = 8;
    pub const EQUALIZER_READ: u8 = 48;
    pub const EQUALIZER_WRITE: u8 = 50;
}

/// The two framing bytes that follow the preamble
///
/// The device echoes them back and otherwise ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequence {
    pub first: u8,
    pub second: u8,
}

impl Sequence {
    pub const FIRST_RANGE: RangeInclusive<u8> = 1..=125;
    pub const SECOND_RANGE: RangeInclusive<u8> = 126..=250;

    pub fn new(first: u8, second: u8) -> Self {
        Self { first, second }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            first: rng.gen_range(Self::FIRST_RANGE),
            second: rng.gen_range(Self::SECOND_RANGE),
        }
    }

    fn header(&self) -> [u8; 6] {
        let [a, b, c, d] = QUERY_PREAMBLE;
        [a, b, c, d, self.first, self.second]
    }
}

/// The 9-byte basic info request
pub fn info_request(sequence: Sequence) -> Vec<u8> {
    let mut frame = sequence.header().to_vec();
    frame.extend_from_slice(&[0, 128, opcode::INFO]);
    frame
}

/// A 10-byte configuration query
pub fn query_request(sequence: Sequence, opcode: u8) -> Vec<u8> {
    let mut frame = sequence.header().to_vec();
    frame.extend_from_slice(&[0, 128, CONFIG_MARKER, opcode]);
    frame
}

/// A zero-filled write frame of `len` bytes with its header in place
pub fn write_frame(
    frame: &'static str,
    sequence: Sequence,
    opcode: u8,
    len: usize,
) -> Result<FrameWriter> {
    let mut writer = FrameWriter::new(frame, len);
    writer.put_bytes("header", 0, &query_request(sequence, opcode))?;
    Ok(writer)
}

/// A 6-byte remote-control frame
pub fn remote_request(command: u8, param: u8) -> Vec<u8> {
    let [a, b, c, d] = REMOTE_PREAMBLE;
    vec![a, b, c, d, command, param]
}
