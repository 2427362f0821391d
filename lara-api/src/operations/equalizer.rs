//! Five-band equalizer

use serde::{Deserialize, Serialize};

use crate::codec::frame::opcode;
use crate::codec::{query_request, write_frame, Field, FieldKind, FrameReader, Layout};
use crate::error::Result;
use crate::operation::{FrameContext, LaraOperation};

pub const BAND_COUNT: usize = 5;
pub const BAND_STRIDE: usize = 18;
pub const EQUALIZER_FRAME_LEN: usize = 250;

const LEVELS: [Field; 5] = [
    Field::new("level[0]", 11, FieldKind::I16),
    Field::new("level[1]", 13, FieldKind::I16),
    Field::new("level[2]", 15, FieldKind::I16),
    Field::new("level[3]", 17, FieldKind::I16),
    Field::new("level[4]", 19, FieldKind::I16),
];

const FREQUENCIES: [Field; 4] = [
    Field::new("frequency[0]", 21, FieldKind::U16),
    Field::new("frequency[1]", 23, FieldKind::U16),
    Field::new("frequency[2]", 25, FieldKind::U16),
    Field::new("frequency[3]", 27, FieldKind::U16),
];

/// One band, offsets relative to the band base
pub const BAND_LAYOUT: Layout = Layout {
    name: "equalizer band",
    version: 1,
    fields: &[
        LEVELS[0],
        LEVELS[1],
        LEVELS[2],
        LEVELS[3],
        LEVELS[4],
        FREQUENCIES[0],
        FREQUENCIES[1],
        FREQUENCIES[2],
        FREQUENCIES[3],
    ],
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqBand {
    pub levels: [i16; 5],
    pub frequencies: [u16; 4],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equalizer {
    pub bands: [EqBand; BAND_COUNT],
}

/// GetEqualizer operation
pub struct GetEqualizerOperation;

impl LaraOperation for GetEqualizerOperation {
    type Request = ();
    type Response = Equalizer;

    const NAME: &'static str = "equalizer";

    fn build_frame(_request: &(), ctx: &FrameContext<'_>) -> Result<Vec<u8>> {
        Ok(query_request(ctx.sequence, opcode::EQUALIZER_READ))
    }

    fn parse_response(_request: &(), data: &[u8], _ctx: &FrameContext<'_>) -> Result<Equalizer> {
        let reader = FrameReader::new(Self::NAME, data);
        reader
            .at((BAND_COUNT - 1) * BAND_STRIDE)
            .require(&BAND_LAYOUT)?;

        let mut equalizer = Equalizer::default();
        for (t, band) in equalizer.bands.iter_mut().enumerate() {
            let r = reader.at(t * BAND_STRIDE);
            for (level, field) in band.levels.iter_mut().zip(&LEVELS) {
                *level = r.i16(field)?;
            }
            for (frequency, field) in band.frequencies.iter_mut().zip(&FREQUENCIES) {
                *frequency = r.u16(field)?;
            }
        }
        Ok(equalizer)
    }
}

/// SetEqualizer operation
pub struct SetEqualizerOperation;

impl LaraOperation for SetEqualizerOperation {
    type Request = Equalizer;
    type Response = ();

    const NAME: &'static str = "equalizer write";
    const REQUIRES_SESSION: bool = true;

    fn build_frame(equalizer: &Equalizer, ctx: &FrameContext<'_>) -> Result<Vec<u8>> {
        let mut w = write_frame(
            Self::NAME,
            ctx.sequence,
            opcode::EQUALIZER_WRITE,
            EQUALIZER_FRAME_LEN,
        )?;

        for (i, band) in equalizer.bands.iter().enumerate() {
            let base = i * BAND_STRIDE;
            for (level, field) in band.levels.iter().zip(&LEVELS) {
                w.i16(field, base, *level)?;
            }
            for (frequency, field) in band.frequencies.iter().zip(&FREQUENCIES) {
                w.u16(field, base, *frequency)?;
            }
        }

        Ok(w.into_bytes())
    }

    fn parse_response(_request: &Equalizer, _data: &[u8], _ctx: &FrameContext<'_>) -> Result<()> {
        Ok(())
    }
}
