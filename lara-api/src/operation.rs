//! The operation trait implemented by every device command

use crate::codec::{Sequence, TextCodec};
use crate::error::Result;

/// Per-call inputs shared by frame builders and parsers
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub sequence: Sequence,
    pub codec: &'a dyn TextCodec,
}

impl<'a> FrameContext<'a> {
    pub fn new(sequence: Sequence, codec: &'a dyn TextCodec) -> Self {
        Self { sequence, codec }
    }
}

/// Base trait for all Lara operations
///
/// An operation is a stateless pair of functions: one builds the request
/// frame posted to `/data`, the other decodes the response body. Response
/// offsets are only meaningful for the frame that was sent, so each
/// operation owns both directions.
pub trait LaraOperation {
    /// Typed request data
    type Request;

    /// Typed response data
    type Response;

    /// Human-readable frame name used in errors and logs
    const NAME: &'static str;

    /// Whether the call needs a digest challenge cached by a prior sign-in
    const REQUIRES_SESSION: bool = false;

    /// Build the binary frame for `request`
    fn build_frame(request: &Self::Request, ctx: &FrameContext<'_>) -> Result<Vec<u8>>;

    /// Decode the response body
    ///
    /// Called only for `200 OK` responses.
    fn parse_response(
        request: &Self::Request,
        data: &[u8],
        ctx: &FrameContext<'_>,
    ) -> Result<Self::Response>;
}
