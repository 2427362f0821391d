//! Binary frame codec
//!
//! Pure encode/decode helpers shared by every operation. Nothing in here
//! performs I/O.

pub mod frame;
pub mod layout;
pub mod text;

pub use frame::{info_request, query_request, remote_request, write_frame, Sequence};
pub use layout::{decode_utc, encode_utc, Field, FieldKind, FrameReader, FrameWriter, Layout, WRITE_SHIFT};
pub use text::{TextCodec, Windows1250};
