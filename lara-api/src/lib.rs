//! Type-safe client for the Elko Lara radio
//!
//! The radio is controlled with fixed-layout binary frames posted to its
//! `/data` endpoint behind RFC 2069 digest authentication. This crate wraps
//! the private `http-client` crate and exposes each frame family as an
//! operation:
//!
//! - basic info and settings
//! - station pages and the full station list
//! - the five-band equalizer
//! - remote control (play, stop, volume, mute, next/previous station)
//!
//! [`LaraClient`] is the entry point. Lower-level pieces ([`codec`],
//! [`operations`], [`LaraOperation`]) are public for callers that want to
//! build or inspect frames themselves.

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod operation;
pub mod operations;
pub mod session;

pub use client::LaraClient;
pub use codec::{TextCodec, Windows1250};
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use operation::{FrameContext, LaraOperation};
pub use operations::{
    BasicInfo, EqBand, Equalizer, HardwareVersion, OpenResult, RemoteCommand, Settings, Station,
    StationPage, Stations,
};
pub use session::Session;

pub use http_client::{BodyReader, EofReader, ShortReadReader, Transport, TransportConfig};
