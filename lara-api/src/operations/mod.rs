//! Lara API operations
//!
//! One module per frame family. Each operation implements
//! [`LaraOperation`](crate::LaraOperation).

pub mod equalizer;
pub mod info;
pub mod remote;
pub mod settings;
pub mod stations;

pub use equalizer::{EqBand, Equalizer, GetEqualizerOperation, SetEqualizerOperation};
pub use info::{BasicInfo, GetBasicInfoOperation, HardwareVersion};
pub use remote::{
    OpenResult, RemoteCommand, RemoteOperation, RemoteReport, RemoteRequest, AUDIO_ZONE_LABEL,
};
pub use settings::{GetSettingsOperation, SetSettingsOperation, Settings};
pub use stations::{
    GetStationPageOperation, SetStationPageOperation, SetStationPageRequest, Station, StationPage,
    Stations,
};
