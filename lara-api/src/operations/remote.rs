//! Remote-control commands
//!
//! Remote frames are six bytes: the remote preamble, a command byte and one
//! parameter. The response is a short status record whose meaning depends
//! on the command that was sent.

use serde::{Deserialize, Serialize};

use crate::codec::{remote_request, Field, FieldKind, FrameReader};
use crate::error::{ApiError, Result};
use crate::operation::{FrameContext, LaraOperation};
use crate::operations::stations::Stations;

/// Label reported while the radio plays the audio zone input
pub const AUDIO_ZONE_LABEL: &str = "Audio zone";

const MAX_VOLUME: u8 = 100;

/// Source value meaning the audio zone is playing
const SOURCE_AUDIO_ZONE: u8 = 3;

const STATUS: Field = Field::new("status", 0, FieldKind::U8);
const SOURCE: Field = Field::new("source", 1, FieldKind::U8);
const STATION: Field = Field::new("station", 2, FieldKind::U8);
const VOLUME: Field = Field::new("volume", 3, FieldKind::U8);
const MUTE: Field = Field::new("mute", 4, FieldKind::U8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteCommand {
    Play,
    Stop,
    SetVolume,
    ToggleMute,
    NextStation,
    PreviousStation,
}

impl RemoteCommand {
    pub fn opcode(&self) -> u8 {
        match self {
            Self::Play => 3,
            Self::Stop => 4,
            Self::SetVolume => 5,
            Self::ToggleMute => 9,
            Self::NextStation => 10,
            Self::PreviousStation => 11,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteRequest {
    pub command: RemoteCommand,
    pub param: u8,
}

impl RemoteRequest {
    pub fn new(command: RemoteCommand) -> Self {
        Self { command, param: 0 }
    }

    pub fn set_volume(volume: u8) -> Result<Self> {
        if volume > MAX_VOLUME {
            return Err(ApiError::range_error(
                "volume",
                volume,
                0,
                i64::from(MAX_VOLUME),
            ));
        }
        Ok(Self {
            command: RemoteCommand::SetVolume,
            param: volume,
        })
    }
}

/// Decoded remote response before station labels are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteReport {
    pub command: RemoteCommand,
    pub audio_zone: bool,
    /// Station index as reported by the device
    pub station: u8,
    /// Absent for volume-set commands
    pub volume: Option<u8>,
    /// Absent for mute toggles, which report no state
    pub muted: Option<bool>,
}

impl RemoteReport {
    /// Index of the station whose name labels this result
    ///
    /// Next and previous report the index before the change, so the index
    /// is moved one step with wrap-around. `None` when the reported index is
    /// not below `count`.
    pub fn station_index(&self, count: u8) -> Option<u8> {
        let reported = self.station;
        if reported >= count {
            return None;
        }

        let index = match self.command {
            RemoteCommand::NextStation if reported == count - 1 => 0,
            RemoteCommand::NextStation => reported + 1,
            RemoteCommand::PreviousStation if reported == 0 => count - 1,
            RemoteCommand::PreviousStation => reported - 1,
            _ => reported,
        };
        Some(index)
    }

    /// Combine the report with an optional station list
    pub fn resolve(&self, stations: Option<&Stations>) -> OpenResult {
        let label = if self.audio_zone {
            AUDIO_ZONE_LABEL.to_string()
        } else {
            stations
                .and_then(|s| {
                    self.station_index(s.count)
                        .map(|i| s.name(usize::from(i)).to_string())
                })
                .unwrap_or_default()
        };

        let playing = match self.command {
            RemoteCommand::Play => Some(true),
            RemoteCommand::Stop => Some(false),
            _ => None,
        };

        OpenResult {
            volume: self.volume.unwrap_or(0),
            label,
            playing,
            muted: self.muted,
            mute_toggled: self.command == RemoteCommand::ToggleMute,
        }
    }
}

/// Outcome of a remote-control command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenResult {
    /// 0..=100, zero for volume-set commands
    pub volume: u8,
    /// Current station name, [`AUDIO_ZONE_LABEL`], or empty when unknown
    pub label: String,
    /// Set by play and stop only
    pub playing: Option<bool>,
    /// Mute state, `None` for a toggle
    pub muted: Option<bool>,
    pub mute_toggled: bool,
}

/// Remote-control operation
pub struct RemoteOperation;

impl LaraOperation for RemoteOperation {
    type Request = RemoteRequest;
    type Response = RemoteReport;

    const NAME: &'static str = "remote";
    const REQUIRES_SESSION: bool = true;

    fn build_frame(request: &RemoteRequest, _ctx: &FrameContext<'_>) -> Result<Vec<u8>> {
        Ok(remote_request(request.command.opcode(), request.param))
    }

    fn parse_response(
        request: &RemoteRequest,
        data: &[u8],
        _ctx: &FrameContext<'_>,
    ) -> Result<RemoteReport> {
        let r = FrameReader::new(Self::NAME, data);

        let status = r.u8(&STATUS)?;
        if status != 0 {
            return Err(ApiError::UnknownDeviceError(status));
        }

        let command = request.command;
        let volume = match command {
            RemoteCommand::SetVolume => None,
            _ => Some(r.u8(&VOLUME)?),
        };
        let muted = match command {
            RemoteCommand::ToggleMute => None,
            _ => Some(r.u8(&MUTE)? == 1),
        };

        Ok(RemoteReport {
            command,
            audio_zone: r.u8(&SOURCE)? == SOURCE_AUDIO_ZONE,
            station: r.u8(&STATION)?,
            volume,
            muted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Sequence, Windows1250};
    use crate::operations::stations::Station;
    use rstest::rstest;

    fn ctx() -> FrameContext<'static> {
        FrameContext::new(Sequence::new(1, 126), &Windows1250)
    }

    fn stations(count: u8) -> Stations {
        let entries = (0..count)
            .map(|i| Station {
                name: format!("Station {}", i),
                ..Station::default()
            })
            .collect();
        Stations::new(count, entries)
    }

    fn report(command: RemoteCommand, station: u8) -> RemoteReport {
        RemoteReport {
            command,
            audio_zone: false,
            station,
            volume: Some(30),
            muted: Some(false),
        }
    }

    #[rstest]
    #[case(RemoteCommand::Play, 3)]
    #[case(RemoteCommand::Stop, 4)]
    #[case(RemoteCommand::ToggleMute, 9)]
    #[case(RemoteCommand::NextStation, 10)]
    #[case(RemoteCommand::PreviousStation, 11)]
    fn test_command_frames(#[case] command: RemoteCommand, #[case] opcode: u8) {
        let frame = RemoteOperation::build_frame(&RemoteRequest::new(command), &ctx()).unwrap();
        assert_eq!(frame, vec![255, 251, 251, 204, opcode, 0]);
    }

    #[rstest]
    #[case(0)]
    #[case(55)]
    #[case(100)]
    fn test_set_volume_encodes_parameter(#[case] volume: u8) {
        let request = RemoteRequest::set_volume(volume).unwrap();
        let frame = RemoteOperation::build_frame(&request, &ctx()).unwrap();
        assert_eq!(frame, vec![255, 251, 251, 204, 5, volume]);
    }

    #[rstest]
    #[case(101)]
    #[case(255)]
    fn test_set_volume_out_of_range(#[case] volume: u8) {
        match RemoteRequest::set_volume(volume) {
            Err(ApiError::RangeError { parameter, value, min, max }) => {
                assert_eq!(parameter, "volume");
                assert_eq!(value, i64::from(volume));
                assert_eq!((min, max), (0, 100));
            }
            other => panic!("Expected RangeError, got {:?}", other),
        }
    }

    #[rstest]
    #[case(RemoteCommand::NextStation, 0, Some(1))]
    #[case(RemoteCommand::PreviousStation, 0, Some(4))]
    #[case(RemoteCommand::NextStation, 4, Some(0))]
    #[case(RemoteCommand::PreviousStation, 3, Some(2))]
    #[case(RemoteCommand::Play, 2, Some(2))]
    #[case(RemoteCommand::Play, 5, None)]
    #[case(RemoteCommand::NextStation, 9, None)]
    fn test_station_index_with_count_five(
        #[case] command: RemoteCommand,
        #[case] reported: u8,
        #[case] expected: Option<u8>,
    ) {
        assert_eq!(report(command, reported).station_index(5), expected);
    }

    #[test]
    fn test_no_station_list_gives_empty_label() {
        let result = report(RemoteCommand::Play, 0).resolve(None);
        assert_eq!(result.label, "");
        assert_eq!(result.playing, Some(true));
    }

    #[test]
    fn test_label_resolves_from_station_list() {
        let list = stations(5);
        let result = report(RemoteCommand::PreviousStation, 0).resolve(Some(&list));
        assert_eq!(result.label, "Station 4");
        assert_eq!(result.playing, None);
        assert_eq!(result.volume, 30);
    }

    #[test]
    fn test_audio_zone_label_wins() {
        let list = stations(5);
        let mut report = report(RemoteCommand::Play, 1);
        report.audio_zone = true;
        assert_eq!(report.resolve(Some(&list)).label, AUDIO_ZONE_LABEL);
    }

    #[test]
    fn test_parse_play_response() {
        let request = RemoteRequest::new(RemoteCommand::Play);
        let parsed = RemoteOperation::parse_response(&request, &[0, 0, 2, 45, 1], &ctx()).unwrap();

        assert_eq!(parsed.station, 2);
        assert_eq!(parsed.volume, Some(45));
        assert_eq!(parsed.muted, Some(true));
        assert!(!parsed.audio_zone);
    }

    #[test]
    fn test_parse_set_volume_ignores_volume_byte() {
        let request = RemoteRequest::set_volume(80).unwrap();
        let parsed = RemoteOperation::parse_response(&request, &[0, 3, 0, 80, 0], &ctx()).unwrap();
        assert_eq!(parsed.volume, None);
        assert!(parsed.audio_zone);

        let result = parsed.resolve(None);
        assert_eq!(result.volume, 0);
        assert_eq!(result.label, AUDIO_ZONE_LABEL);
        assert_eq!(result.muted, Some(false));
    }

    #[test]
    fn test_parse_toggle_reports_toggle_only() {
        let request = RemoteRequest::new(RemoteCommand::ToggleMute);
        let parsed = RemoteOperation::parse_response(&request, &[0, 0, 1, 20], &ctx()).unwrap();
        let result = parsed.resolve(None);
        assert!(result.mute_toggled);
        assert_eq!(result.muted, None);
    }

    #[test]
    fn test_device_error_status() {
        let request = RemoteRequest::new(RemoteCommand::Stop);
        assert!(matches!(
            RemoteOperation::parse_response(&request, &[2, 0, 0, 0, 0], &ctx()),
            Err(ApiError::UnknownDeviceError(2))
        ));
    }

    #[test]
    fn test_short_response_is_truncated() {
        let request = RemoteRequest::new(RemoteCommand::Play);
        assert!(matches!(
            RemoteOperation::parse_response(&request, &[0, 0, 0], &ctx()),
            Err(ApiError::TruncatedResponse { needed: 4, actual: 3, .. })
        ));
        assert!(matches!(
            RemoteOperation::parse_response(&request, &[], &ctx()),
            Err(ApiError::TruncatedResponse { needed: 1, actual: 0, .. })
        ));
    }
}
