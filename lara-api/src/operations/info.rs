//! Basic device information

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::codec::{info_request, Field, FieldKind, FrameReader, Layout};
use crate::error::Result;
use crate::operation::{FrameContext, LaraOperation};

const FIRMWARE: Field = Field::new("firmware", 11, FieldKind::U24);
const HARDWARE: Field = Field::new("hardware", 14, FieldKind::U8);
const IP_ADDRESS: Field = Field::new("ip_address", 15, FieldKind::Ipv4);
const NAME: Field = Field::new("name", 19, FieldKind::Text { max_len: 16 });

pub const BASIC_INFO_LAYOUT: Layout = Layout {
    name: "basic info",
    version: 1,
    fields: &[FIRMWARE, HARDWARE, IP_ADDRESS, NAME],
};

/// Hardware revision reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HardwareVersion {
    A,
    B,
}

impl HardwareVersion {
    pub fn from_flag(flag: u8) -> Self {
        if flag == 1 {
            Self::A
        } else {
            Self::B
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::A => "version A",
            Self::B => "version B",
        }
    }
}

impl fmt::Display for HardwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfo {
    /// `major.minor.patch`, with a leading `0` on patches below 100
    pub firmware: String,
    pub hardware: HardwareVersion,
    pub ip_address: Ipv4Addr,
    pub name: String,
}

/// Render the packed 24-bit firmware number
///
/// `30512` becomes `3.0.512`, `21005` becomes `2.1.05` and `21050`
/// becomes `2.1.050`.
pub fn format_firmware(raw: u32) -> String {
    let patch = raw % 1_000;
    let patch = if patch < 100 {
        format!("0{}", patch)
    } else {
        patch.to_string()
    };
    format!("{}.{}.{}", raw / 10_000, (raw % 10_000) / 1_000, patch)
}

/// GetBasicInfo operation
pub struct GetBasicInfoOperation;

impl LaraOperation for GetBasicInfoOperation {
    type Request = ();
    type Response = BasicInfo;

    const NAME: &'static str = "basic info";

    fn build_frame(_request: &(), ctx: &FrameContext<'_>) -> Result<Vec<u8>> {
        Ok(info_request(ctx.sequence))
    }

    fn parse_response(_request: &(), data: &[u8], ctx: &FrameContext<'_>) -> Result<BasicInfo> {
        let reader = FrameReader::new(Self::NAME, data);
        reader.require(&BASIC_INFO_LAYOUT)?;

        Ok(BasicInfo {
            firmware: format_firmware(reader.u24(&FIRMWARE)?),
            hardware: HardwareVersion::from_flag(reader.u8(&HARDWARE)?),
            ip_address: reader.ipv4(&IP_ADDRESS)?,
            name: reader.text(&NAME, ctx.codec)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Sequence, Windows1250};
    use crate::error::ApiError;
    use rstest::rstest;

    fn ctx() -> FrameContext<'static> {
        FrameContext::new(Sequence::new(10, 140), &Windows1250)
    }

    fn response(firmware: u32, hardware: u8, name: &[u8]) -> Vec<u8> {
        let mut data = vec![0u8; 40];
        data[11] = (firmware >> 16) as u8;
        data[12] = (firmware >> 8) as u8;
        data[13] = firmware as u8;
        data[14] = hardware;
        data[15..19].copy_from_slice(&[192, 168, 1, 50]);
        data[19..19 + name.len()].copy_from_slice(name);
        data
    }

    #[rstest]
    #[case(30512, "3.0.512")]
    #[case(21005, "2.1.05")]
    #[case(21100, "2.1.100")]
    #[case(10099, "1.0.099")]
    #[case(21050, "2.1.050")]
    #[case(0, "0.0.00")]
    fn test_format_firmware(#[case] raw: u32, #[case] expected: &str) {
        assert_eq!(format_firmware(raw), expected);
    }

    #[test]
    fn test_build_frame() {
        let frame = GetBasicInfoOperation::build_frame(&(), &ctx()).unwrap();
        assert_eq!(frame, vec![255, 250, 250, 255, 10, 140, 0, 128, 2]);
    }

    #[test]
    fn test_parse_response() {
        let data = response(30512, 1, b"Kuchyn\xEC");
        let info = GetBasicInfoOperation::parse_response(&(), &data, &ctx()).unwrap();

        assert_eq!(info.firmware, "3.0.512");
        assert_eq!(info.hardware, HardwareVersion::A);
        assert_eq!(info.hardware.to_string(), "version A");
        assert_eq!(info.ip_address, Ipv4Addr::new(192, 168, 1, 50));
        assert_eq!(info.name, "Kuchyně");
    }

    #[test]
    fn test_any_other_hardware_flag_is_version_b() {
        let data = response(10000, 7, b"Lara");
        let info = GetBasicInfoOperation::parse_response(&(), &data, &ctx()).unwrap();
        assert_eq!(info.hardware, HardwareVersion::B);
    }

    #[test]
    fn test_short_response_is_truncated() {
        let data = vec![0u8; 20];
        match GetBasicInfoOperation::parse_response(&(), &data, &ctx()) {
            Err(ApiError::TruncatedResponse { frame, needed, actual }) => {
                assert_eq!(frame, "basic info");
                assert_eq!(needed, 35);
                assert_eq!(actual, 20);
            }
            other => panic!("Expected TruncatedResponse, got {:?}", other),
        }
    }
}
