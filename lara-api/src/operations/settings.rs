//! Device settings read and write
//!
//! The write frame carries every field at its read offset plus
//! [`WRITE_SHIFT`](crate::codec::WRITE_SHIFT), so both directions share
//! [`SETTINGS_LAYOUT`].

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::codec::frame::opcode;
use crate::codec::{query_request, write_frame, Field, FieldKind, FrameReader, Layout};
use crate::error::Result;
use crate::operation::{FrameContext, LaraOperation};

/// Longest string a settings slot accepts
pub const MAX_SETTINGS_STRING: usize = 16;

/// Size of the settings write frame
pub const SETTINGS_FRAME_LEN: usize = 250;

const TEXT: FieldKind = FieldKind::Text {
    max_len: MAX_SETTINGS_STRING,
};

const CONTROL_0: Field = Field::new("control_bits[0]", 11, FieldKind::U8);
const CONTROL_1: Field = Field::new("control_bits[1]", 12, FieldKind::U8);
const ADMIN_LOGIN: Field = Field::new("admin_login", 13, TEXT);
const ADMIN_PASSWORD: Field = Field::new("admin_password", 30, TEXT);
const USER_LOGIN: Field = Field::new("user_login", 47, TEXT);
const USER_PASSWORD: Field = Field::new("user_password", 64, TEXT);
const IP_ADDRESS: Field = Field::new("ip_address", 81, FieldKind::Ipv4);
const IP_MASK: Field = Field::new("ip_mask", 85, FieldKind::Ipv4);
const IP_GATEWAY: Field = Field::new("ip_gateway", 89, FieldKind::Ipv4);
const WATCHDOG_PERIOD: Field = Field::new("watchdog_period", 93, FieldKind::U8);
const WATCHDOG_COUNT: Field = Field::new("watchdog_count", 94, FieldKind::U8);
const CONTROL_2: Field = Field::new("control_bits[2]", 95, FieldKind::U8);
const IR_LOCK: Field = Field::new("ir_lock_bits", 96, FieldKind::U8);
const IP_AUDIO_ZONE: Field = Field::new("ip_audio_zone", 97, FieldKind::Ipv4);
const DEVICE_NAME: Field = Field::new("device_name", 101, TEXT);
const IP_SNTP: Field = Field::new("ip_sntp", 118, FieldKind::Ipv4);
const UTC: Field = Field::new("utc", 122, FieldKind::Utc);
const IP_DNS: Field = Field::new("ip_dns", 123, FieldKind::Ipv4);
const LANGUAGE: Field = Field::new("language", 127, FieldKind::U8);
const RINGTONE: Field = Field::new("ringtone", 128, FieldKind::U8);
const RING_VOLUME: Field = Field::new("ring_volume", 129, FieldKind::U8);
const CALL_VOLUME: Field = Field::new("call_volume", 130, FieldKind::U8);
const MIC_GAIN: Field = Field::new("mic_gain", 131, FieldKind::U8);
const AUDIO_ZONE_USER: Field = Field::new("audio_zone_user", 132, TEXT);
const AUDIO_ZONE_PASSWORD: Field = Field::new("audio_zone_password", 149, TEXT);

pub const SETTINGS_LAYOUT: Layout = Layout {
    name: "settings",
    version: 1,
    fields: &[
        CONTROL_0,
        CONTROL_1,
        ADMIN_LOGIN,
        ADMIN_PASSWORD,
        USER_LOGIN,
        USER_PASSWORD,
        IP_ADDRESS,
        IP_MASK,
        IP_GATEWAY,
        WATCHDOG_PERIOD,
        WATCHDOG_COUNT,
        CONTROL_2,
        IR_LOCK,
        IP_AUDIO_ZONE,
        DEVICE_NAME,
        IP_SNTP,
        UTC,
        IP_DNS,
        LANGUAGE,
        RINGTONE,
        RING_VOLUME,
        CALL_VOLUME,
        MIC_GAIN,
        AUDIO_ZONE_USER,
        AUDIO_ZONE_PASSWORD,
    ],
};

/// Full device configuration
///
/// Strings longer than [`MAX_SETTINGS_STRING`] bytes in the device code
/// page are truncated on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub control_bits: [u8; 3],
    pub ir_lock_bits: u8,
    pub ip_address: Ipv4Addr,
    pub ip_mask: Ipv4Addr,
    pub ip_gateway: Ipv4Addr,
    pub ip_audio_zone: Ipv4Addr,
    pub ip_sntp: Ipv4Addr,
    pub ip_dns: Ipv4Addr,
    pub watchdog_period: u8,
    pub watchdog_count: u8,
    /// Offset from UTC in hours
    pub utc: i8,
    pub language: u8,
    pub ringtone: u8,
    pub ring_volume: u8,
    pub call_volume: u8,
    pub mic_gain: u8,
    pub device_name: String,
    pub admin_login: String,
    pub admin_password: String,
    pub user_login: String,
    pub user_password: String,
    pub audio_zone_user: String,
    pub audio_zone_password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            control_bits: [0; 3],
            ir_lock_bits: 0,
            ip_address: Ipv4Addr::UNSPECIFIED,
            ip_mask: Ipv4Addr::UNSPECIFIED,
            ip_gateway: Ipv4Addr::UNSPECIFIED,
            ip_audio_zone: Ipv4Addr::UNSPECIFIED,
            ip_sntp: Ipv4Addr::UNSPECIFIED,
            ip_dns: Ipv4Addr::UNSPECIFIED,
            watchdog_period: 0,
            watchdog_count: 0,
            utc: 0,
            language: 0,
            ringtone: 0,
            ring_volume: 0,
            call_volume: 0,
            mic_gain: 0,
            device_name: String::new(),
            admin_login: String::new(),
            admin_password: String::new(),
            user_login: String::new(),
            user_password: String::new(),
            audio_zone_user: String::new(),
            audio_zone_password: String::new(),
        }
    }
}

/// GetSettings operation
///
/// The device answers without authentication, credentials included.
pub struct GetSettingsOperation;

impl LaraOperation for GetSettingsOperation {
    type Request = ();
    type Response = Settings;

    const NAME: &'static str = "settings";

    fn build_frame(_request: &(), ctx: &FrameContext<'_>) -> Result<Vec<u8>> {
        Ok(query_request(ctx.sequence, opcode::SETTINGS_READ))
    }

    fn parse_response(_request: &(), data: &[u8], ctx: &FrameContext<'_>) -> Result<Settings> {
        let r = FrameReader::new(Self::NAME, data);
        r.require(&SETTINGS_LAYOUT)?;

        Ok(Settings {
            control_bits: [r.u8(&CONTROL_0)?, r.u8(&CONTROL_1)?, r.u8(&CONTROL_2)?],
            ir_lock_bits: r.u8(&IR_LOCK)?,
            ip_address: r.ipv4(&IP_ADDRESS)?,
            ip_mask: r.ipv4(&IP_MASK)?,
            ip_gateway: r.ipv4(&IP_GATEWAY)?,
            ip_audio_zone: r.ipv4(&IP_AUDIO_ZONE)?,
            ip_sntp: r.ipv4(&IP_SNTP)?,
            ip_dns: r.ipv4(&IP_DNS)?,
            watchdog_period: r.u8(&WATCHDOG_PERIOD)?,
            watchdog_count: r.u8(&WATCHDOG_COUNT)?,
            utc: r.utc(&UTC)?,
            language: r.u8(&LANGUAGE)?,
            ringtone: r.u8(&RINGTONE)?,
            ring_volume: r.u8(&RING_VOLUME)?,
            call_volume: r.u8(&CALL_VOLUME)?,
            mic_gain: r.u8(&MIC_GAIN)?,
            device_name: r.text(&DEVICE_NAME, ctx.codec)?,
            admin_login: r.text(&ADMIN_LOGIN, ctx.codec)?,
            admin_password: r.text(&ADMIN_PASSWORD, ctx.codec)?,
            user_login: r.text(&USER_LOGIN, ctx.codec)?,
            user_password: r.text(&USER_PASSWORD, ctx.codec)?,
            audio_zone_user: r.text(&AUDIO_ZONE_USER, ctx.codec)?,
            audio_zone_password: r.text(&AUDIO_ZONE_PASSWORD, ctx.codec)?,
        })
    }
}

/// SetSettings operation
pub struct SetSettingsOperation;

impl LaraOperation for SetSettingsOperation {
    type Request = Settings;
    type Response = ();

    const NAME: &'static str = "settings write";
    const REQUIRES_SESSION: bool = true;

    fn build_frame(s: &Settings, ctx: &FrameContext<'_>) -> Result<Vec<u8>> {
        let mut w = write_frame(
            Self::NAME,
            ctx.sequence,
            opcode::SETTINGS_WRITE,
            SETTINGS_FRAME_LEN,
        )?;

        w.u8(&CONTROL_0, 0, s.control_bits[0])?;
        w.u8(&CONTROL_1, 0, s.control_bits[1])?;
        w.u8(&CONTROL_2, 0, s.control_bits[2])?;
        w.u8(&IR_LOCK, 0, s.ir_lock_bits)?;

        w.text(&ADMIN_LOGIN, 0, &s.admin_login, ctx.codec)?;
        w.text(&ADMIN_PASSWORD, 0, &s.admin_password, ctx.codec)?;
        w.text(&USER_LOGIN, 0, &s.user_login, ctx.codec)?;
        w.text(&USER_PASSWORD, 0, &s.user_password, ctx.codec)?;
        w.text(&DEVICE_NAME, 0, &s.device_name, ctx.codec)?;
        w.text(&AUDIO_ZONE_USER, 0, &s.audio_zone_user, ctx.codec)?;
        w.text(&AUDIO_ZONE_PASSWORD, 0, &s.audio_zone_password, ctx.codec)?;

        w.ipv4(&IP_ADDRESS, 0, s.ip_address)?;
        w.ipv4(&IP_MASK, 0, s.ip_mask)?;
        w.ipv4(&IP_GATEWAY, 0, s.ip_gateway)?;
        w.ipv4(&IP_AUDIO_ZONE, 0, s.ip_audio_zone)?;
        w.ipv4(&IP_SNTP, 0, s.ip_sntp)?;
        w.ipv4(&IP_DNS, 0, s.ip_dns)?;

        w.u8(&WATCHDOG_PERIOD, 0, s.watchdog_period)?;
        w.u8(&WATCHDOG_COUNT, 0, s.watchdog_count)?;
        w.utc(&UTC, 0, s.utc)?;
        w.u8(&LANGUAGE, 0, s.language)?;
        w.u8(&RINGTONE, 0, s.ringtone)?;
        w.u8(&RING_VOLUME, 0, s.ring_volume)?;
        w.u8(&CALL_VOLUME, 0, s.call_volume)?;
        w.u8(&MIC_GAIN, 0, s.mic_gain)?;

        Ok(w.into_bytes())
    }

    fn parse_response(_request: &Settings, _data: &[u8], _ctx: &FrameContext<'_>) -> Result<()> {
        Ok(())
    }
}
