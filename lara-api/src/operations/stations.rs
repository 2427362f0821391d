//! Station list pages
//!
//! The device stores up to 40 internet radio stations in four pages of ten.
//! Each record is 139 bytes long. Only page 0 reports an authoritative
//! station count; records past the count are undefined.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::codec::frame::opcode;
use crate::codec::{query_request, write_frame, Field, FieldKind, FrameReader, Layout};
use crate::error::{ApiError, Result};
use crate::operation::{FrameContext, LaraOperation};

pub const STATIONS_PER_PAGE: usize = 10;
pub const PAGE_COUNT: u8 = 4;
pub const MAX_STATIONS: usize = STATIONS_PER_PAGE * PAGE_COUNT as usize;

pub const MAX_NAME_LEN: usize = 12;
pub const MAX_DOMAIN_LEN: usize = 49;
pub const MAX_FILE_LEN: usize = 69;

/// Distance between consecutive station records
pub const RECORD_STRIDE: usize = 139;

/// Size of the station page write frame
pub const STATION_PAGE_FRAME_LEN: usize = 1450;

const PAGE: Field = Field::new("page", 11, FieldKind::U8);
const COUNT: Field = Field::new("count", 12, FieldKind::U8);

const NAME: Field = Field::new("name", 13, FieldKind::Text { max_len: MAX_NAME_LEN });
const DOMAIN: Field = Field::new("domain", 26, FieldKind::Text { max_len: MAX_DOMAIN_LEN });
const FILE: Field = Field::new("file", 76, FieldKind::Text { max_len: MAX_FILE_LEN });
const IP_ADDRESS: Field = Field::new("ip_address", 146, FieldKind::Ipv4);
const PORT: Field = Field::new("port", 150, FieldKind::U16);

/// One station record, offsets relative to the record base
pub const STATION_LAYOUT: Layout = Layout {
    name: "station",
    version: 1,
    fields: &[NAME, DOMAIN, FILE, IP_ADDRESS, PORT],
};

/// A single internet radio station
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub domain: String,
    pub file: String,
    pub ip_address: Ipv4Addr,
    pub port: u16,
}

impl Default for Station {
    fn default() -> Self {
        Self {
            name: String::new(),
            domain: String::new(),
            file: String::new(),
            ip_address: Ipv4Addr::UNSPECIFIED,
            port: 0,
        }
    }
}

/// Ten station records as returned for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationPage {
    pub page: u8,
    /// Total number of stations across all pages
    pub count: u8,
    pub entries: Vec<Station>,
}

/// All stations known to the device, assembled from one or more pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stations {
    pub count: u8,
    /// Indexed by absolute station number, at most [`MAX_STATIONS`] entries
    pub entries: Vec<Station>,
}

impl Stations {
    pub fn new(count: u8, entries: Vec<Station>) -> Self {
        Self { count, entries }
    }

    /// Number of station records needed to hold `count` entries, in pages
    pub fn pages_needed(count: u8) -> u8 {
        let count = usize::from(count).min(MAX_STATIONS);
        count.div_ceil(STATIONS_PER_PAGE).max(1) as u8
    }

    /// Merge a page into the aggregate, taking the count from page 0
    pub fn merge_page(&mut self, page: StationPage) {
        if page.page == 0 {
            self.count = page.count;
        }

        let start = usize::from(page.page) * STATIONS_PER_PAGE;
        if self.entries.len() < start + STATIONS_PER_PAGE {
            self.entries.resize(start + STATIONS_PER_PAGE, Station::default());
        }
        for (slot, station) in self.entries[start..].iter_mut().zip(page.entries) {
            *slot = station;
        }
    }

    /// Drop records past `count`
    pub fn truncate_to_count(&mut self) {
        self.entries.truncate(usize::from(self.count).min(MAX_STATIONS));
    }

    pub fn get(&self, index: usize) -> Option<&Station> {
        if index < usize::from(self.count) {
            self.entries.get(index)
        } else {
            None
        }
    }

    /// Name of the station at `index`, empty when unknown
    pub fn name(&self, index: usize) -> &str {
        self.get(index).map(|s| s.name.as_str()).unwrap_or_default()
    }

    /// The records that belong to `page`, possibly fewer than ten
    pub fn page(&self, page: u8) -> &[Station] {
        let start = (usize::from(page) * STATIONS_PER_PAGE).min(self.entries.len());
        let end = (start + STATIONS_PER_PAGE).min(self.entries.len());
        &self.entries[start..end]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn page_opcode(page: u8) -> Result<u8> {
    opcode::STATION_PAGE_READ
        .get(usize::from(page))
        .copied()
        .ok_or(ApiError::UnsupportedPage(page))
}

fn check_page(page: u8) -> Result<u8> {
    if page < PAGE_COUNT {
        Ok(page)
    } else {
        Err(ApiError::UnsupportedPage(page))
    }
}

/// GetStationPage operation, the request is the page index
pub struct GetStationPageOperation;

impl LaraOperation for GetStationPageOperation {
    type Request = u8;
    type Response = StationPage;

    const NAME: &'static str = "station page";

    fn build_frame(page: &u8, ctx: &FrameContext<'_>) -> Result<Vec<u8>> {
        Ok(query_request(ctx.sequence, page_opcode(*page)?))
    }

    fn parse_response(page: &u8, data: &[u8], ctx: &FrameContext<'_>) -> Result<StationPage> {
        let reader = FrameReader::new(Self::NAME, data);
        let last = reader.at((STATIONS_PER_PAGE - 1) * RECORD_STRIDE);
        last.require(&STATION_LAYOUT)?;

        let entries = (0..STATIONS_PER_PAGE)
            .map(|i| {
                let record = reader.at(i * RECORD_STRIDE);
                Ok(Station {
                    name: record.text(&NAME, ctx.codec)?,
                    domain: record.text(&DOMAIN, ctx.codec)?,
                    file: record.text(&FILE, ctx.codec)?,
                    ip_address: record.ipv4(&IP_ADDRESS)?,
                    port: record.u16(&PORT)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(StationPage {
            page: *page,
            count: reader.u8(&COUNT)?,
            entries,
        })
    }
}

/// Request for SetStationPage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetStationPageRequest {
    pub page: u8,
    /// Total number of stations across all pages
    pub count: u8,
    /// Records of this page, padded with empty records on write
    pub entries: Vec<Station>,
}

impl SetStationPageRequest {
    /// Take the records of `page` out of an aggregate
    pub fn from_stations(stations: &Stations, page: u8) -> Result<Self> {
        let page = check_page(page)?;
        Ok(Self {
            page,
            count: stations.count,
            entries: stations.page(page).to_vec(),
        })
    }
}

/// SetStationPage operation
pub struct SetStationPageOperation;

impl LaraOperation for SetStationPageOperation {
    type Request = SetStationPageRequest;
    type Response = ();

    const NAME: &'static str = "station page write";
    const REQUIRES_SESSION: bool = true;

    fn build_frame(request: &SetStationPageRequest, ctx: &FrameContext<'_>) -> Result<Vec<u8>> {
        let page = check_page(request.page)?;
        let mut w = write_frame(
            Self::NAME,
            ctx.sequence,
            opcode::STATION_PAGE_WRITE,
            STATION_PAGE_FRAME_LEN,
        )?;

        w.u8(&PAGE, 0, page)?;
        w.u8(&COUNT, 0, request.count)?;

        let empty = Station::default();
        for n in 0..STATIONS_PER_PAGE {
            let station = request.entries.get(n).unwrap_or(&empty);
            let base = n * RECORD_STRIDE;

            w.text(&NAME, base, &station.name, ctx.codec)?;
            w.text(&DOMAIN, base, &station.domain, ctx.codec)?;
            w.text(&FILE, base, &station.file, ctx.codec)?;
            w.ipv4(&IP_ADDRESS, base, station.ip_address)?;
            w.u16(&PORT, base, station.port)?;
        }

        Ok(w.into_bytes())
    }

    fn parse_response(
        _request: &SetStationPageRequest,
        _data: &[u8],
        _ctx: &FrameContext<'_>,
    ) -> Result<()> {
        Ok(())
    }
}
