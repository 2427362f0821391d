use std::sync::Arc;

use http_client::{HttpClient, RawTransport, Transport};

use crate::codec::Sequence;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::operation::{FrameContext, LaraOperation};
use crate::operations::{
    BasicInfo, Equalizer, GetBasicInfoOperation, GetEqualizerOperation, GetSettingsOperation,
    GetStationPageOperation, OpenResult, RemoteCommand, RemoteOperation, RemoteRequest,
    SetEqualizerOperation, SetSettingsOperation, SetStationPageOperation, SetStationPageRequest,
    Settings, StationPage, Stations,
};
use crate::session::Session;

/// A client for one Lara radio
///
/// Every operation is a single POST to `/data` (or `GET /` for sign-in),
/// retried once by the underlying [`HttpClient`] when the device issues a
/// new digest challenge.
///
/// The client owns mutable session state (the digest challenge, the cached
/// station list and the playing/mute flags), so operations take
/// `&mut self`. Wrap it in a `tokio::sync::Mutex` to share it between
/// tasks.
///
/// ```rust,no_run
/// use lara_api::{ClientConfig, LaraClient};
///
/// # async fn run() -> lara_api::Result<()> {
/// let mut client = LaraClient::new(ClientConfig::new("192.168.1.50", "admin", "admin"));
/// client.sign_in().await?;
///
/// let stations = client.get_stations().await?;
/// let result = client.next_station().await?;
/// println!("{} of {} stations, now playing {}", stations.count, stations.len(), result.label);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LaraClient<T: Transport = RawTransport> {
    http: HttpClient<T>,
    config: ClientConfig,
    session: Session,
}

impl LaraClient<RawTransport> {
    pub fn new(config: ClientConfig) -> Self {
        let transport = RawTransport::with_config(config.transport.clone());
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> LaraClient<T> {
    /// Create a client with a custom transport (mainly for tests)
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let http = HttpClient::with_transport(transport, config.credentials());
        Self {
            http,
            config,
            session: Session::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        self.http.transport()
    }

    /// True once a digest challenge has been cached
    pub fn is_signed_in(&self) -> bool {
        self.http.has_challenge()
    }

    /// Request the index page to obtain a digest challenge
    ///
    /// Returns whether the device finally answered `200 OK`.
    pub async fn sign_in(&mut self) -> Result<bool> {
        let uri = self.config.index_uri();
        let response = self.http.get(&uri).await?;
        let ok = response.is_success();

        if ok {
            tracing::info!(host = %self.config.host, "Signed in");
        } else {
            tracing::warn!(
                host = %self.config.host,
                status = response.status_code,
                "Sign-in rejected"
            );
        }
        Ok(ok)
    }

    /// Execute a Lara operation against the device
    ///
    /// Builds the operation's frame, posts it to `/data` and decodes the
    /// response. Operations that need a session fail with
    /// `AuthenticationRequired` before any network traffic when
    /// [`sign_in`](Self::sign_in) has not cached a challenge.
    pub async fn execute<Op: LaraOperation>(&mut self, request: &Op::Request) -> Result<Op::Response> {
        if Op::REQUIRES_SESSION && !self.http.has_challenge() {
            return Err(ApiError::AuthenticationRequired(format!(
                "{} needs a session, call sign_in first",
                Op::NAME
            )));
        }

        let codec = Arc::clone(&self.config.codec);
        let sequence = Sequence::random(&mut rand::thread_rng());
        let ctx = FrameContext::new(sequence, codec.as_ref());

        let frame = Op::build_frame(request, &ctx)?;
        tracing::debug!(operation = Op::NAME, frame_len = frame.len(), "Sending frame");

        let uri = self.config.data_uri();
        let response = self.http.post(&uri, frame).await?;

        match response.status_code {
            200 => {}
            401 => {
                return Err(ApiError::AuthenticationRequired(format!(
                    "device rejected the {} request",
                    Op::NAME
                )))
            }
            code => return Err(ApiError::UnexpectedStatus(code)),
        }

        Op::parse_response(request, &response.body, &ctx)
    }

    pub async fn get_basic_info(&mut self) -> Result<BasicInfo> {
        self.execute::<GetBasicInfoOperation>(&()).await
    }

    pub async fn get_settings(&mut self) -> Result<Settings> {
        self.execute::<GetSettingsOperation>(&()).await
    }

    pub async fn set_settings(&mut self, settings: &Settings) -> Result<()> {
        self.execute::<SetSettingsOperation>(settings).await
    }

    /// Read one page of ten stations, `page` in `0..=3`
    pub async fn get_station_page(&mut self, page: u8) -> Result<StationPage> {
        self.execute::<GetStationPageOperation>(&page).await
    }

    /// Read as many pages as the station count requires
    ///
    /// The result replaces the cached station list used to label remote
    /// command results.
    pub async fn get_stations(&mut self) -> Result<Stations> {
        let first = self.get_station_page(0).await?;
        let pages = Stations::pages_needed(first.count);

        let mut stations = Stations::default();
        stations.merge_page(first);
        for page in 1..pages {
            let next = self.get_station_page(page).await?;
            stations.merge_page(next);
        }
        stations.truncate_to_count();

        self.session.set_stations(stations.clone());
        Ok(stations)
    }

    /// Write the records of `page` from `stations`
    pub async fn set_station_page(&mut self, stations: &Stations, page: u8) -> Result<()> {
        let request = SetStationPageRequest::from_stations(stations, page)?;
        self.execute::<SetStationPageOperation>(&request).await
    }

    pub async fn get_equalizer(&mut self) -> Result<Equalizer> {
        self.execute::<GetEqualizerOperation>(&()).await
    }

    pub async fn set_equalizer(&mut self, equalizer: &Equalizer) -> Result<()> {
        self.execute::<SetEqualizerOperation>(equalizer).await
    }

    pub async fn play(&mut self) -> Result<OpenResult> {
        self.remote(RemoteRequest::new(RemoteCommand::Play)).await
    }

    pub async fn stop(&mut self) -> Result<OpenResult> {
        self.remote(RemoteRequest::new(RemoteCommand::Stop)).await
    }

    /// Set the volume, 0..=100
    pub async fn set_volume(&mut self, volume: u8) -> Result<OpenResult> {
        self.remote(RemoteRequest::set_volume(volume)?).await
    }

    pub async fn toggle_mute(&mut self) -> Result<OpenResult> {
        self.remote(RemoteRequest::new(RemoteCommand::ToggleMute)).await
    }

    pub async fn next_station(&mut self) -> Result<OpenResult> {
        self.remote(RemoteRequest::new(RemoteCommand::NextStation)).await
    }

    pub async fn previous_station(&mut self) -> Result<OpenResult> {
        self.remote(RemoteRequest::new(RemoteCommand::PreviousStation)).await
    }

    async fn remote(&mut self, request: RemoteRequest) -> Result<OpenResult> {
        let report = match self.execute::<RemoteOperation>(&request).await {
            Ok(report) => report,
            Err(ApiError::UnknownDeviceError(status)) => {
                tracing::warn!(command = ?request.command, status, "Device reported an error");
                return Err(ApiError::UnknownDeviceError(status));
            }
            Err(e) => return Err(e),
        };

        let result = report.resolve(self.session.stations());
        self.session.apply(&result);
        Ok(result)
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_playing()
    }

    pub fn is_muted(&self) -> bool {
        self.session.is_muted()
    }

    pub fn station_cache(&self) -> Option<&Stations> {
        self.session.stations()
    }

    /// Use `stations` to label remote command results
    pub fn set_station_cache(&mut self, stations: Stations) {
        self.session.set_stations(stations);
    }

    pub fn clear_station_cache(&mut self) {
        self.session.clear_stations();
    }
}
