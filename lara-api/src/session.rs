//! Derived playback state kept between calls

use crate::operations::{OpenResult, Stations};

/// What the client remembers about the radio between commands
///
/// The device reports playing and mute state only for some commands, and a
/// mute toggle reports nothing at all, so the flags are tracked here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    stations: Option<Stations>,
    playing: bool,
    muted: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stations(&self) -> Option<&Stations> {
        self.stations.as_ref()
    }

    pub fn set_stations(&mut self, stations: Stations) {
        tracing::debug!(count = stations.count, "Station cache updated");
        self.stations = Some(stations);
    }

    pub fn clear_stations(&mut self) {
        tracing::debug!("Station cache cleared");
        self.stations = None;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Fold a remote-command result into the cached flags
    pub fn apply(&mut self, result: &OpenResult) {
        if let Some(playing) = result.playing {
            self.playing = playing;
        }

        if result.mute_toggled {
            self.muted = !self.muted;
        } else if let Some(muted) = result.muted {
            self.muted = muted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(playing: Option<bool>, muted: Option<bool>, mute_toggled: bool) -> OpenResult {
        OpenResult {
            playing,
            muted,
            mute_toggled,
            ..OpenResult::default()
        }
    }

    #[test]
    fn test_play_and_stop() {
        let mut session = Session::new();
        session.apply(&result(Some(true), Some(false), false));
        assert!(session.is_playing());

        // Next station says nothing about playback
        session.apply(&result(None, Some(false), false));
        assert!(session.is_playing());

        session.apply(&result(Some(false), Some(false), false));
        assert!(!session.is_playing());
    }

    #[test]
    fn test_toggle_flips_cached_mute() {
        let mut session = Session::new();
        session.apply(&result(None, None, true));
        assert!(session.is_muted());
        session.apply(&result(None, None, true));
        assert!(!session.is_muted());
    }

    #[test]
    fn test_reported_mute_overrides_cache() {
        let mut session = Session::new();
        session.apply(&result(None, None, true));
        session.apply(&result(None, Some(false), false));
        assert!(!session.is_muted());
    }

    #[test]
    fn test_station_cache() {
        let mut session = Session::new();
        assert!(session.stations().is_none());
        session.set_stations(Stations::new(3, Vec::new()));
        assert_eq!(session.stations().map(|s| s.count), Some(3));
        session.clear_stations();
        assert!(session.stations().is_none());
    }
}
