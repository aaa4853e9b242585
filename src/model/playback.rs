use std::fmt;

use serde::Serialize;

/// Coarse playback status as the user sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    #[default]
    NotStarted,
    Playing,
    Paused,
}

impl PlaybackPhase {
    /// Derive the phase from "has generation started" and the pause flag.
    pub fn from_flags(started: bool, paused: bool) -> Self {
        match (started, paused) {
            (false, _) => PlaybackPhase::NotStarted,
            (true, false) => PlaybackPhase::Playing,
            (true, true) => PlaybackPhase::Paused,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlaybackPhase::NotStarted => "STOPPED",
            PlaybackPhase::Playing => "PLAYING",
            PlaybackPhase::Paused => "PAUSED",
        }
    }
}

impl fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackPhase::NotStarted => write!(f, "not started"),
            PlaybackPhase::Playing => write!(f, "playing"),
            PlaybackPhase::Paused => write!(f, "paused"),
        }
    }
}
