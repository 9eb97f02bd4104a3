//! Player state, session data and engine event types.

use std::time::Duration;

use crate::config::PlaybackSettings;

/// Load counter. Every `select_track` and every reset bumps it, and engine
/// events carry the value they were issued under.
pub type Generation = u64;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// No track loaded.
    #[default]
    Idle,
    /// The engine is fetching/decoding the current track.
    Loading,
    Playing,
    Paused,
    /// The track ended with continue-playing on; waiting out the delay.
    AutoAdvancePending,
}

/// Transient playback state published to the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub current_index: usize,
    pub is_playing: bool,
    pub is_loading: bool,
    pub progress_seconds: f64,
    pub duration_seconds: f64,
    pub playback_rate: f32,
    pub continue_playing: bool,
    pub pending_auto_advance: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            current_index: 0,
            is_playing: false,
            is_loading: false,
            progress_seconds: 0.0,
            duration_seconds: 0.0,
            playback_rate: 1.0,
            continue_playing: false,
            pending_auto_advance: false,
        }
    }
}

impl Session {
    /// Back to defaults, keeping the user's rate and continue-playing choice.
    pub fn reset(&mut self) {
        *self = Self {
            playback_rate: self.playback_rate,
            continue_playing: self.continue_playing,
            ..Self::default()
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEventKind {
    /// The track is decoded and playing (or ready to, if paused meanwhile).
    Ready { duration: Duration },
    /// Playback reached the end of the track.
    Ended,
    /// Fetching or decoding failed.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineEvent {
    pub generation: Generation,
    pub kind: EngineEventKind,
}

impl EngineEvent {
    pub fn ready(generation: Generation, duration: Duration) -> Self {
        Self {
            generation,
            kind: EngineEventKind::Ready { duration },
        }
    }

    pub fn ended(generation: Generation) -> Self {
        Self {
            generation,
            kind: EngineEventKind::Ended,
        }
    }

    pub fn failed(generation: Generation, reason: impl Into<String>) -> Self {
        Self {
            generation,
            kind: EngineEventKind::Failed {
                reason: reason.into(),
            },
        }
    }
}

/// Sequencing knobs of the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    /// Past this point "previous" restarts the current track.
    pub restart_threshold_secs: f64,
    /// Pause between an ended track and the next one when continuing.
    pub auto_advance_delay: Duration,
    /// Progress sampling period while playing.
    pub poll_interval: Duration,
    pub rate_min: f32,
    pub rate_max: f32,
    pub rate_step: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::from(&PlaybackSettings::default())
    }
}

impl From<&PlaybackSettings> for PlayerConfig {
    fn from(p: &PlaybackSettings) -> Self {
        Self {
            restart_threshold_secs: p.restart_threshold_secs,
            auto_advance_delay: Duration::from_millis(p.auto_advance_delay_ms),
            poll_interval: Duration::from_secs_f64(1.0 / f64::from(p.poll_hz.max(1))),
            rate_min: p.rate_min,
            rate_max: p.rate_max,
            rate_step: p.rate_step,
        }
    }
}
