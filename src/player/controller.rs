//! Playback sequencing: which track is current, what the engine is doing
//! with it, and what happens when it ends.
//!
//! The controller is driven from a single thread. User intents arrive as
//! method calls, engine results as generation-tagged events, and the two
//! timers (progress poll, auto-advance) fire from `tick`. Anything that
//! starts a new track cancels both timers and releases the live handle
//! before the engine is asked for the next one.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::engine::{EngineHandle, PlaybackEngine};
use super::error::{PlayerError, Result};
use super::types::{EngineEvent, EngineEventKind, Generation, PlayerConfig, PlayerState, Session};
use crate::dataset::Track;

struct PollTimer {
    /// `None` until the first tick after arming.
    next_due: Option<Instant>,
}

struct AutoAdvance {
    /// Generation the advance was scheduled under.
    token: Generation,
    due: Instant,
}

pub struct PlayerController<E: PlaybackEngine> {
    engine: E,
    config: PlayerConfig,
    tracks: Vec<Track>,
    session: Session,
    state: PlayerState,
    generation: Generation,
    live: Option<E::Handle>,
    poll: Option<PollTimer>,
    auto_advance: Option<AutoAdvance>,
}

impl<E: PlaybackEngine> PlayerController<E> {
    pub fn new(engine: E, config: PlayerConfig) -> Self {
        Self {
            engine,
            config,
            tracks: Vec::new(),
            session: Session::default(),
            state: PlayerState::Idle,
            generation: 0,
            live: None,
            poll: None,
            auto_advance: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    #[cfg(test)]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.session.current_index)
    }

    /// Swap in a new track list. The old session is torn down first.
    pub fn replace_tracks(&mut self, tracks: Vec<Track>) {
        self.teardown();
        info!(tracks = tracks.len(), "track list replaced");
        self.tracks = tracks;
    }

    /// Release the engine handle, clear timers and reset the session.
    pub fn teardown(&mut self) {
        self.auto_advance = None;
        self.release();
        self.generation += 1;
        self.session.reset();
        self.state = PlayerState::Idle;
    }

    /// Load and play track `index`, replacing whatever is live.
    pub fn select_track(&mut self, index: usize) -> Result<()> {
        let len = self.tracks.len();
        if len == 0 {
            return Err(PlayerError::EmptyTrackList);
        }
        if index >= len {
            return Err(PlayerError::IndexOutOfRange { index, len });
        }

        self.auto_advance = None;
        self.release();
        self.generation += 1;

        self.session.current_index = index;
        self.session.progress_seconds = 0.0;
        self.session.duration_seconds = 0.0;
        self.session.is_loading = true;
        self.session.is_playing = true;
        self.session.pending_auto_advance = false;
        self.state = PlayerState::Loading;

        let track = &self.tracks[index];
        info!(index, title = %track.title, generation = self.generation, "loading track");
        let handle = self
            .engine
            .load(self.generation, &track.url, self.session.playback_rate);
        self.live = Some(handle);
        self.poll = Some(PollTimer { next_due: None });
        Ok(())
    }

    pub fn toggle_play_pause(&mut self) -> Result<()> {
        match self.state {
            PlayerState::Playing => self.pause(),
            PlayerState::Paused => {
                if self.live.is_none() {
                    return self.select_track(self.session.current_index);
                }
                if let Some(h) = self.live.as_mut() {
                    h.play();
                }
                self.session.is_playing = true;
                self.state = PlayerState::Playing;
            }
            PlayerState::AutoAdvancePending => {
                self.auto_advance = None;
                return self.next();
            }
            PlayerState::Idle => {
                if self.tracks.is_empty() {
                    return Ok(());
                }
                return self.select_track(self.session.current_index);
            }
            PlayerState::Loading => {
                if self.session.is_playing {
                    self.pause();
                } else if let Some(h) = self.live.as_mut() {
                    h.play();
                    self.session.is_playing = true;
                }
            }
        }
        Ok(())
    }

    /// Pause without toggling. While an auto-advance is pending this cancels
    /// the delay; the advance then waits for the next toggle.
    pub fn pause(&mut self) {
        match self.state {
            PlayerState::Playing | PlayerState::Loading => {
                if let Some(h) = self.live.as_mut() {
                    h.pause();
                }
                self.session.is_playing = false;
                if self.state == PlayerState::Playing {
                    self.state = PlayerState::Paused;
                }
            }
            PlayerState::AutoAdvancePending => {
                self.auto_advance = None;
                self.session.is_playing = false;
            }
            PlayerState::Idle | PlayerState::Paused => {}
        }
    }

    pub fn next(&mut self) -> Result<()> {
        let len = self.tracks.len();
        if len == 0 {
            return Ok(());
        }
        self.select_track((self.session.current_index + 1) % len)
    }

    /// Restart the current track if it has played past the restart threshold,
    /// otherwise go to the previous one (wrapping).
    pub fn prev(&mut self) -> Result<()> {
        let len = self.tracks.len();
        if len == 0 {
            return Ok(());
        }
        let current = self.session.current_index;
        let target = if self.session.progress_seconds > self.config.restart_threshold_secs {
            current
        } else {
            (current + len - 1) % len
        };
        self.select_track(target)
    }

    /// Seek to `seconds`, clamped to the known duration. Progress updates
    /// immediately rather than waiting for the next poll.
    pub fn seek(&mut self, seconds: f64) {
        let max = self.session.duration_seconds.max(0.0);
        let target = if seconds.is_nan() {
            0.0
        } else {
            seconds.clamp(0.0, max)
        };
        if let Some(h) = self.live.as_mut() {
            h.seek(Duration::from_secs_f64(target));
        }
        self.session.progress_seconds = target;
    }

    pub fn seek_by(&mut self, delta_seconds: f64) {
        self.seek(self.session.progress_seconds + delta_seconds);
    }

    pub fn set_playback_rate(&mut self, rate: f32) -> Result<()> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(PlayerError::InvalidRate(rate));
        }
        self.session.playback_rate = rate;
        if let Some(h) = self.live.as_mut() {
            h.set_rate(rate);
        }
        Ok(())
    }

    /// Move `steps` notches along the configured rate ladder.
    pub fn step_playback_rate(&mut self, steps: i32) -> Result<()> {
        let c = &self.config;
        let raw = self.session.playback_rate + steps as f32 * c.rate_step;
        let notch = ((raw - c.rate_min) / c.rate_step).round();
        let rate = (c.rate_min + notch * c.rate_step).clamp(c.rate_min, c.rate_max);
        self.set_playback_rate(rate)
    }

    pub fn set_continue_playing(&mut self, enabled: bool) {
        self.session.continue_playing = enabled;
    }

    pub fn toggle_continue_playing(&mut self) {
        self.set_continue_playing(!self.session.continue_playing);
    }

    /// Apply pending engine events, then fire due timers.
    pub fn pump(&mut self, now: Instant) {
        for event in self.engine.drain_events() {
            self.handle_event(event, now);
        }
        self.tick(now);
    }

    /// Apply one engine event. Events from an earlier generation are dropped.
    pub fn handle_event(&mut self, event: EngineEvent, now: Instant) {
        if event.generation != self.generation {
            debug!(
                event = event.generation,
                current = self.generation,
                "dropping stale engine event"
            );
            return;
        }

        match event.kind {
            EngineEventKind::Ready { duration } => {
                if self.state != PlayerState::Loading {
                    return;
                }
                self.session.duration_seconds = duration.as_secs_f64();
                self.session.is_loading = false;
                self.state = if self.session.is_playing {
                    PlayerState::Playing
                } else {
                    PlayerState::Paused
                };
                debug!(duration = self.session.duration_seconds, "track ready");
            }
            EngineEventKind::Ended => {
                if !matches!(self.state, PlayerState::Playing | PlayerState::Paused) {
                    return;
                }
                self.poll = None;
                if self.session.continue_playing {
                    self.session.progress_seconds = self.session.duration_seconds;
                    self.session.pending_auto_advance = true;
                    self.state = PlayerState::AutoAdvancePending;
                    self.auto_advance = Some(AutoAdvance {
                        token: self.generation,
                        due: now + self.config.auto_advance_delay,
                    });
                    debug!(
                        delay_ms = self.config.auto_advance_delay.as_millis() as u64,
                        "track ended, advancing after delay"
                    );
                } else {
                    self.release();
                    self.session.is_playing = false;
                    self.session.progress_seconds = 0.0;
                    self.state = PlayerState::Idle;
                    debug!("track ended");
                }
            }
            EngineEventKind::Failed { reason } => {
                warn!(
                    index = self.session.current_index,
                    reason = %reason,
                    "track failed to load"
                );
                self.release();
                self.session.is_loading = false;
                self.session.is_playing = false;
                self.state = PlayerState::Idle;
            }
        }
    }

    /// Fire the auto-advance and progress poll if they are due.
    pub fn tick(&mut self, now: Instant) {
        if self.auto_advance.as_ref().is_some_and(|a| now >= a.due) {
            if let Some(a) = self.auto_advance.take() {
                let still_applies = a.token == self.generation
                    && self.state == PlayerState::AutoAdvancePending
                    && self.session.is_playing;
                if still_applies {
                    if let Err(e) = self.next() {
                        warn!(error = %e, "auto-advance failed");
                    }
                }
            }
        }

        if self.state != PlayerState::Playing {
            return;
        }
        let interval = self.config.poll_interval;
        if let (Some(poll), Some(h)) = (self.poll.as_mut(), self.live.as_ref()) {
            if poll.next_due.is_none_or(|d| now >= d) {
                if h.is_playing() {
                    self.session.progress_seconds = h.position().as_secs_f64();
                }
                poll.next_due = Some(now + interval);
            }
        }
    }

    /// The earliest instant at which `tick` has something to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let poll = if self.state == PlayerState::Playing {
            self.poll.as_ref().and_then(|p| p.next_due)
        } else {
            None
        };
        let advance = self.auto_advance.as_ref().map(|a| a.due);
        match (poll, advance) {
            (Some(p), Some(a)) => Some(p.min(a)),
            (p, a) => p.or(a),
        }
    }

    /// Time left before a scheduled auto-advance, if one is scheduled.
    pub fn auto_advance_remaining(&self, now: Instant) -> Option<Duration> {
        self.auto_advance
            .as_ref()
            .map(|a| a.due.saturating_duration_since(now))
    }

    fn release(&mut self) {
        self.poll = None;
        if let Some(mut h) = self.live.take() {
            h.stop();
        }
    }
}

impl<E: PlaybackEngine> Drop for PlayerController<E> {
    fn drop(&mut self) {
        self.release();
    }
}
