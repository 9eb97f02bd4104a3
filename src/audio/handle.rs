//! The live track: one rodio `Sink` plus the state shared with its loader.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rodio::Sink;
use tracing::warn;

use crate::player::{EngineHandle, Generation};

/// State the loader thread and the UI thread both touch.
#[derive(Debug, Default)]
pub(super) struct Shared {
    /// The decoded source has been appended to the sink.
    pub loaded: bool,
    /// The handle was stopped; the loader must not append or report.
    pub released: bool,
    pub paused: bool,
    /// Seek requested before the source was appended.
    pub pending_seek: Option<Duration>,
}

pub(super) type SharedHandle = Arc<Mutex<Shared>>;

pub struct RodioHandle {
    generation: Generation,
    sink: Arc<Sink>,
    shared: SharedHandle,
}

impl RodioHandle {
    pub(super) fn new(generation: Generation, sink: Arc<Sink>, shared: SharedHandle) -> Self {
        Self {
            generation,
            sink,
            shared,
        }
    }
}

impl EngineHandle for RodioHandle {
    fn play(&mut self) {
        if let Ok(mut s) = self.shared.lock() {
            s.paused = false;
        }
        self.sink.play();
    }

    fn pause(&mut self) {
        if let Ok(mut s) = self.shared.lock() {
            s.paused = true;
        }
        self.sink.pause();
    }

    fn stop(&mut self) {
        if let Ok(mut s) = self.shared.lock() {
            s.released = true;
        }
        self.sink.stop();
    }

    fn seek(&mut self, position: Duration) {
        let loaded = match self.shared.lock() {
            Ok(mut s) => {
                if !s.loaded {
                    s.pending_seek = Some(position);
                }
                s.loaded
            }
            Err(_) => false,
        };
        if loaded {
            if let Err(e) = self.sink.try_seek(position) {
                warn!(generation = self.generation, error = %e, "seek failed");
            }
        }
    }

    fn set_rate(&mut self, rate: f32) {
        self.sink.set_speed(rate);
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn is_playing(&self) -> bool {
        let live = self
            .shared
            .lock()
            .map(|s| s.loaded && !s.released && !s.paused)
            .unwrap_or(false);
        live && !self.sink.is_paused() && !self.sink.empty()
    }
}
