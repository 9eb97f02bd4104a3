//! The seam between the controller and whatever actually decodes audio.

use std::time::Duration;

use super::types::{EngineEvent, Generation};

/// An audio backend with asynchronous loading.
///
/// `load` returns immediately; the outcome arrives later as a `Ready` or
/// `Failed` event tagged with `generation`, followed by a single `Ended`
/// once playback runs out.
pub trait PlaybackEngine {
    type Handle: EngineHandle;

    /// Start fetching `url` and play it at `rate` as soon as it is decoded.
    fn load(&mut self, generation: Generation, url: &str, rate: f32) -> Self::Handle;

    /// Take every event produced since the last call.
    fn drain_events(&mut self) -> Vec<EngineEvent>;
}

/// The one live decoded track. Commands issued before the load completes
/// are remembered and applied once it does.
pub trait EngineHandle {
    fn play(&mut self);
    fn pause(&mut self);
    /// Stop playback and give up the underlying resources. Final.
    fn stop(&mut self);
    fn seek(&mut self, position: Duration);
    fn set_rate(&mut self, rate: f32);
    fn position(&self) -> Duration;
    /// True only while audio is actually advancing.
    fn is_playing(&self) -> bool;
}
