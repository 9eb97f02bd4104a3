use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use super::error::AudioError;
use super::handle::{RodioHandle, Shared, SharedHandle};
use super::source::{TrackSource, fetch_source};
use crate::player::{EngineEvent, Generation, PlaybackEngine};

/// How often a loader thread checks whether its track has run out.
const END_POLL: Duration = Duration::from_millis(100);

/// rodio-backed engine. Owns the output stream; each `load` gets a worker
/// thread that fetches, decodes, appends and then watches for the end.
pub struct RodioEngine {
    // Keep this alive for the lifetime of the engine.
    stream: OutputStream,
    client: Client,
    tx: Sender<EngineEvent>,
    rx: Receiver<EngineEvent>,
}

impl RodioEngine {
    pub fn open(client: Client) -> Result<Self, AudioError> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when OutputStream is dropped, which garbles the TUI.
        stream.log_on_drop(false);

        let (tx, rx) = mpsc::channel::<EngineEvent>();
        Ok(Self {
            stream,
            client,
            tx,
            rx,
        })
    }
}

impl PlaybackEngine for RodioEngine {
    type Handle = RodioHandle;

    fn load(&mut self, generation: Generation, url: &str, rate: f32) -> RodioHandle {
        let sink = Arc::new(Sink::connect_new(self.stream.mixer()));
        sink.set_speed(rate);
        let shared: SharedHandle = Arc::new(Mutex::new(Shared::default()));

        let worker = Loader {
            generation,
            url: url.to_string(),
            client: self.client.clone(),
            sink: sink.clone(),
            shared: shared.clone(),
            tx: self.tx.clone(),
        };
        let spawned = thread::Builder::new()
            .name(format!("load-{generation}"))
            .spawn(move || worker.run());
        if let Err(e) = spawned {
            let _ = self
                .tx
                .send(EngineEvent::failed(generation, format!("spawn loader: {e}")));
        }

        RodioHandle::new(generation, sink, shared)
    }

    fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.rx.try_iter().collect()
    }
}

enum Attach {
    Appended { pending_seek: Option<Duration> },
    Abandoned,
}

struct Loader {
    generation: Generation,
    url: String,
    client: Client,
    sink: Arc<Sink>,
    shared: SharedHandle,
    tx: Sender<EngineEvent>,
}

impl Loader {
    fn run(self) {
        let (source, duration) = match fetch_source(&self.url, &self.client) {
            Ok(v) => v,
            Err(e) => {
                warn!(generation = self.generation, url = %self.url, error = %e, "load failed");
                if !self.is_released() {
                    let _ = self
                        .tx
                        .send(EngineEvent::failed(self.generation, e.to_string()));
                }
                return;
            }
        };

        let pending_seek = match self.attach(source) {
            Attach::Appended { pending_seek } => pending_seek,
            Attach::Abandoned => return,
        };

        if let Some(pos) = pending_seek {
            if let Err(e) = self.sink.try_seek(pos) {
                warn!(generation = self.generation, error = %e, "deferred seek failed");
            }
        }

        debug!(generation = self.generation, ?duration, "track decoded");
        if self
            .tx
            .send(EngineEvent::ready(self.generation, duration))
            .is_err()
        {
            return;
        }

        loop {
            thread::sleep(END_POLL);
            if self.is_released() {
                return;
            }
            if self.sink.empty() {
                let _ = self.tx.send(EngineEvent::ended(self.generation));
                return;
            }
        }
    }

    /// Hand the decoded source to the sink unless the handle was released.
    /// A poisoned handle state is reported as a failed load.
    fn attach(&self, source: TrackSource) -> Attach {
        let Ok(mut s) = self.shared.lock() else {
            warn!(generation = self.generation, "handle state poisoned, abandoning load");
            let _ = self
                .tx
                .send(EngineEvent::failed(self.generation, "handle state poisoned"));
            return Attach::Abandoned;
        };
        if s.released {
            debug!(generation = self.generation, "handle released before load finished");
            return Attach::Abandoned;
        }
        if s.paused {
            self.sink.pause();
        }
        self.sink.append(source);
        s.loaded = true;
        Attach::Appended {
            pending_seek: s.pending_seek.take(),
        }
    }

    fn is_released(&self) -> bool {
        self.shared.lock().map(|s| s.released).unwrap_or(true)
    }
}
