use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::*;
use crate::dataset::Track;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(Generation, String, f32),
    Play(Generation),
    Pause(Generation),
    Stop(Generation),
    Seek(Generation, Duration),
    Rate(Generation, f32),
}

/// Shared view into the scripted engine, kept by the test.
#[derive(Clone, Default)]
struct Probe {
    calls: Rc<RefCell<Vec<Call>>>,
    queued: Rc<RefCell<Vec<EngineEvent>>>,
    position: Rc<Cell<Duration>>,
}

impl Probe {
    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn loads(&self) -> Vec<(Generation, String)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Load(g, url, _) => Some((*g, url.clone())),
                _ => None,
            })
            .collect()
    }

    fn queue(&self, event: EngineEvent) {
        self.queued.borrow_mut().push(event);
    }
}

struct ScriptedEngine {
    probe: Probe,
}

struct ScriptedHandle {
    generation: Generation,
    probe: Probe,
    playing: bool,
}

impl PlaybackEngine for ScriptedEngine {
    type Handle = ScriptedHandle;

    fn load(&mut self, generation: Generation, url: &str, rate: f32) -> ScriptedHandle {
        self.probe
            .calls
            .borrow_mut()
            .push(Call::Load(generation, url.to_string(), rate));
        ScriptedHandle {
            generation,
            probe: self.probe.clone(),
            playing: true,
        }
    }

    fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut *self.probe.queued.borrow_mut())
    }
}

impl EngineHandle for ScriptedHandle {
    fn play(&mut self) {
        self.playing = true;
        self.probe.calls.borrow_mut().push(Call::Play(self.generation));
    }

    fn pause(&mut self) {
        self.playing = false;
        self.probe.calls.borrow_mut().push(Call::Pause(self.generation));
    }

    fn stop(&mut self) {
        self.playing = false;
        self.probe.calls.borrow_mut().push(Call::Stop(self.generation));
    }

    fn seek(&mut self, position: Duration) {
        self.probe
            .calls
            .borrow_mut()
            .push(Call::Seek(self.generation, position));
    }

    fn set_rate(&mut self, rate: f32) {
        self.probe
            .calls
            .borrow_mut()
            .push(Call::Rate(self.generation, rate));
    }

    fn position(&self) -> Duration {
        self.probe.position.get()
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

fn tracks(n: usize) -> Vec<Track> {
    (0..n)
        .map(|i| Track::new(format!("Track {i}"), format!("/audio/1/1/{i}.mp3")))
        .collect()
}

fn player(n: usize) -> (PlayerController<ScriptedEngine>, Probe) {
    let probe = Probe::default();
    let mut p = PlayerController::new(
        ScriptedEngine {
            probe: probe.clone(),
        },
        PlayerConfig::default(),
    );
    p.replace_tracks(tracks(n));
    (p, probe)
}

/// Select `index` and deliver its ready event with the given duration.
fn start(p: &mut PlayerController<ScriptedEngine>, index: usize, secs: u64, now: Instant) {
    p.select_track(index).unwrap();
    p.handle_event(EngineEvent::ready(p.generation(), Duration::from_secs(secs)), now);
    assert_eq!(p.state(), PlayerState::Playing);
}

#[test]
fn select_track_loads_then_plays_on_ready() {
    let (mut p, probe) = player(3);
    let now = Instant::now();

    p.select_track(1).unwrap();
    assert_eq!(p.state(), PlayerState::Loading);
    assert!(p.session().is_loading);
    assert!(p.session().is_playing);
    assert_eq!(p.session().current_index, 1);
    assert_eq!(probe.loads(), vec![(p.generation(), "/audio/1/1/1.mp3".into())]);

    p.handle_event(EngineEvent::ready(p.generation(), Duration::from_secs(42)), now);
    assert_eq!(p.state(), PlayerState::Playing);
    assert!(!p.session().is_loading);
    assert_eq!(p.session().duration_seconds, 42.0);
}

#[test]
fn select_track_releases_previous_handle_before_loading() {
    let (mut p, probe) = player(3);
    p.select_track(0).unwrap();
    let first = p.generation();
    p.select_track(2).unwrap();
    let second = p.generation();

    let calls = probe.calls();
    let stop = calls.iter().position(|c| *c == Call::Stop(first)).unwrap();
    let load = calls
        .iter()
        .position(|c| matches!(c, Call::Load(g, _, _) if *g == second))
        .unwrap();
    assert!(stop < load);
}

#[test]
fn select_track_guards_indices() {
    let (mut p, _) = player(0);
    assert_eq!(p.select_track(0), Err(PlayerError::EmptyTrackList));

    let (mut p, probe) = player(2);
    assert_eq!(
        p.select_track(5),
        Err(PlayerError::IndexOutOfRange { index: 5, len: 2 })
    );
    assert!(probe.calls().is_empty());
    assert_eq!(p.state(), PlayerState::Idle);
}

#[test]
fn next_wraps_around_after_length_steps() {
    for len in 1..=5 {
        let (mut p, _) = player(len);
        p.select_track(len / 2).unwrap();
        let start_index = p.session().current_index;
        for _ in 0..len {
            p.next().unwrap();
        }
        assert_eq!(p.session().current_index, start_index, "len {len}");
    }
}

#[test]
fn next_and_prev_are_noops_on_empty_list() {
    let (mut p, probe) = player(0);
    p.next().unwrap();
    p.prev().unwrap();
    p.toggle_play_pause().unwrap();
    assert!(probe.calls().is_empty());
    assert_eq!(p.state(), PlayerState::Idle);
    assert!(p.current_track().is_none());
}

#[test]
fn prev_moves_back_when_near_start() {
    let (mut p, _) = player(3);
    let now = Instant::now();
    start(&mut p, 2, 60, now);
    p.seek(2.0);

    p.prev().unwrap();
    assert_eq!(p.session().current_index, 1);
}

#[test]
fn prev_at_first_track_wraps_to_last() {
    let (mut p, _) = player(3);
    let now = Instant::now();
    start(&mut p, 0, 60, now);
    p.seek(3.0);

    p.prev().unwrap();
    assert_eq!(p.session().current_index, 2);
}

#[test]
fn prev_past_threshold_restarts_current_track() {
    let (mut p, probe) = player(3);
    let now = Instant::now();
    start(&mut p, 0, 60, now);
    p.seek(5.0);

    p.prev().unwrap();
    assert_eq!(p.session().current_index, 0);
    assert_eq!(p.session().progress_seconds, 0.0);
    assert_eq!(p.state(), PlayerState::Loading);
    let loads = probe.loads();
    assert_eq!(loads.len(), 2);
    assert_eq!(loads[0].1, loads[1].1);
}

#[test]
fn seek_clamps_to_duration() {
    let (mut p, probe) = player(1);
    let now = Instant::now();
    start(&mut p, 0, 30, now);
    let g = p.generation();

    for (input, expected) in [
        (-4.0, 0.0),
        (12.5, 12.5),
        (99.0, 30.0),
        (f64::NAN, 0.0),
        (f64::INFINITY, 30.0),
        (f64::NEG_INFINITY, 0.0),
    ] {
        p.seek(input);
        assert_eq!(p.session().progress_seconds, expected, "seek({input})");
    }
    assert!(probe.calls().contains(&Call::Seek(g, Duration::from_secs(30))));
}

#[test]
fn seek_without_a_track_stays_at_zero() {
    let (mut p, _) = player(2);
    p.seek(10.0);
    assert_eq!(p.session().progress_seconds, 0.0);
}

#[test]
fn replacing_tracks_resets_the_session() {
    let (mut p, probe) = player(3);
    let now = Instant::now();
    start(&mut p, 2, 60, now);
    p.seek(20.0);
    p.set_continue_playing(true);
    p.set_playback_rate(1.3).unwrap();
    let old = p.generation();

    p.replace_tracks(tracks(4));

    let s = p.session();
    assert_eq!(s.current_index, 0);
    assert!(!s.is_playing);
    assert!(!s.is_loading);
    assert_eq!(s.progress_seconds, 0.0);
    assert_eq!(s.duration_seconds, 0.0);
    assert_eq!(p.state(), PlayerState::Idle);
    assert!(probe.calls().contains(&Call::Stop(old)));
    // preferences survive the reset
    assert!(s.continue_playing);
    assert_eq!(s.playback_rate, 1.3);

    // late events from the old list are ignored
    p.handle_event(EngineEvent::ended(old), now);
    assert_eq!(p.state(), PlayerState::Idle);
}

#[test]
fn replacing_tracks_cancels_pending_auto_advance() {
    let (mut p, probe) = player(3);
    let now = Instant::now();
    p.set_continue_playing(true);
    start(&mut p, 0, 10, now);
    p.handle_event(EngineEvent::ended(p.generation()), now);
    assert_eq!(p.state(), PlayerState::AutoAdvancePending);

    p.replace_tracks(tracks(3));
    let loads_before = probe.loads().len();
    p.tick(now + Duration::from_secs(60));
    assert_eq!(probe.loads().len(), loads_before);
    assert_eq!(p.state(), PlayerState::Idle);
    assert_eq!(p.next_deadline(), None);
}

#[test]
fn ended_with_continue_playing_advances_after_delay() {
    let (mut p, probe) = player(3);
    let now = Instant::now();
    p.set_continue_playing(true);
    start(&mut p, 0, 10, now);

    p.handle_event(EngineEvent::ended(p.generation()), now);
    assert_eq!(p.state(), PlayerState::AutoAdvancePending);
    assert!(p.session().pending_auto_advance);
    assert_eq!(p.session().progress_seconds, 10.0);
    assert_eq!(p.next_deadline(), Some(now + Duration::from_secs(8)));
    assert_eq!(
        p.auto_advance_remaining(now + Duration::from_secs(3)),
        Some(Duration::from_secs(5))
    );

    p.tick(now + Duration::from_millis(7999));
    assert_eq!(p.state(), PlayerState::AutoAdvancePending);
    assert_eq!(p.session().current_index, 0);

    p.tick(now + Duration::from_secs(8));
    assert_eq!(p.session().current_index, 1);
    assert_eq!(p.state(), PlayerState::Loading);
    assert!(!p.session().pending_auto_advance);
    assert_eq!(probe.loads().last().unwrap().1, "/audio/1/1/1.mp3");

    p.handle_event(
        EngineEvent::ready(p.generation(), Duration::from_secs(12)),
        now + Duration::from_secs(9),
    );
    assert_eq!(p.state(), PlayerState::Playing);
}

#[test]
fn ended_without_continue_playing_stops_at_start() {
    let (mut p, probe) = player(3);
    let now = Instant::now();
    start(&mut p, 1, 10, now);
    p.seek(9.0);
    let g = p.generation();

    p.handle_event(EngineEvent::ended(g), now);
    assert!(!p.session().is_playing);
    assert_eq!(p.session().progress_seconds, 0.0);
    assert_eq!(p.session().current_index, 1);
    assert_eq!(p.state(), PlayerState::Idle);
    assert!(probe.calls().contains(&Call::Stop(g)));

    let loads = probe.loads().len();
    p.tick(now + Duration::from_secs(60));
    assert_eq!(probe.loads().len(), loads);

    // play again restarts the same track
    p.toggle_play_pause().unwrap();
    assert_eq!(p.state(), PlayerState::Loading);
    assert_eq!(p.session().current_index, 1);
}

#[test]
fn toggle_during_auto_advance_skips_the_delay() {
    let (mut p, _) = player(3);
    let now = Instant::now();
    p.set_continue_playing(true);
    start(&mut p, 1, 10, now);
    p.handle_event(EngineEvent::ended(p.generation()), now);

    p.toggle_play_pause().unwrap();
    assert_eq!(p.session().current_index, 2);
    assert_eq!(p.state(), PlayerState::Loading);

    // the cancelled timer must not fire a second advance
    p.tick(now + Duration::from_secs(8));
    assert_eq!(p.session().current_index, 2);
}

#[test]
fn pause_during_auto_advance_cancels_it_until_toggled() {
    let (mut p, _) = player(3);
    let now = Instant::now();
    p.set_continue_playing(true);
    start(&mut p, 0, 10, now);
    p.handle_event(EngineEvent::ended(p.generation()), now);

    p.pause();
    p.tick(now + Duration::from_secs(20));
    assert_eq!(p.session().current_index, 0);
    assert_eq!(p.state(), PlayerState::AutoAdvancePending);

    p.toggle_play_pause().unwrap();
    assert_eq!(p.session().current_index, 1);
}

#[test]
fn auto_advance_wraps_from_last_track() {
    let (mut p, _) = player(3);
    let now = Instant::now();
    p.set_continue_playing(true);
    start(&mut p, 2, 10, now);
    p.handle_event(EngineEvent::ended(p.generation()), now);
    p.tick(now + Duration::from_secs(8));
    assert_eq!(p.session().current_index, 0);
}

#[test]
fn toggle_play_pause_cycles_states() {
    let (mut p, probe) = player(2);
    let now = Instant::now();

    p.toggle_play_pause().unwrap();
    assert_eq!(p.state(), PlayerState::Loading);
    assert_eq!(p.session().current_index, 0);
    p.handle_event(EngineEvent::ready(p.generation(), Duration::from_secs(5)), now);
    let g = p.generation();

    p.toggle_play_pause().unwrap();
    assert_eq!(p.state(), PlayerState::Paused);
    assert!(!p.session().is_playing);

    p.toggle_play_pause().unwrap();
    assert_eq!(p.state(), PlayerState::Playing);
    assert!(p.session().is_playing);

    let calls = probe.calls();
    assert!(calls.contains(&Call::Pause(g)));
    assert!(calls.contains(&Call::Play(g)));
}

#[test]
fn pausing_while_loading_lands_paused() {
    let (mut p, _) = player(2);
    let now = Instant::now();
    p.select_track(0).unwrap();
    p.toggle_play_pause().unwrap();
    assert_eq!(p.state(), PlayerState::Loading);
    assert!(!p.session().is_playing);

    p.handle_event(EngineEvent::ready(p.generation(), Duration::from_secs(5)), now);
    assert_eq!(p.state(), PlayerState::Paused);
    assert!(!p.session().is_loading);
}

#[test]
fn stale_events_are_ignored() {
    let (mut p, _) = player(3);
    let now = Instant::now();
    p.select_track(0).unwrap();
    let old = p.generation();
    p.select_track(1).unwrap();

    p.handle_event(EngineEvent::ready(old, Duration::from_secs(99)), now);
    assert_eq!(p.state(), PlayerState::Loading);
    assert_eq!(p.session().duration_seconds, 0.0);

    p.handle_event(EngineEvent::failed(old, "boom"), now);
    assert_eq!(p.state(), PlayerState::Loading);
    assert!(p.session().is_loading);
}

#[test]
fn load_failure_clears_loading_and_keeps_index() {
    let (mut p, probe) = player(3);
    let now = Instant::now();
    p.select_track(2).unwrap();
    let g = p.generation();

    p.handle_event(EngineEvent::failed(g, "404"), now);
    assert!(!p.session().is_loading);
    assert!(!p.session().is_playing);
    assert_eq!(p.session().current_index, 2);
    assert_eq!(p.state(), PlayerState::Idle);
    assert!(probe.calls().contains(&Call::Stop(g)));

    // no retry on its own
    let loads = probe.loads().len();
    p.tick(now + Duration::from_secs(30));
    assert_eq!(probe.loads().len(), loads);
}

#[test]
fn pump_drains_engine_events() {
    let (mut p, probe) = player(2);
    let now = Instant::now();
    p.select_track(0).unwrap();
    probe.queue(EngineEvent::ready(p.generation(), Duration::from_secs(7)));

    p.pump(now);
    assert_eq!(p.state(), PlayerState::Playing);
    assert_eq!(p.session().duration_seconds, 7.0);
}

#[test]
fn progress_is_polled_only_while_playing() {
    let (mut p, probe) = player(1);
    let now = Instant::now();
    start(&mut p, 0, 60, now);
    let interval = PlayerConfig::default().poll_interval;

    probe.position.set(Duration::from_secs(4));
    p.tick(now);
    assert_eq!(p.session().progress_seconds, 4.0);

    // not due yet
    probe.position.set(Duration::from_secs(5));
    p.tick(now + interval / 2);
    assert_eq!(p.session().progress_seconds, 4.0);

    p.tick(now + interval);
    assert_eq!(p.session().progress_seconds, 5.0);

    p.pause();
    probe.position.set(Duration::from_secs(50));
    p.tick(now + interval * 10);
    assert_eq!(p.session().progress_seconds, 5.0);
    assert_eq!(p.next_deadline(), None);
}

#[test]
fn rate_applies_live_and_at_load() {
    let (mut p, probe) = player(2);
    p.set_playback_rate(1.5).unwrap();
    p.select_track(0).unwrap();
    let g = p.generation();
    assert!(matches!(probe.loads().last(), Some((lg, _)) if *lg == g));
    assert!(probe
        .calls()
        .contains(&Call::Load(g, "/audio/1/1/0.mp3".into(), 1.5)));

    p.set_playback_rate(0.8).unwrap();
    assert!(probe.calls().contains(&Call::Rate(g, 0.8)));
    assert_eq!(p.state(), PlayerState::Loading);

    assert_eq!(p.set_playback_rate(0.0), Err(PlayerError::InvalidRate(0.0)));
    assert_eq!(p.session().playback_rate, 0.8);
}

#[test]
fn rate_steps_stay_on_the_ladder() {
    let (mut p, _) = player(1);
    p.step_playback_rate(1).unwrap();
    assert!((p.session().playback_rate - 1.1).abs() < 1e-6);

    for _ in 0..20 {
        p.step_playback_rate(1).unwrap();
    }
    assert!((p.session().playback_rate - 1.5).abs() < 1e-6);

    for _ in 0..20 {
        p.step_playback_rate(-1).unwrap();
    }
    assert!((p.session().playback_rate - 0.5).abs() < 1e-6);
}

#[test]
fn rate_steps_follow_a_fine_grained_ladder() {
    let probe = Probe::default();
    let config = PlayerConfig {
        rate_step: 0.125,
        ..PlayerConfig::default()
    };
    let mut p = PlayerController::new(
        ScriptedEngine {
            probe: probe.clone(),
        },
        config,
    );
    p.step_playback_rate(1).unwrap();
    assert!((p.session().playback_rate - 1.125).abs() < 1e-6);
    p.step_playback_rate(-2).unwrap();
    assert!((p.session().playback_rate - 0.875).abs() < 1e-6);
}

#[test]
fn dropping_the_controller_releases_the_handle() {
    let (mut p, probe) = player(1);
    p.select_track(0).unwrap();
    let g = p.generation();
    drop(p);
    assert!(probe.calls().contains(&Call::Stop(g)));
}
