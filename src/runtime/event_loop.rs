use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

use crate::app::App;
use crate::config;
use crate::player::{PlaybackEngine, PlayerController, PlayerError};
use crate::route::Route;
use crate::ui::{self, PlayerView};

/// Upper bound on how long the loop waits for input before redrawing.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Player index last mirrored into the list cursor.
    pub last_player_index: usize,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `player`.
    pub fn new<E: PlaybackEngine>(player: &PlayerController<E>) -> Self {
        Self {
            pending_gg: false,
            last_player_index: player.session().current_index,
        }
    }
}

/// Main terminal event loop: drives the player's timers and engine events,
/// draws, and dispatches keys. Returns `Ok(())` when the user quits.
pub fn run<E: PlaybackEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut PlayerController<E>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let now = Instant::now();
        player.pump(now);

        // Keep the cursor on the playing track when the player moves by itself.
        let idx = player.session().current_index;
        if idx != state.last_player_index {
            app.set_selected(idx);
            state.last_player_index = idx;
        }

        let view = PlayerView {
            state: player.state(),
            session: player.session(),
            track: player.current_track(),
            auto_advance_in: player.auto_advance_remaining(now),
        };
        terminal.draw(|f| ui::draw(f, app, &view, &settings.ui, &settings.controls))?;

        let timeout = player
            .next_deadline()
            .map(|d| d.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL)
            .min(IDLE_POLL);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, player, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn report(result: Result<(), PlayerError>) {
    if let Err(e) = result {
        warn!(error = %e, "player command rejected");
    }
}

/// Switch routes; a new track list means a fresh player session.
fn go_to<E: PlaybackEngine>(app: &mut App, player: &mut PlayerController<E>, route: Option<Route>) {
    if let Some(route) = route {
        if app.navigate(route) {
            player.replace_tracks(app.tracks.clone());
        }
    }
}

/// Returns true when the app should quit.
fn handle_key_event<E: PlaybackEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut PlayerController<E>,
    state: &mut EventLoopState,
) -> bool {
    let pending_gg = std::mem::take(&mut state.pending_gg);
    let seek_step = settings.controls.seek_seconds as f64;

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Char('g') => {
            if pending_gg {
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Enter => {
            if app.has_tracks() {
                report(player.select_track(app.selected));
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => report(player.toggle_play_pause()),
        KeyCode::Char('l') => report(player.next()),
        KeyCode::Char('h') => report(player.prev()),
        KeyCode::Char('L') => player.seek_by(seek_step),
        KeyCode::Char('H') => player.seek_by(-seek_step),
        KeyCode::Char(']') => {
            let route = app.page_route(1);
            go_to(app, player, route);
        }
        KeyCode::Char('[') => {
            let route = app.page_route(-1);
            go_to(app, player, route);
        }
        KeyCode::Char('}') => {
            let route = app.group_route(1);
            go_to(app, player, route);
        }
        KeyCode::Char('{') => {
            let route = app.group_route(-1);
            go_to(app, player, route);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => report(player.step_playback_rate(1)),
        KeyCode::Char('-') => report(player.step_playback_rate(-1)),
        KeyCode::Char('c') => player.toggle_continue_playing(),
        _ => {}
    }

    false
}
