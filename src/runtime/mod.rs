use std::env;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::RodioEngine;
use crate::player::{PlayerConfig, PlayerController};
use crate::resource::http_client;
use crate::route::Route;

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    match logging::init(&settings.log) {
        Ok(path) => info!(log = %path.display(), "weekdeck starting"),
        Err(e) => eprintln!("weekdeck: logging disabled: {e}"),
    }

    // weekdeck [DATASET] [ROUTE]
    let mut args = env::args().skip(1);
    let source = args
        .next()
        .unwrap_or_else(|| settings.dataset.source.clone());
    let home = Route::new(
        settings.dataset.default_group.clone(),
        settings.dataset.default_page.clone(),
    );
    let route = args
        .next()
        .map(|r| Route::resolve(&r, &home))
        .unwrap_or(home);

    let client = http_client(Duration::from_secs(settings.dataset.http_timeout_secs))?;
    let dataset = startup::load_dataset_or_empty(&source, &client);

    let engine = RodioEngine::open(client)?;
    let mut player = PlayerController::new(engine, PlayerConfig::from(&settings.playback));
    startup::apply_playback_defaults(&mut player, &settings);

    let mut app = App::new(dataset, route);
    app.set_source_label(source);
    player.replace_tracks(app.tracks.clone());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::new(&player);
    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut player, &mut state);

    player.teardown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("weekdeck exiting");
    run_result
}
