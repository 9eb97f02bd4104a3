//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Gauge, List, ListItem, Padding, Paragraph, Tabs, Wrap},
};

use crate::app::App;
use crate::config::{ControlsSettings, UiSettings};
use crate::dataset::Track;
use crate::player::{PlayerState, Session};

/// What the player looks like this frame.
pub struct PlayerView<'a> {
    pub state: PlayerState,
    pub session: &'a Session,
    pub track: Option<&'a Track>,
    pub auto_advance_in: Option<Duration>,
}

const CONTROLS: [(&str, &str); 10] = [
    ("j/k", "up/down"),
    ("enter", "play selected"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("[/]", "page"),
    ("{/}", "week"),
    ("-/+", "speed"),
    ("c", "continue"),
    ("gg/G", "top/bottom"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating seek seconds.
fn controls_text(seek_seconds: u64) -> String {
    let mut parts: Vec<String> = CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect();
    parts.insert(4, format!("[H/L] seek -/+{seek_seconds}s"));
    parts.join(" | ")
}

/// Format seconds as `M:SS`.
fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

fn format_rate(rate: f32) -> String {
    format!("{:.1}x", rate)
}

fn now_playing_title(view: &PlayerView<'_>) -> String {
    match view.track {
        Some(t) => t.title.clone(),
        None => "No tracks on this page".to_string(),
    }
}

fn state_text(view: &PlayerView<'_>) -> String {
    match view.state {
        PlayerState::Idle => "Stopped".to_string(),
        PlayerState::Loading if view.session.is_playing => "Loading…".to_string(),
        PlayerState::Loading => "Loading (paused)…".to_string(),
        PlayerState::Playing => "Playing".to_string(),
        PlayerState::Paused => "Paused".to_string(),
        PlayerState::AutoAdvancePending => match view.auto_advance_in {
            Some(left) => format!("Next in {}s", left.as_secs_f64().ceil() as u64),
            None => "Next on play".to_string(),
        },
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    player: &PlayerView<'_>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let title = format!(" {} {} ", ui_settings.group_label, app.route.group);
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Page selector
    let page_titles: Vec<Line> = app
        .pages
        .iter()
        .map(|p| {
            if p.label.trim().is_empty() {
                Line::from(p.number.to_string())
            } else {
                Line::from(p.label.clone())
            }
        })
        .collect();
    let tabs = Tabs::new(page_titles)
        .select(app.page_position())
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(Block::default().borders(Borders::ALL).title(" pages "));
    frame.render_widget(tabs, chunks[1]);

    // Now playing
    {
        let session = player.session;
        let area = chunks[2];
        let block = Block::bordered()
            .padding(Padding {
                left: 1,
                right: 1,
                top: 0,
                bottom: 0,
            })
            .title(" now playing ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        frame.render_widget(Paragraph::new(now_playing_title(player)).bold(), rows[0]);

        let time = if session.is_loading {
            "--:-- / --:--".to_string()
        } else {
            format!(
                "{} / {}",
                format_time(session.progress_seconds),
                format_time(session.duration_seconds)
            )
        };
        let ratio = if session.duration_seconds > 0.0 {
            (session.progress_seconds / session.duration_seconds).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let gauge = Gauge::default()
            .ratio(ratio)
            .label(time)
            .gauge_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_widget(gauge, rows[1]);

        let mut parts = vec![
            state_text(player),
            format!("Speed: {}", format_rate(session.playback_rate)),
            format!(
                "Continue: {}",
                if session.continue_playing { "ON" } else { "OFF" }
            ),
        ];
        if let Some(label) = app.page_label() {
            parts.push(format!("Page: {label}"));
        }
        if let Some(src) = &app.source_label {
            parts.push(format!("Source: {src}"));
        }
        frame.render_widget(Paragraph::new(parts.join(" • ")), rows[2]);
    }

    // Track list
    {
        let playing_index = Some(player.session.current_index);
        let items: Vec<ListItem> = app
            .tracks
            .iter()
            .enumerate()
            .map(|(i, t)| {
                if Some(i) == playing_index {
                    ListItem::new(format!("♪ {}", t.title))
                        .style(Style::default().add_modifier(Modifier::UNDERLINED))
                } else {
                    ListItem::new(format!("  {}", t.title))
                }
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if app.has_tracks() {
            state.select(Some(app.selected));
        }
        frame.render_stateful_widget(list, chunks[3], &mut state);
    }

    let footer = Paragraph::new(controls_text(controls_settings.seek_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[4]);
}
