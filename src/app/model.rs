//! Application model: the loaded dataset, the active route and the views
//! derived from it (groups, pages, tracks), plus the list cursor.

use tracing::info;

use crate::dataset::{Dataset, PageEntry, Track, groups, pages_for, tracks_for};
use crate::route::Route;

/// The main application model.
pub struct App {
    pub dataset: Dataset,
    pub route: Route,
    pub groups: Vec<String>,
    pub pages: Vec<PageEntry>,
    pub tracks: Vec<Track>,
    /// Cursor position in the track list.
    pub selected: usize,
    pub source_label: Option<String>,
}

impl App {
    /// Create a new `App` showing `route` of `dataset`.
    pub fn new(dataset: Dataset, route: Route) -> Self {
        let mut app = Self {
            groups: groups(&dataset.rows),
            dataset,
            route,
            pages: Vec::new(),
            tracks: Vec::new(),
            selected: 0,
            source_label: None,
        };
        app.rebuild();
        app
    }

    /// Record where the dataset came from, for the status line.
    pub fn set_source_label(&mut self, label: String) {
        self.source_label = Some(label);
    }

    /// Switch to `route`. Returns true when the track list changed identity,
    /// i.e. the player must be torn down and handed the new list.
    pub fn navigate(&mut self, route: Route) -> bool {
        if route == self.route {
            return false;
        }
        info!(from = %self.route, to = %route, "navigating");
        self.route = route;
        self.rebuild();
        true
    }

    fn rebuild(&mut self) {
        let rows = &self.dataset.rows;
        self.pages = pages_for(rows, &self.route.group);
        self.tracks = tracks_for(rows, &self.route.group, &self.route.page);
        self.selected = 0;
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Position of the active page in the page selector, if it has one.
    pub fn page_position(&self) -> Option<usize> {
        let current = self.route.page.trim().parse::<u32>().ok()?;
        self.pages.iter().position(|p| p.number == current)
    }

    /// Route to the page `offset` steps away in the selector, wrapping.
    pub fn page_route(&self, offset: isize) -> Option<Route> {
        let len = self.pages.len();
        if len == 0 {
            return None;
        }
        let target = match self.page_position() {
            Some(pos) => wrap(pos, offset, len),
            None => 0,
        };
        Some(Route::new(
            self.route.group.clone(),
            self.pages[target].number.to_string(),
        ))
    }

    /// Route to the first page of the group `offset` steps away, wrapping.
    pub fn group_route(&self, offset: isize) -> Option<Route> {
        let len = self.groups.len();
        if len == 0 {
            return None;
        }
        let target = match self.groups.iter().position(|g| *g == self.route.group) {
            Some(pos) => wrap(pos, offset, len),
            None => 0,
        };
        let group = self.groups[target].clone();
        let page = pages_for(&self.dataset.rows, &group)
            .first()
            .map(|p| p.number.to_string())
            .unwrap_or_else(|| "1".to_string());
        Some(Route::new(group, page))
    }

    /// Label of the active page, if the selector knows it.
    pub fn page_label(&self) -> Option<&str> {
        self.page_position().map(|i| self.pages[i].label.as_str())
    }

    /// Move the cursor down one entry, wrapping.
    pub fn next(&mut self) {
        if self.has_tracks() {
            self.selected = (self.selected + 1) % self.tracks.len();
        }
    }

    /// Move the cursor up one entry, wrapping.
    pub fn prev(&mut self) {
        if self.has_tracks() {
            self.selected = (self.selected + self.tracks.len() - 1) % self.tracks.len();
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.tracks.len().saturating_sub(1);
    }

    /// Set the cursor, ignoring out-of-range indices.
    pub fn set_selected(&mut self, idx: usize) {
        if idx < self.tracks.len() {
            self.selected = idx;
        }
    }
}

fn wrap(pos: usize, offset: isize, len: usize) -> usize {
    (pos as isize + offset).rem_euclid(len as isize) as usize
}
