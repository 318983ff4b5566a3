//! TUI application state
//!
//! [`App`] hosts every stream (search, stats, upload, explain) and reduces
//! [`AppEvent`]s one at a time. Network calls and timers run as spawned
//! tasks that only ever send events back on the same channel.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use async_channel::Sender;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::api::{ApiClient, ApiError, StatsSnapshot, UploadOutcome};
use crate::config::Config;
use crate::core::explain::ExplainStream;
use crate::core::timer::spawn_after;
use crate::core::{
    SearchEffect, SearchEvent, SearchOrchestrator, StatsPoller, UploadCoordinator, UploadRequest,
};
use crate::render::{Clipboard, ResultView};

/// Min score change per keypress
const SCORE_STEP: f32 = 0.05;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// Redraw heartbeat (spinner, copy confirmation expiry)
    Tick,
    Search(SearchEvent),
    StatsTick,
    StatsCompleted {
        seq: u64,
        result: Result<StatsSnapshot, ApiError>,
    },
    UploadCompleted {
        seq: u64,
        result: Result<UploadOutcome, ApiError>,
    },
    ExplainCompleted {
        seq: u64,
        text: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Query,
    Filters,
    Results,
    Upload,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Query => Focus::Filters,
            Focus::Filters => Focus::Results,
            Focus::Results => Focus::Upload,
            Focus::Upload => Focus::Query,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Query => Focus::Upload,
            Focus::Filters => Focus::Query,
            Focus::Results => Focus::Filters,
            Focus::Upload => Focus::Results,
        }
    }
}

pub struct App {
    client: Arc<ApiClient>,
    tx: Sender<AppEvent>,
    clipboard: Box<dyn Clipboard>,

    pub(super) search: SearchOrchestrator,
    pub(super) results: ResultView,
    pub(super) stats: StatsPoller,
    pub(super) upload: UploadCoordinator,
    pub(super) explain: ExplainStream,

    pub(super) languages: Vec<String>,
    pub(super) focus: Focus,
    pub(super) upload_path: String,
    /// Row in the filter panel; one past the last language is the score row
    pub(super) filter_cursor: usize,
    pub(super) selected: usize,
    pub(super) spinner_frame: usize,
    quit: bool,
}

impl App {
    pub fn new(
        config: &Config,
        client: Arc<ApiClient>,
        tx: Sender<AppEvent>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        Self {
            client,
            tx,
            clipboard,
            search: SearchOrchestrator::new(config.search.top_k, config.search.debounce()),
            results: ResultView::new(),
            stats: StatsPoller::new(),
            upload: UploadCoordinator::new(config.upload.languages.clone()),
            explain: ExplainStream::default(),
            languages: config.search.available_languages.clone(),
            focus: Focus::Query,
            upload_path: String::new(),
            filter_cursor: 0,
            selected: 0,
            spinner_frame: 0,
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Resize => {}
            AppEvent::Tick => self.spinner_frame = self.spinner_frame.wrapping_add(1),
            AppEvent::Search(event) => self.dispatch(event),
            AppEvent::StatsTick => self.refresh_stats(),
            AppEvent::StatsCompleted { seq, result } => {
                self.stats.complete(seq, result, Local::now());
            }
            AppEvent::UploadCompleted { seq, result } => {
                self.upload.complete(seq, result);
                if self.upload.selected().is_none() {
                    self.upload_path.clear();
                }
            }
            AppEvent::ExplainCompleted { seq, text } => self.explain.complete(seq, text),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.quit = true;
                return;
            }
            KeyCode::Char('k') if ctrl => {
                self.focus = Focus::Query;
                return;
            }
            KeyCode::Char('r') if ctrl => {
                self.refresh_stats();
                return;
            }
            KeyCode::Esc => {
                if self.explain.is_open() {
                    self.explain.close();
                } else {
                    self.quit = true;
                }
                return;
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return;
            }
            _ => {}
        }

        // The explanation popup is modal
        if self.explain.is_open() {
            return;
        }

        match self.focus {
            Focus::Query => self.on_query_key(key.code, ctrl),
            Focus::Filters => self.on_filter_key(key.code),
            Focus::Results => self.on_results_key(key.code),
            Focus::Upload => self.on_upload_key(key.code, ctrl),
        }
    }

    fn on_query_key(&mut self, code: KeyCode, ctrl: bool) {
        match code {
            KeyCode::Char('u') if ctrl => self.dispatch(SearchEvent::InputChanged(String::new())),
            KeyCode::Char(c) if !ctrl => {
                let mut text = self.search.query().to_string();
                text.push(c);
                self.dispatch(SearchEvent::InputChanged(text));
            }
            KeyCode::Backspace => {
                let mut text = self.search.query().to_string();
                if text.pop().is_some() {
                    self.dispatch(SearchEvent::InputChanged(text));
                }
            }
            KeyCode::Enter => self.dispatch(SearchEvent::Submit),
            KeyCode::Down if !self.results.is_empty() => self.focus = Focus::Results,
            _ => {}
        }
    }

    fn on_filter_key(&mut self, code: KeyCode) {
        let score_row = self.languages.len();
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.filter_cursor = self.filter_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.filter_cursor = (self.filter_cursor + 1).min(score_row);
            }
            KeyCode::Char(' ') | KeyCode::Enter if self.filter_cursor < score_row => {
                let lang = self.languages[self.filter_cursor].clone();
                self.dispatch(SearchEvent::ToggleLanguage(lang));
            }
            KeyCode::Left | KeyCode::Char('-') if self.filter_cursor == score_row => {
                self.step_min_score(-SCORE_STEP);
            }
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=')
                if self.filter_cursor == score_row =>
            {
                self.step_min_score(SCORE_STEP);
            }
            KeyCode::Char('c') => self.dispatch(SearchEvent::ClearFilters),
            _ => {}
        }
    }

    fn step_min_score(&mut self, delta: f32) {
        let current = self.search.filters().min_score().unwrap_or(0.0);
        let next = ((current + delta) * 100.0).round() / 100.0;
        self.dispatch(SearchEvent::SetMinScore(next));
    }

    fn on_results_key(&mut self, code: KeyCode) {
        let count = self.results.len();
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected == 0 {
                    self.focus = Focus::Query;
                } else {
                    self.selected -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') if count > 0 => {
                self.selected = (self.selected + 1).min(count - 1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(card) = self.results.card_mut(self.selected) {
                    card.toggle_expanded();
                }
            }
            KeyCode::Char('y') => {
                let now = Instant::now();
                if let Some(card) = self.results.card_mut(self.selected) {
                    card.copy(self.clipboard.as_mut(), now);
                }
            }
            KeyCode::Char('e') => self.explain_selected(),
            KeyCode::Char('/') => self.focus = Focus::Query,
            _ => {}
        }
    }

    fn on_upload_key(&mut self, code: KeyCode, ctrl: bool) {
        // The path is locked until the running upload reports back
        if self.upload.is_uploading() {
            return;
        }
        match code {
            KeyCode::Char(c) if !ctrl => self.upload_path.push(c),
            KeyCode::Backspace => {
                self.upload_path.pop();
            }
            KeyCode::Enter => self.start_upload(),
            _ => {}
        }
    }

    /// Run a search event through the orchestrator and execute its effects
    fn dispatch(&mut self, event: SearchEvent) {
        for effect in self.search.handle(event) {
            match effect {
                SearchEffect::ScheduleDebounce { generation, delay } => {
                    spawn_after(
                        delay,
                        self.tx.clone(),
                        AppEvent::Search(SearchEvent::DebounceElapsed(generation)),
                    );
                }
                SearchEffect::Issue { seq, request } => {
                    let client = Arc::clone(&self.client);
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        let result = client.search(&request).await;
                        let _ = tx
                            .send(AppEvent::Search(SearchEvent::Completed { seq, result }))
                            .await;
                    });
                }
            }
        }

        if self.results.sync(self.search.revision(), self.search.results()) {
            self.selected = 0;
        }
    }

    fn refresh_stats(&mut self) {
        let seq = self.stats.request();
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.get_stats().await;
            let _ = tx.send(AppEvent::StatsCompleted { seq, result }).await;
        });
    }

    fn start_upload(&mut self) {
        let path = self.upload_path.trim();
        if path.is_empty() || !self.upload.select(PathBuf::from(path)) {
            return;
        }
        let Some(UploadRequest {
            seq,
            archive,
            languages,
        }) = self.upload.upload()
        else {
            return;
        };

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.index_upload(&archive, &languages).await;
            let _ = tx.send(AppEvent::UploadCompleted { seq, result }).await;
        });
    }

    fn explain_selected(&mut self) {
        let Some(card) = self.results.cards().get(self.selected) else {
            return;
        };
        let result = card.result();
        let title = format!("{}:{}", result.file_path, result.start_line);
        let code = result.code.clone();
        let query = self.search.query().trim().to_string();

        let seq = self.explain.request(title);
        debug!(seq, "Requesting explanation");
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let text = client.explain_code(&code, &query).await;
            let _ = tx.send(AppEvent::ExplainCompleted { seq, text }).await;
        });
    }
}
