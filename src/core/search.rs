//! Search orchestration
//!
//! [`SearchOrchestrator`] is a reducer: every user action, timer and network
//! completion comes in as a [`SearchEvent`], and whatever has to happen in
//! the outside world comes back out as [`SearchEffect`]s. The driver (TUI
//! loop or CLI command) executes effects and feeds completions back in.

use std::time::Duration;

use tracing::{debug, info};

use super::debounce::{DebounceAction, Debouncer};
use super::filters::FilterState;
use super::status::{RequestStatus, Sequencer};
use crate::api::{ApiError, SearchOutcome, SearchRequest, SearchResult};

#[derive(Debug)]
pub enum SearchEvent {
    /// The query text changed (every keystroke)
    InputChanged(String),
    /// A debounce timer elapsed
    DebounceElapsed(u64),
    /// Search now, skipping the quiet period
    Submit,
    ToggleLanguage(String),
    SetMinScore(f32),
    ClearFilters,
    /// A search request finished
    Completed {
        seq: u64,
        result: Result<SearchOutcome, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEffect {
    /// Report `generation` back as [`SearchEvent::DebounceElapsed`] after `delay`
    ScheduleDebounce { generation: u64, delay: Duration },
    /// Send `request` and report back as [`SearchEvent::Completed`] with `seq`
    Issue { seq: u64, request: SearchRequest },
}

pub struct SearchOrchestrator {
    query: String,
    top_k: usize,
    filters: FilterState,
    debouncer: Debouncer,
    sequencer: Sequencer,
    status: RequestStatus,
    outcome: Option<SearchOutcome>,
    /// Bumped every time the visible result set is replaced or cleared
    revision: u64,
}

impl SearchOrchestrator {
    pub fn new(top_k: usize, quiet: Duration) -> Self {
        Self {
            query: String::new(),
            top_k,
            filters: FilterState::new(),
            debouncer: Debouncer::new(quiet),
            sequencer: Sequencer::default(),
            status: RequestStatus::Idle,
            outcome: None,
            revision: 0,
        }
    }

    pub fn with_filters(mut self, filters: FilterState) -> Self {
        self.filters = filters;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.status.error()
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn results(&self) -> &[SearchResult] {
        self.outcome
            .as_ref()
            .map(|o| o.results.as_slice())
            .unwrap_or(&[])
    }

    pub fn total_results(&self) -> usize {
        self.outcome.as_ref().map(|o| o.total_results).unwrap_or(0)
    }

    pub fn search_time(&self) -> f64 {
        self.outcome.as_ref().map(|o| o.search_time).unwrap_or(0.0)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn has_active_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn handle(&mut self, event: SearchEvent) -> Vec<SearchEffect> {
        match event {
            SearchEvent::InputChanged(text) => {
                self.query = text;
                match self.debouncer.input(&self.query) {
                    DebounceAction::Schedule { generation, delay } => {
                        vec![SearchEffect::ScheduleDebounce { generation, delay }]
                    }
                    DebounceAction::ClearNow => {
                        self.reset_view();
                        Vec::new()
                    }
                }
            }
            SearchEvent::DebounceElapsed(generation) => match self.debouncer.elapsed(generation) {
                Some(text) => self.issue(&text).into_iter().collect(),
                None => Vec::new(),
            },
            SearchEvent::Submit => {
                if self.has_active_query() {
                    self.reissue()
                } else {
                    self.debouncer.cancel();
                    self.reset_view();
                    Vec::new()
                }
            }
            SearchEvent::ToggleLanguage(lang) => {
                self.filters.toggle_language(&lang);
                self.reissue()
            }
            SearchEvent::SetMinScore(value) => {
                if self.filters.set_min_score(value) {
                    self.reissue()
                } else {
                    Vec::new()
                }
            }
            SearchEvent::ClearFilters => {
                self.filters.clear();
                self.reissue()
            }
            SearchEvent::Completed { seq, result } => {
                self.complete(seq, result);
                Vec::new()
            }
        }
    }

    /// Search again right away with the current text and filters.
    fn reissue(&mut self) -> Vec<SearchEffect> {
        if !self.has_active_query() {
            return Vec::new();
        }
        self.debouncer.cancel();
        let query = self.query.clone();
        self.issue(&query).into_iter().collect()
    }

    fn issue(&mut self, text: &str) -> Option<SearchEffect> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let seq = self.sequencer.next();
        self.status = RequestStatus::Loading;
        let request = self.filters.compose(text, self.top_k);
        info!(seq, query = %request.query, filters = self.filters.active_count(), "Issuing search");
        Some(SearchEffect::Issue { seq, request })
    }

    fn complete(&mut self, seq: u64, result: Result<SearchOutcome, ApiError>) {
        if !self.sequencer.is_current(seq) {
            debug!(seq, latest = self.sequencer.latest(), "Dropping stale search response");
            return;
        }

        match result {
            Ok(outcome) => {
                self.outcome = Some(outcome);
                self.status = RequestStatus::Success;
            }
            Err(err) => {
                debug!("Search failed: {err}");
                self.outcome = None;
                self.status = RequestStatus::Failed(err.user_message("perform search"));
            }
        }
        self.revision += 1;
    }

    /// Back to the initial empty view. In-flight requests become stale.
    fn reset_view(&mut self) {
        self.sequencer.invalidate();
        self.outcome = None;
        self.status = RequestStatus::Idle;
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timer::spawn_after;

    const QUIET: Duration = Duration::from_millis(500);

    fn result(path: &str, score: f32) -> SearchResult {
        SearchResult {
            code: "def walk(graph):\n    pass".to_string(),
            file_path: path.to_string(),
            start_line: 1,
            end_line: 2,
            language: "python".to_string(),
            score,
            function_name: None,
        }
    }

    fn outcome(paths: &[&str]) -> SearchOutcome {
        SearchOutcome {
            results: paths.iter().map(|p| result(p, 0.8)).collect(),
            query: String::new(),
            total_results: paths.len(),
            search_time: 0.02,
        }
    }

    fn issued(effects: &[SearchEffect]) -> Vec<(u64, SearchRequest)> {
        effects
            .iter()
            .filter_map(|e| match e {
                SearchEffect::Issue { seq, request } => Some((*seq, request.clone())),
                _ => None,
            })
            .collect()
    }

    fn type_and_fire(orch: &mut SearchOrchestrator, text: &str) -> (u64, SearchRequest) {
        let effects = orch.handle(SearchEvent::InputChanged(text.to_string()));
        let generation = match effects.as_slice() {
            [SearchEffect::ScheduleDebounce { generation, .. }] => *generation,
            other => panic!("unexpected effects: {other:?}"),
        };
        let effects = orch.handle(SearchEvent::DebounceElapsed(generation));
        issued(&effects).pop().expect("search issued")
    }

    #[test]
    fn test_empty_query_never_issues() {
        let mut orch = SearchOrchestrator::new(20, QUIET);
        assert!(orch.handle(SearchEvent::InputChanged("   ".into())).is_empty());
        assert!(orch.handle(SearchEvent::Submit).is_empty());
        assert!(orch.results().is_empty());
        assert!(orch.error().is_none());
        assert_eq!(orch.status(), &RequestStatus::Idle);
    }

    #[test]
    fn test_superseded_timer_is_ignored() {
        let mut orch = SearchOrchestrator::new(20, QUIET);
        let first = orch.handle(SearchEvent::InputChanged("gr".into()));
        let _second = orch.handle(SearchEvent::InputChanged("graph".into()));

        let stale = match first.as_slice() {
            [SearchEffect::ScheduleDebounce { generation, .. }] => *generation,
            other => panic!("unexpected effects: {other:?}"),
        };
        assert!(orch.handle(SearchEvent::DebounceElapsed(stale)).is_empty());
        assert!(!orch.is_loading());
    }

    #[test]
    fn test_success_replaces_results_atomically() {
        let mut orch = SearchOrchestrator::new(20, QUIET);
        let (seq, request) = type_and_fire(&mut orch, "find graph traversal algorithms");
        assert_eq!(request.query, "find graph traversal algorithms");
        assert_eq!(request.top_k, 20);
        assert!(orch.is_loading());

        orch.handle(SearchEvent::Completed {
            seq,
            result: Ok(outcome(&["a.py", "b.py"])),
        });
        assert_eq!(orch.status(), &RequestStatus::Success);
        assert_eq!(orch.results().len(), 2);
        assert_eq!(orch.total_results(), 2);
    }

    #[test]
    fn test_out_of_order_responses_keep_newest() {
        let mut orch = SearchOrchestrator::new(20, QUIET);
        let (old_seq, _) = type_and_fire(&mut orch, "tokens");
        let (new_seq, _) = type_and_fire(&mut orch, "token refresh");

        orch.handle(SearchEvent::Completed {
            seq: new_seq,
            result: Ok(outcome(&["new.py"])),
        });
        orch.handle(SearchEvent::Completed {
            seq: old_seq,
            result: Ok(outcome(&["old.py"])),
        });

        assert_eq!(orch.results().len(), 1);
        assert_eq!(orch.results()[0].file_path, "new.py");
    }

    #[test]
    fn test_stale_failure_does_not_clear_newer_results() {
        let mut orch = SearchOrchestrator::new(20, QUIET);
        let (old_seq, _) = type_and_fire(&mut orch, "tokens");
        let (new_seq, _) = type_and_fire(&mut orch, "token refresh");

        orch.handle(SearchEvent::Completed {
            seq: new_seq,
            result: Ok(outcome(&["new.py"])),
        });
        orch.handle(SearchEvent::Completed {
            seq: old_seq,
            result: Err(ApiError::Timeout),
        });
        assert!(orch.error().is_none());
        assert_eq!(orch.results().len(), 1);
    }

    #[test]
    fn test_failure_clears_results_and_keeps_query() {
        let mut orch = SearchOrchestrator::new(20, QUIET);
        let (seq, _) = type_and_fire(&mut orch, "auth");
        orch.handle(SearchEvent::Completed {
            seq,
            result: Ok(outcome(&["auth.py"])),
        });

        let (seq, _) = type_and_fire(&mut orch, "auth middleware");
        orch.handle(SearchEvent::Completed {
            seq,
            result: Err(ApiError::Timeout),
        });

        assert!(orch.results().is_empty());
        assert_eq!(orch.query(), "auth middleware");
        assert_eq!(
            orch.error(),
            Some("Failed to perform search. Is the backend running?")
        );
    }

    #[test]
    fn test_clearing_input_discards_in_flight_response() {
        let mut orch = SearchOrchestrator::new(20, QUIET);
        let (seq, _) = type_and_fire(&mut orch, "auth");
        orch.handle(SearchEvent::InputChanged(String::new()));
        orch.handle(SearchEvent::Completed {
            seq,
            result: Ok(outcome(&["late.py"])),
        });
        assert!(orch.results().is_empty());
        assert_eq!(orch.status(), &RequestStatus::Idle);
    }

    #[test]
    fn test_filter_changes_issue_immediately() {
        let mut orch = SearchOrchestrator::new(20, QUIET);
        type_and_fire(&mut orch, "database queries");

        let effects = orch.handle(SearchEvent::ToggleLanguage("go".into()));
        let requests = issued(&effects);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].1.language_filter, Some(vec!["go".to_string()]));

        let effects = orch.handle(SearchEvent::SetMinScore(0.6));
        assert_eq!(issued(&effects)[0].1.min_score, Some(0.6));
    }

    #[test]
    fn test_filter_change_cancels_pending_debounce() {
        let mut orch = SearchOrchestrator::new(20, QUIET);
        let effects = orch.handle(SearchEvent::InputChanged("parser".into()));
        let generation = match effects.as_slice() {
            [SearchEffect::ScheduleDebounce { generation, .. }] => *generation,
            other => panic!("unexpected effects: {other:?}"),
        };

        assert_eq!(issued(&orch.handle(SearchEvent::ToggleLanguage("rust".into()))).len(), 1);
        assert!(orch.handle(SearchEvent::DebounceElapsed(generation)).is_empty());
    }

    #[test]
    fn test_filter_change_without_query_only_updates_filters() {
        let mut orch = SearchOrchestrator::new(20, QUIET);
        assert!(orch.handle(SearchEvent::ToggleLanguage("c".into())).is_empty());
        assert!(orch.filters().is_selected("c"));
    }

    #[test]
    fn test_clear_filters_reissues_query() {
        let mut orch = SearchOrchestrator::new(20, QUIET)
            .with_filters(FilterState::from_parts(["java"], Some(0.4)));
        type_and_fire(&mut orch, "retry logic");
        assert_eq!(orch.filters().active_count(), 2);

        let effects = orch.handle(SearchEvent::ClearFilters);
        let requests = issued(&effects);
        assert_eq!(requests.len(), 1);
        assert!(requests[0].1.language_filter.is_none());
        assert!(requests[0].1.min_score.is_none());
        assert_eq!(orch.filters().active_count(), 0);
    }

    #[test]
    fn test_revision_tracks_result_replacement() {
        let mut orch = SearchOrchestrator::new(20, QUIET);
        let start = orch.revision();
        let (seq, _) = type_and_fire(&mut orch, "cache");
        assert_eq!(orch.revision(), start);

        orch.handle(SearchEvent::Completed {
            seq,
            result: Ok(outcome(&["cache.rs"])),
        });
        assert_eq!(orch.revision(), start + 1);
    }

    /// Drive the reducer with real (paused) timers: keystrokes every 100ms
    /// must collapse into a single request 500ms after the last one.
    #[tokio::test(start_paused = true)]
    async fn test_one_request_per_quiet_period() {
        let (tx, rx) = async_channel::unbounded();
        let mut orch = SearchOrchestrator::new(20, QUIET);
        let mut requests = Vec::new();

        let run = |orch: &mut SearchOrchestrator, event: SearchEvent, requests: &mut Vec<SearchRequest>| {
            for effect in orch.handle(event) {
                match effect {
                    SearchEffect::ScheduleDebounce { generation, delay } => {
                        spawn_after(delay, tx.clone(), generation);
                    }
                    SearchEffect::Issue { request, .. } => requests.push(request),
                }
            }
        };

        let mut text = String::new();
        for ch in "graph search".chars() {
            text.push(ch);
            run(&mut orch, SearchEvent::InputChanged(text.clone()), &mut requests);
            tokio::time::sleep(Duration::from_millis(100)).await;
            while let Ok(generation) = rx.try_recv() {
                run(&mut orch, SearchEvent::DebounceElapsed(generation), &mut requests);
            }
        }
        assert!(requests.is_empty());

        tokio::time::sleep(Duration::from_millis(600)).await;
        while let Ok(generation) = rx.try_recv() {
            run(&mut orch, SearchEvent::DebounceElapsed(generation), &mut requests);
        }

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query, "graph search");
    }
}
