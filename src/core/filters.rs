//! Active search filters and their composition with the query

use crate::api::SearchRequest;

/// The filter predicate set applied to every search.
///
/// `None` always means "no constraint". An emptied language set is stored
/// as `None`, never as an empty list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    languages: Option<Vec<String>>,
    min_score: Option<f32>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter set from CLI-style arguments.
    pub fn from_parts<I, S>(languages: I, min_score: Option<f32>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filters = Self::new();
        for lang in languages {
            if !filters.is_selected(lang.as_ref()) {
                filters.toggle_language(lang.as_ref());
            }
        }
        if let Some(score) = min_score {
            filters.set_min_score(score);
        }
        filters
    }

    pub fn languages(&self) -> Option<&[String]> {
        self.languages.as_deref()
    }

    pub fn min_score(&self) -> Option<f32> {
        self.min_score
    }

    pub fn is_selected(&self, lang: &str) -> bool {
        self.languages
            .as_ref()
            .map(|langs| langs.iter().any(|l| l == lang))
            .unwrap_or(false)
    }

    /// Add `lang` if absent, remove it otherwise.
    pub fn toggle_language(&mut self, lang: &str) {
        let mut langs = self.languages.take().unwrap_or_default();
        if let Some(pos) = langs.iter().position(|l| l == lang) {
            langs.remove(pos);
        } else {
            langs.push(lang.to_string());
        }
        self.languages = if langs.is_empty() { None } else { Some(langs) };
    }

    /// Replace the score threshold. Returns `false` for non-finite input,
    /// which leaves the state untouched.
    pub fn set_min_score(&mut self, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        self.min_score = Some(value.clamp(0.0, 1.0));
        true
    }

    pub fn clear(&mut self) {
        self.languages = None;
        self.min_score = None;
    }

    /// Number of constraints that actually narrow a search.
    pub fn active_count(&self) -> usize {
        let langs = self.languages.as_ref().map(Vec::len).unwrap_or(0);
        langs + usize::from(self.effective_min_score().is_some())
    }

    /// Threshold as sent to the server; zero counts as unconstrained.
    pub fn effective_min_score(&self) -> Option<f32> {
        self.min_score.filter(|score| *score > 0.0)
    }

    /// `"35%"` when a threshold is set (including `"0%"`), blank when unset.
    pub fn min_score_label(&self) -> String {
        match self.min_score {
            Some(score) => format!("{}%", (score * 100.0).round() as u32),
            None => String::new(),
        }
    }

    /// Merge the query text with this filter set into a request body.
    pub fn compose(&self, query: &str, top_k: usize) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            top_k,
            language_filter: self.languages.clone(),
            min_score: self.effective_min_score(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip_restores_unset() {
        let mut filters = FilterState::new();
        filters.toggle_language("rust");
        assert_eq!(filters.languages(), Some(&["rust".to_string()][..]));

        filters.toggle_language("rust");
        assert_eq!(filters, FilterState::new());
        assert!(filters.languages().is_none());
    }

    #[test]
    fn test_toggle_round_trip_restores_prior_set() {
        let mut filters = FilterState::from_parts(["python", "go"], None);
        let before = filters.clone();

        filters.toggle_language("java");
        filters.toggle_language("java");
        assert_eq!(filters, before);
    }

    #[test]
    fn test_zero_min_score_is_unconstrained_but_displayed() {
        let mut filters = FilterState::new();
        assert_eq!(filters.min_score_label(), "");

        filters.set_min_score(0.0);
        assert_eq!(filters.min_score_label(), "0%");
        assert_eq!(filters.active_count(), 0);

        let req = filters.compose("tokens", 20);
        assert!(req.min_score.is_none());
    }

    #[test]
    fn test_min_score_clamped_and_nan_ignored() {
        let mut filters = FilterState::new();
        assert!(filters.set_min_score(1.7));
        assert_eq!(filters.min_score(), Some(1.0));

        assert!(!filters.set_min_score(f32::NAN));
        assert_eq!(filters.min_score(), Some(1.0));
    }

    #[test]
    fn test_compose_includes_present_filters() {
        let filters = FilterState::from_parts(["python", "rust"], Some(0.35));
        let req = filters.compose("error handling", 10);

        assert_eq!(req.query, "error handling");
        assert_eq!(req.top_k, 10);
        assert_eq!(
            req.language_filter,
            Some(vec!["python".to_string(), "rust".to_string()])
        );
        assert_eq!(req.min_score, Some(0.35));
        assert_eq!(filters.active_count(), 3);
        assert_eq!(filters.min_score_label(), "35%");
    }

    #[test]
    fn test_from_parts_dedupes_languages() {
        let filters = FilterState::from_parts(["go", "go"], None);
        assert_eq!(filters.languages(), Some(&["go".to_string()][..]));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut filters = FilterState::from_parts(["c"], Some(0.6));
        filters.clear();
        assert_eq!(filters, FilterState::new());
        assert_eq!(filters.active_count(), 0);
    }
}
