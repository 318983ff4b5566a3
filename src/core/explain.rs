//! Explanation popup state

use super::status::{RequestStatus, Sequencer};

/// The explanation shown for one result card.
///
/// Explanations never fail from the caller's point of view; the gateway
/// already substitutes a placeholder.
#[derive(Debug, Default)]
pub struct ExplainStream {
    sequencer: Sequencer,
    status: RequestStatus,
    title: Option<String>,
    text: Option<String>,
}

impl ExplainStream {
    pub fn request(&mut self, title: impl Into<String>) -> u64 {
        self.title = Some(title.into());
        self.text = None;
        self.status = RequestStatus::Loading;
        self.sequencer.next()
    }

    pub fn complete(&mut self, seq: u64, text: String) {
        if self.sequencer.is_current(seq) {
            self.text = Some(text);
            self.status = RequestStatus::Success;
        }
    }

    /// Hide the popup; a pending explanation is discarded on arrival
    pub fn close(&mut self) {
        self.sequencer.invalidate();
        self.title = None;
        self.text = None;
        self.status = RequestStatus::Idle;
    }

    pub fn is_open(&self) -> bool {
        self.title.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_popup_ignores_late_text() {
        let mut explain = ExplainStream::default();
        let seq = explain.request("src/auth.py");
        assert!(explain.is_open());
        assert!(explain.is_loading());

        explain.close();
        explain.complete(seq, "Validates tokens.".to_string());
        assert!(!explain.is_open());
        assert!(explain.text().is_none());
    }

    #[test]
    fn test_newer_request_wins() {
        let mut explain = ExplainStream::default();
        let first = explain.request("a.rs");
        let second = explain.request("b.rs");
        explain.complete(second, "B".to_string());
        explain.complete(first, "A".to_string());
        assert_eq!(explain.text(), Some("B"));
        assert_eq!(explain.title(), Some("b.rs"));
    }
}
