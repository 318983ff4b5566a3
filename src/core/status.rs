//! Request lifecycle shared by every result stream

/// Lifecycle of one independent request stream (search, stats, upload...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Success,
    /// Carries a message ready to show to the user
    Failed(String),
}

impl RequestStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestStatus::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Issues sequence numbers and tells whether a completion is still current.
///
/// Each stream owns one. A completion is accepted only if it answers the
/// most recently issued request.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    latest: u64,
}

impl Sequencer {
    /// Start a new request and return its sequence number
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Make every outstanding request stale without issuing a new one
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_is_current() {
        let mut seq = Sequencer::default();
        let first = seq.next();
        let second = seq.next();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));

        seq.invalidate();
        assert!(!seq.is_current(second));
    }

    #[test]
    fn test_status_helpers() {
        assert!(RequestStatus::Loading.is_loading());
        assert_eq!(RequestStatus::Failed("down".into()).error(), Some("down"));
        assert_eq!(RequestStatus::default(), RequestStatus::Idle);
    }
}
