//! Query debouncing
//!
//! The debouncer never owns a real timer. Scheduling hands out a generation
//! number; the driver sleeps for the quiet period and reports the generation
//! back. Any input in between bumps the generation, which is all that
//! "cancelling" a timer amounts to.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    /// Waiting for `generation`'s timer to elapse
    Pending { generation: u64, text: String },
    Fired,
    Cancelled,
}

/// What the driver has to do after an input change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceAction {
    /// Sleep for `delay`, then report `generation` back via [`Debouncer::elapsed`]
    Schedule { generation: u64, delay: Duration },
    /// Input is empty; drop results right away
    ClearNow,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    generation: u64,
    state: DebounceState,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            generation: 0,
            state: DebounceState::Idle,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &DebounceState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::Pending { .. })
    }

    /// Register a change of the query text
    pub fn input(&mut self, text: &str) -> DebounceAction {
        self.cancel();
        if text.trim().is_empty() {
            return DebounceAction::ClearNow;
        }

        self.generation += 1;
        self.state = DebounceState::Pending {
            generation: self.generation,
            text: text.to_string(),
        };
        DebounceAction::Schedule {
            generation: self.generation,
            delay: self.quiet,
        }
    }

    /// Drop the pending timer, if any
    pub fn cancel(&mut self) {
        if self.is_pending() {
            self.generation += 1;
            self.state = DebounceState::Cancelled;
        }
    }

    /// A timer elapsed. Returns the text to search for if that timer is
    /// still the live one.
    pub fn elapsed(&mut self, generation: u64) -> Option<String> {
        match &self.state {
            DebounceState::Pending {
                generation: pending,
                text,
            } if *pending == generation => {
                let text = text.clone();
                self.state = DebounceState::Fired;
                Some(text)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(500);

    #[test]
    fn test_new_input_supersedes_pending_timer() {
        let mut debouncer = Debouncer::new(QUIET);

        let first = match debouncer.input("gra") {
            DebounceAction::Schedule { generation, delay } => {
                assert_eq!(delay, QUIET);
                generation
            }
            other => panic!("unexpected action: {other:?}"),
        };
        let second = match debouncer.input("graph") {
            DebounceAction::Schedule { generation, .. } => generation,
            other => panic!("unexpected action: {other:?}"),
        };

        assert_eq!(debouncer.elapsed(first), None);
        assert_eq!(debouncer.elapsed(second), Some("graph".to_string()));
        assert_eq!(debouncer.state(), &DebounceState::Fired);

        // Fires at most once.
        assert_eq!(debouncer.elapsed(second), None);
    }

    #[test]
    fn test_empty_input_clears_and_cancels() {
        let mut debouncer = Debouncer::new(QUIET);
        let generation = match debouncer.input("auth") {
            DebounceAction::Schedule { generation, .. } => generation,
            other => panic!("unexpected action: {other:?}"),
        };

        assert_eq!(debouncer.input("   "), DebounceAction::ClearNow);
        assert_eq!(debouncer.state(), &DebounceState::Cancelled);
        assert_eq!(debouncer.elapsed(generation), None);
    }

    #[test]
    fn test_cancel_when_idle_is_noop() {
        let mut debouncer = Debouncer::new(QUIET);
        debouncer.cancel();
        assert_eq!(debouncer.state(), &DebounceState::Idle);
    }
}
