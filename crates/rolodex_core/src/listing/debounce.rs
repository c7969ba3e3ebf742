//! Debounced filter input.
//!
//! Keystrokes arrive faster than queries are worth running. The debouncer
//! holds the latest text until input has been quiet for a configured period
//! and releases it only when it differs from the last released value.
//! Time is passed in by the caller.

use std::time::{Duration, Instant};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct FilterDebouncer {
    quiet_period: Duration,
    pending: Option<(String, Instant)>,
    last_emitted: Option<String>,
}

impl Default for FilterDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl FilterDebouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
            last_emitted: None,
        }
    }

    /// Starts from a value that is already on screen, so settling back on it
    /// does not trigger a query.
    pub fn with_initial(quiet_period: Duration, initial: impl Into<String>) -> Self {
        Self {
            last_emitted: Some(initial.into()),
            ..Self::new(quiet_period)
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Records a text change observed at `now`.
    pub fn on_input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now));
    }

    /// Returns whether a value is waiting for the quiet period.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Releases the pending text once input has been quiet long enough.
    ///
    /// Returns `None` while typing continues, when nothing is pending, or when
    /// the settled text equals the last released one.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let settled = match &self.pending {
            Some((_, changed_at)) => now.saturating_duration_since(*changed_at) >= self.quiet_period,
            None => false,
        };
        if settled {
            self.flush()
        } else {
            None
        }
    }

    /// Releases the pending text immediately, subject to the same
    /// distinct-value rule as [`poll`](Self::poll).
    pub fn flush(&mut self) -> Option<String> {
        let (text, _) = self.pending.take()?;
        if self.last_emitted.as_deref() == Some(text.as_str()) {
            return None;
        }
        self.last_emitted = Some(text.clone());
        Some(text)
    }
}
