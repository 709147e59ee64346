//! Stale-response suppression for backend submissions.
//!
//! Each submission takes a [`RequestToken`] from a [`RequestTracker`]
//! before it is sent.  When the response arrives the caller asks the
//! tracker whether the token is still the latest; answers to superseded
//! requests are dropped instead of overwriting newer results.

/// Identifies one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// Hands out tokens and remembers which one is current.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTracker {
    latest: u64,
    pending: bool,
}

impl RequestTracker {
    /// Tracker with nothing in flight.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: 0,
            pending: false,
        }
    }

    /// Start a new submission, superseding any in flight.
    pub const fn begin(&mut self) -> RequestToken {
        self.latest += 1;
        self.pending = true;
        RequestToken(self.latest)
    }

    /// `true` if `token` belongs to the most recent submission.
    #[must_use]
    pub const fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Finish the submission identified by `token`.
    ///
    /// Returns `true` if its response should be applied.  A stale token
    /// leaves the tracker untouched.
    pub fn complete(&mut self, token: RequestToken) -> bool {
        if !self.is_current(token) {
            tracing::debug!(stale = token.0, latest = self.latest, "discarding stale response");
            return false;
        }
        self.pending = false;
        true
    }

    /// Forget anything in flight (e.g. a new image was selected).
    pub const fn invalidate(&mut self) {
        self.latest += 1;
        self.pending = false;
    }

    /// `true` while the latest submission has not completed.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_response_is_applied() {
        let mut tracker = RequestTracker::new();
        let token = tracker.begin();
        assert!(tracker.is_pending());
        assert!(tracker.complete(token));
        assert!(!tracker.is_pending());
    }

    #[test]
    fn superseded_response_is_dropped() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();

        assert!(!tracker.complete(first));
        assert!(tracker.is_pending(), "newer request still in flight");
        assert!(tracker.complete(second));
    }

    #[test]
    fn out_of_order_completion() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();

        assert!(tracker.complete(second));
        assert!(!tracker.complete(first));
        assert!(!tracker.is_pending());
    }

    #[test]
    fn invalidate_drops_in_flight() {
        let mut tracker = RequestTracker::new();
        let token = tracker.begin();
        tracker.invalidate();
        assert!(!tracker.is_pending());
        assert!(!tracker.complete(token));
    }
}
