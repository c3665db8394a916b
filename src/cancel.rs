//! Cooperative cancellation for in-flight lookups.

use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Cancels a lookup from another thread, or bounds it with a deadline.
///
/// Wraps a [`CancellationToken`], so a token owned by async code can also
/// bound a blocking lookup. No runtime is needed. Clones share one
/// cancellation state. The executor checks the token before each connect
/// attempt and between read slices, so a cancelled lookup returns
/// [`WhoisError::Cancelled`](crate::WhoisError::Cancelled) within one
/// [`poll_interval`](crate::WhoisConfig::poll_interval).
///
/// ```
/// use std::time::Duration;
/// use whois_resolver::CancelToken;
///
/// let token = CancelToken::new().with_timeout(Duration::from_secs(5));
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: CancellationToken,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// Creates a token that never fires on its own.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a token that fires when `self` does, but can also be
    /// cancelled on its own. The deadline is inherited.
    #[must_use]
    pub fn child_token(&self) -> Self {
        Self {
            inner: self.inner.child_token(),
            deadline: self.deadline,
        }
    }

    /// Fires automatically at `deadline`.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Fires automatically `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Cancels every clone of this token.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Returns `true` once cancelled or past the deadline.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Time left until the deadline, if one is set.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}

impl From<CancellationToken> for CancelToken {
    fn from(inner: CancellationToken) -> Self {
        Self {
            inner,
            deadline: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_is_live() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        assert_eq!(token.remaining(), None);
    }

    #[test]
    fn cancel_is_shared_by_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        other.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn past_deadline_fires() {
        let token = CancelToken::new().with_deadline(Instant::now());
        assert!(token.is_cancelled());
        assert_eq!(token.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn future_deadline_is_live() {
        let token = CancelToken::new().with_timeout(Duration::from_secs(60));
        assert!(!token.is_cancelled());
        assert!(token.remaining().unwrap() > Duration::from_secs(30));
    }

    #[test]
    fn wrapped_cancellation_token_drives_lookup_token() {
        let shared = CancellationToken::new();
        let token = CancelToken::from(shared.clone());
        assert!(!token.is_cancelled());
        shared.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn child_fires_with_parent_but_not_the_reverse() {
        let parent = CancelToken::new();
        let child = parent.child_token();
        child.cancel();
        assert!(!parent.is_cancelled());

        let other = parent.child_token();
        parent.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn cancel_across_threads() {
        let token = CancelToken::new();
        let handle = token.clone();
        std::thread::spawn(move || handle.cancel()).join().unwrap();
        assert!(token.is_cancelled());
    }
}
