//! Cooperative cancellation shared between the host and search workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cloneable stop signal with an optional wall-clock deadline.
///
/// Clones share the same flag. A [`child`](CancelToken::child) token stops
/// whenever any of its ancestors stops, but cancelling the child leaves the
/// ancestors untouched.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    ancestors: Vec<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// A token that never fires unless [`cancel`](CancelToken::cancel) is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also fires once `deadline` has passed.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..Self::default()
        }
    }

    /// A token that fires `budget` from now.
    pub fn with_budget(budget: Duration) -> Self {
        Self::with_deadline(Instant::now() + budget)
    }

    /// Derives a token linked to this one; it keeps the same deadline.
    pub fn child(&self) -> Self {
        let mut ancestors = self.ancestors.clone();
        ancestors.push(Arc::clone(&self.flag));
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            ancestors,
            deadline: self.deadline,
        }
    }

    /// A clone sharing this token's flags that also fires `budget` from now,
    /// or at the existing deadline if that comes first.
    pub fn limited_to(&self, budget: Duration) -> Self {
        let deadline = Instant::now() + budget;
        let mut token = self.clone();
        token.deadline = Some(token.deadline.map_or(deadline, |current| current.min(deadline)));
        token
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// True once cancellation was requested here or on an ancestor, or the
    /// deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        self.is_flagged() || self.deadline_passed()
    }

    /// Checks the flags only, skipping the clock read.
    pub fn is_flagged(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self
                .ancestors
                .iter()
                .any(|flag| flag.load(Ordering::Relaxed))
    }

    /// True once the deadline, if any, has passed.
    pub fn deadline_passed(&self) -> bool {
        self.deadline
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }

    /// The configured deadline.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
