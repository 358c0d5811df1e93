//! Navigation sink for the page controller and the auth service.
//!
//! The browser original fired `setTimeout` redirects and forgot about them;
//! here every delayed navigation is an explicit pending entry that can be
//! inspected, cancelled, or committed early, so tests never wait on the
//! wall clock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Login page route.
pub const LOGIN_PATH: &str = "/";
/// Landing page for administrators.
pub const ADMIN_PATH: &str = "/admin";
/// Landing page for everyone else.
pub const PUBLIC_TRIPS_PATH: &str = "/public-trips";

/// A navigation that has been scheduled but not yet committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingNavigation {
    pub target: String,
    pub delay: Duration,
}

/// Cloneable handle to the current location and at most one scheduled
/// navigation. Scheduling replaces any previous pending entry; there is no
/// queue.
#[derive(Clone, Default)]
pub struct Navigator {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    location: Option<String>,
    pending: Option<Pending>,
}

struct Pending {
    target: String,
    delay: Duration,
    timer: JoinHandle<()>,
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Navigate immediately, dropping any scheduled navigation.
    pub fn goto(&self, target: impl Into<String>) {
        let mut inner = self.lock();
        if let Some(pending) = inner.pending.take() {
            pending.timer.abort();
        }

        let target = target.into();
        debug!("navigating to {target}");
        inner.location = Some(target);
    }

    /// Schedule a navigation after `delay`, replacing any previous pending
    /// entry. The timer commits the navigation unless it is cancelled,
    /// replaced, or committed early first.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn schedule(&self, target: impl Into<String>, delay: Duration) {
        let target = target.into();
        debug!("navigation to {target} scheduled in {delay:?}");

        let navigator = self.clone();
        let timer_target = target.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.goto(timer_target);
        });

        let mut inner = self.lock();
        if let Some(previous) = inner.pending.replace(Pending {
            target,
            delay,
            timer,
        }) {
            previous.timer.abort();
        }
    }

    /// Commit the scheduled navigation now instead of waiting for its timer.
    pub fn commit_pending(&self) {
        let mut inner = self.lock();
        if let Some(pending) = inner.pending.take() {
            pending.timer.abort();
            debug!("navigating to {}", pending.target);
            inner.location = Some(pending.target);
        }
    }

    /// Drop the scheduled navigation, if any.
    pub fn cancel_pending(&self) {
        let mut inner = self.lock();
        if let Some(pending) = inner.pending.take() {
            pending.timer.abort();
        }
    }

    #[must_use]
    pub fn pending(&self) -> Option<PendingNavigation> {
        self.lock().pending.as_ref().map(|pending| PendingNavigation {
            target: pending.target.clone(),
            delay: pending.delay,
        })
    }

    #[must_use]
    pub fn location(&self) -> Option<String> {
        self.lock().location.clone()
    }
}
