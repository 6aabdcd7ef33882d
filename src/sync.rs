use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::api::PostsFetcher;
use crate::models::UserRow;
use crate::notify::{Notification, Notifier};

/// Fixed pause after every per-user attempt, including the last one.
pub const USER_FETCH_DELAY: Duration = Duration::from_secs(3);

const GENERIC_FETCH_ERROR: &str = "Failed to fetch posts.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Running { next_index: usize, completed: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub completed: usize,
}

/// Runs the per-user post-fetch action one user at a time, in list
/// order, with a fixed delay between attempts. A failure for one user
/// never aborts the traversal.
pub struct SyncRunner {
    state: Mutex<RunnerState>,
    // Checked between users. Nothing sets this yet.
    cancelled: AtomicBool,
}

impl SyncRunner {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RunnerState::Idle),
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(
            *self.state.lock().expect("runner state lock poisoned"),
            RunnerState::Running { .. }
        )
    }

    #[allow(dead_code)]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Traverse the full user list. Returns `None` when a run is already
    /// underway; at most one run is ever in flight.
    pub async fn run_all(
        &self,
        fetcher: &dyn PostsFetcher,
        users: &[UserRow],
        cookie: &str,
        notifier: &dyn Notifier,
    ) -> Option<RunSummary> {
        {
            let mut state = self.state.lock().expect("runner state lock poisoned");
            if let RunnerState::Running {
                next_index,
                completed,
            } = *state
            {
                tracing::warn!(next_index, completed, "batch run already in progress");
                return None;
            }
            *state = RunnerState::Running {
                next_index: 0,
                completed: 0,
            };
        }
        self.cancelled.store(false, Ordering::SeqCst);

        let mut attempted = 0usize;
        let mut completed = 0usize;
        for (index, user) in users.iter().enumerate() {
            if self.cancelled.load(Ordering::SeqCst) {
                tracing::debug!(index, "batch run cancelled");
                break;
            }
            if self.attempt(fetcher, user, cookie, notifier).await {
                completed += 1;
            }
            attempted += 1;
            {
                let mut state = self.state.lock().expect("runner state lock poisoned");
                *state = RunnerState::Running {
                    next_index: index + 1,
                    completed,
                };
            }
            tokio::time::sleep(USER_FETCH_DELAY).await;
        }

        notifier.notify(Notification::success(
            "Batch fetch complete",
            format!("Fetched posts for {completed} of {} users.", users.len()),
        ));

        let mut state = self.state.lock().expect("runner state lock poisoned");
        *state = RunnerState::Idle;
        Some(RunSummary {
            attempted,
            completed,
        })
    }

    /// Trigger a single user's fetch with the same notification contract
    /// as one step of the batch. Refused while a batch run is underway.
    pub async fn run_one(
        &self,
        fetcher: &dyn PostsFetcher,
        user: &UserRow,
        cookie: &str,
        notifier: &dyn Notifier,
    ) -> Option<bool> {
        if self.is_running() {
            return None;
        }
        Some(self.attempt(fetcher, user, cookie, notifier).await)
    }

    async fn attempt(
        &self,
        fetcher: &dyn PostsFetcher,
        user: &UserRow,
        cookie: &str,
        notifier: &dyn Notifier,
    ) -> bool {
        match fetcher.fetch_user_posts(&user.id, cookie).await {
            Ok(()) => {
                notifier.notify(Notification::success(
                    "Posts fetched",
                    format!("Fetched LinkedIn posts for {}.", user.label()),
                ));
                true
            }
            Err(err) => {
                tracing::warn!(user = %user.id, error = %err, "per-user fetch failed");
                let detail = err.detail().unwrap_or(GENERIC_FETCH_ERROR);
                notifier.notify(Notification::error(
                    "Fetch failed",
                    format!("{}: {detail}", user.label()),
                ));
                false
            }
        }
    }
}
