use std::fmt::Write;

use crate::api::ApiClient;
use crate::models::{LoadState, UserRow};

pub const LOAD_ERROR_MESSAGE: &str = "Failed to load cohort users.";

/// The cohort table. Holds the one row-list snapshot that the renderer,
/// the sync runner, and the CSV exporter all read.
pub struct CohortView {
    state: LoadState,
}

impl CohortView {
    pub fn new() -> Self {
        Self {
            state: LoadState::Idle,
        }
    }

    /// Load the cohort's users once. A blank cohort id is a no-op: no
    /// request is issued and the state stays `Idle`.
    pub async fn load(&mut self, api: &ApiClient, cohort_id: &str) {
        if cohort_id.trim().is_empty() {
            return;
        }
        self.state = LoadState::Loading;
        match api.get_users(cohort_id).await {
            Ok(users) => {
                tracing::debug!(cohort = cohort_id, count = users.len(), "cohort loaded");
                self.state = LoadState::Loaded(users);
            }
            Err(err) => {
                tracing::warn!(cohort = cohort_id, error = %err, "cohort load failed");
                self.state = LoadState::Errored(LOAD_ERROR_MESSAGE.to_string());
            }
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn rows(&self) -> &[UserRow] {
        match &self.state {
            LoadState::Loaded(users) => users,
            _ => &[],
        }
    }

    pub fn render(&self) -> String {
        let mut output = String::new();
        match &self.state {
            LoadState::Errored(message) => {
                let _ = writeln!(output, "{message}");
            }
            LoadState::Idle | LoadState::Loading => {
                let _ = writeln!(output, "No users loaded.");
            }
            LoadState::Loaded(users) if users.is_empty() => {
                let _ = writeln!(output, "No users found.");
            }
            LoadState::Loaded(users) => {
                let _ = writeln!(
                    output,
                    "{:>4}  {:<24} {:<30} {:>6} {:>6} {:>9}  {}",
                    "Rank", "Name", "Email", "Posts", "Likes", "Comments", "Last Posted"
                );
                for (index, user) in users.iter().enumerate() {
                    let _ = writeln!(
                        output,
                        "{:>4}  {:<24} {:<30} {:>6} {:>6} {:>9}  {}",
                        index + 1,
                        user.name.as_deref().unwrap_or(""),
                        user.email.as_deref().unwrap_or(""),
                        user.total_posts,
                        user.total_likes,
                        user.total_comments,
                        format_last_posted(user.last_posted.as_deref()),
                    );
                }
            }
        }
        output
    }
}

fn format_last_posted(value: Option<&str>) -> String {
    match value {
        Some(raw) => chrono::DateTime::parse_from_rfc3339(raw)
            .map(|timestamp| timestamp.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| raw.to_string()),
        None => "N/A".to_string(),
    }
}
