use serde::Deserialize;

/// One cohort member's aggregated activity snapshot, as served by the
/// backend. The wire format uses camelCase field names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub total_likes: u64,
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub last_posted: Option<String>,
}

impl UserRow {
    /// Best available display name for notifications: name, then email,
    /// then the raw id.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Load lifecycle of the cohort view. The row list only exists in the
/// `Loaded` state, so a sync or export can never observe a half-loaded
/// table.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded(Vec<UserRow>),
    Errored(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_falls_back_from_name_to_email_to_id() {
        let mut user = UserRow {
            id: "u1".to_string(),
            name: Some("Avery Lee".to_string()),
            email: Some("avery@example.com".to_string()),
            total_posts: 0,
            total_likes: 0,
            total_comments: 0,
            last_posted: None,
        };
        assert_eq!(user.label(), "Avery Lee");

        user.name = None;
        assert_eq!(user.label(), "avery@example.com");

        user.email = None;
        assert_eq!(user.label(), "u1");
    }

    #[test]
    fn user_row_deserializes_camel_case_fields() {
        let user: UserRow = serde_json::from_str(
            r#"{"id":"u1","name":"Avery Lee","totalPosts":5,"totalLikes":10,"totalComments":2,"lastPosted":"2024-01-02"}"#,
        )
        .unwrap();
        assert_eq!(user.total_posts, 5);
        assert_eq!(user.total_likes, 10);
        assert_eq!(user.total_comments, 2);
        assert_eq!(user.last_posted.as_deref(), Some("2024-01-02"));
        assert_eq!(user.email, None);
    }
}
