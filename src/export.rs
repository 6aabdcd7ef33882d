use std::path::Path;

use anyhow::Context;
use csv::{QuoteStyle, WriterBuilder};

use crate::models::UserRow;
use crate::notify::{Notification, Notifier};

const COLUMNS: [&str; 7] = [
    "ID",
    "Name",
    "Email",
    "Total Posts",
    "Last Posted",
    "Total Likes",
    "Total Comments",
];

/// Serialize the rows in list order. Every field is quoted, numeric ones
/// included; embedded quotes are doubled per RFC 4180.
pub fn to_csv(rows: &[UserRow]) -> anyhow::Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for row in rows {
        let total_posts = row.total_posts.to_string();
        let total_likes = row.total_likes.to_string();
        let total_comments = row.total_comments.to_string();
        writer.write_record([
            row.id.as_str(),
            row.name.as_deref().unwrap_or(""),
            row.email.as_deref().unwrap_or(""),
            total_posts.as_str(),
            row.last_posted.as_deref().unwrap_or("N/A"),
            total_likes.as_str(),
            total_comments.as_str(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("failed to finish csv output: {err}"))?;
    Ok(String::from_utf8(bytes)?)
}

/// Write the current rows to `path`. An empty list produces no file,
/// only an informational notification. Returns whether a file was
/// written.
pub fn export(rows: &[UserRow], path: &Path, notifier: &dyn Notifier) -> anyhow::Result<bool> {
    if rows.is_empty() {
        notifier.notify(Notification::info(
            "No data",
            "There are no users to export.",
        ));
        return Ok(false);
    }
    let csv_text = to_csv(rows)?;
    std::fs::write(path, csv_text)
        .with_context(|| format!("failed to write {}", path.display()))?;
    notifier.notify(Notification::success(
        "Export complete",
        format!("Exported {} users to {}.", rows.len(), path.display()),
    ));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{MemoryNotifier, Severity};

    fn sample_row() -> UserRow {
        UserRow {
            id: "1".to_string(),
            name: Some("A".to_string()),
            email: Some("a@x.com".to_string()),
            total_posts: 5,
            total_likes: 10,
            total_comments: 2,
            last_posted: Some("2024-01-02".to_string()),
        }
    }

    #[test]
    fn csv_matches_the_export_contract() {
        let csv_text = to_csv(&[sample_row()]).unwrap();
        assert_eq!(
            csv_text,
            "\"ID\",\"Name\",\"Email\",\"Total Posts\",\"Last Posted\",\"Total Likes\",\"Total Comments\"\n\
             \"1\",\"A\",\"a@x.com\",\"5\",\"2024-01-02\",\"10\",\"2\"\n"
        );
    }

    #[test]
    fn missing_fields_render_as_empty_or_sentinel() {
        let mut row = sample_row();
        row.name = None;
        row.email = None;
        row.last_posted = None;

        let csv_text = to_csv(&[row]).unwrap();
        let data_line = csv_text.lines().nth(1).unwrap();
        assert_eq!(data_line, "\"1\",\"\",\"\",\"5\",\"N/A\",\"10\",\"2\"");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let mut row = sample_row();
        row.name = Some("Ada \"The Builder\" Lovelace".to_string());

        let csv_text = to_csv(&[row]).unwrap();
        assert!(csv_text.contains("\"Ada \"\"The Builder\"\" Lovelace\""));
    }

    #[test]
    fn empty_export_notifies_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin_users_data.csv");
        let notifier = MemoryNotifier::new();

        let written = export(&[], &path, &notifier).unwrap();

        assert!(!written);
        assert!(!path.exists());
        let sent = notifier.notifications();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].severity, Severity::Info);
        assert_eq!(sent[0].title, "No data");
    }

    #[test]
    fn export_writes_the_file_and_notifies_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin_users_data.csv");
        let notifier = MemoryNotifier::new();

        let written = export(&[sample_row()], &path, &notifier).unwrap();

        assert!(written);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("\"ID\",\"Name\",\"Email\""));
        let sent = notifier.notifications();
        assert_eq!(sent[0].severity, Severity::Success);
    }
}
