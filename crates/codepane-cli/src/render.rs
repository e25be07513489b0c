use codepane_core::project::{ChangeKind, ExplorerRow, FileChange};
use codepane_core::{Notification, NotificationLevel};

/// Indented explorer listing, one row per line.
pub fn render_rows(rows: &[ExplorerRow], active: Option<&str>) -> String {
    let mut out = String::new();
    for row in rows {
        let indent = "  ".repeat(row.depth);
        let marker = if row.is_folder {
            if row.expanded { "▾ " } else { "▸ " }
        } else {
            "  "
        };
        let selected = row.file_id.is_some() && row.file_id.as_deref() == active;
        out.push_str(&indent);
        out.push_str(marker);
        out.push_str(&row.name);
        if row.is_folder {
            out.push('/');
        }
        if selected {
            out.push_str("  *");
        }
        out.push('\n');
    }
    out
}

pub fn render_change(change: &FileChange) -> String {
    let verb = match change.kind {
        ChangeKind::Created => "created",
        ChangeKind::Updated => "updated",
    };
    format!(
        "{verb} {} ({} lines)",
        change.file.name,
        change.file.content.lines().count()
    )
}

pub fn render_notification(note: &Notification) -> String {
    let tag = match note.level {
        NotificationLevel::Info => "info",
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "err",
    };
    if note.description.is_empty() {
        format!("[{tag}] {}", note.title)
    } else {
        format!("[{tag}] {}: {}", note.title, note.description)
    }
}
