//! Terminal renderings of API payloads.
//!
//! Each `render_*` function returns the full text of a view so callers can
//! print it and tests can inspect it.

use crate::permissions::IssueActions;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use issuehub_api::{Comment, Issue, Project, User};
use serde::Serialize;
use std::fmt::Write;

const TITLE_COLUMN_WIDTH: usize = 48;
const NAME_COLUMN_WIDTH: usize = 32;
const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn truncate_text(value: &str, limit: usize) -> String {
    let trimmed = value.trim();
    if trimmed.chars().count() <= limit {
        return trimmed.to_string();
    }
    if limit <= 1 {
        return "…".to_string();
    }
    let mut truncated: String = trimmed.chars().take(limit - 1).collect();
    truncated.push('…');
    truncated
}

/// Parses API timestamps. Values without an offset are treated as UTC.
pub fn parse_api_datetime(value: &str) -> Option<DateTime<Local>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Local))
        .or_else(|| {
            DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z")
                .ok()
                .map(|dt| dt.with_timezone(&Local))
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&Local))
        })
}

/// Local `YYYY-MM-DD HH:MM`, or the raw value when it cannot be parsed.
pub fn format_timestamp(value: &str) -> String {
    parse_api_datetime(value)
        .map(|dt| dt.format(DISPLAY_TIME_FORMAT).to_string())
        .unwrap_or_else(|| value.to_string())
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("Failed to encode output: {err}"))
}

pub fn render_user(user: &User) -> String {
    format!("{} <{}> (id {})", user.name, user.email, user.id)
}

fn user_label(user: Option<&User>) -> String {
    user.map(|user| collapse_whitespace(&user.name))
        .unwrap_or_else(|| "Unassigned".to_string())
}

pub fn render_project_list(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects yet. Create one with `issuehub projects create`.".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<10} {:<width$} {:>6} {:>7}",
        "ID",
        "KEY",
        "NAME",
        "ISSUES",
        "MEMBERS",
        width = NAME_COLUMN_WIDTH
    );
    for project in projects {
        let _ = writeln!(
            out,
            "{:<6} {:<10} {:<width$} {:>6} {:>7}",
            project.id,
            project.key,
            truncate_text(&collapse_whitespace(&project.name), NAME_COLUMN_WIDTH),
            project.issue_count.unwrap_or(0),
            project.member_count.unwrap_or(project.members.len() as u64),
            width = NAME_COLUMN_WIDTH
        );
    }
    out.trim_end().to_string()
}

pub fn render_project_detail(project: &Project) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", project.key, collapse_whitespace(&project.name));
    if let Some(description) = project.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(out, "{}", description.trim());
    }
    let _ = writeln!(out, "Created: {}", format_timestamp(&project.created_at));
    let _ = writeln!(out, "Members ({}):", project.members.len());
    for member in &project.members {
        let _ = writeln!(
            out,
            "  - {} ({})",
            render_user(&member.user),
            member.role.label()
        );
    }
    out.trim_end().to_string()
}

pub fn render_issue_list(issues: &[Issue]) -> String {
    if issues.is_empty() {
        return "No issues match the current filters.".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<12} {:<9} {:<width$} {:<16} {:>8}",
        "ID",
        "STATUS",
        "PRIORITY",
        "TITLE",
        "ASSIGNEE",
        "COMMENTS",
        width = TITLE_COLUMN_WIDTH
    );
    for issue in issues {
        let _ = writeln!(
            out,
            "{:<6} {:<12} {:<9} {:<width$} {:<16} {:>8}",
            issue.id,
            issue.status.label(),
            issue.priority.label(),
            truncate_text(&collapse_whitespace(&issue.title), TITLE_COLUMN_WIDTH),
            truncate_text(&user_label(issue.assignee.as_ref()), 16),
            issue.comment_count.unwrap_or(0),
            width = TITLE_COLUMN_WIDTH
        );
    }
    out.trim_end().to_string()
}

pub fn render_issue_detail(issue: &Issue, actions: IssueActions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", issue.id, collapse_whitespace(&issue.title));
    let _ = writeln!(
        out,
        "Status: {}    Priority: {}",
        issue.status.label(),
        issue.priority.label()
    );
    let _ = writeln!(out, "Reporter: {}", user_label(issue.reporter.as_ref()));
    let _ = writeln!(out, "Assignee: {}", user_label(issue.assignee.as_ref()));
    if let Some(due) = issue.expected_completion_date.as_deref() {
        let _ = writeln!(out, "Expected completion: {}", format_timestamp(due));
    }
    let _ = writeln!(
        out,
        "Created: {}    Updated: {}",
        format_timestamp(&issue.created_at),
        format_timestamp(&issue.updated_at)
    );
    match issue.description.as_deref().map(str::trim) {
        Some(description) if !description.is_empty() => {
            let _ = writeln!(out, "\n{}\n", description);
        }
        _ => {
            let _ = writeln!(out, "\nNo description provided.\n");
        }
    }

    let mut available = Vec::new();
    if actions.comment {
        available.push("comment");
    }
    if actions.edit {
        available.push("edit");
    }
    if actions.delete {
        available.push("delete");
    }
    if !available.is_empty() {
        let _ = writeln!(out, "Actions: {}", available.join(", "));
    }
    out.trim_end().to_string()
}

pub fn render_comments(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return "No comments yet.".to_string();
    }
    let mut out = String::new();
    for comment in comments {
        let author = comment
            .author
            .as_ref()
            .map(|user| collapse_whitespace(&user.name))
            .unwrap_or_else(|| format!("user {}", comment.author_id));
        let _ = writeln!(
            out,
            "{} · {}\n{}\n",
            author,
            format_timestamp(&comment.created_at),
            comment.body.trim()
        );
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue(assignee: serde_json::Value) -> Issue {
        serde_json::from_value(json!({
            "id": 12,
            "project_id": 4,
            "title": "Crash   on\nsave",
            "description": "  Steps: open, save.  ",
            "status": "in_progress",
            "priority": "critical",
            "reporter": {"id": 1, "name": "Ann", "email": "ann@example.com", "created_at": "2024-01-01T09:00:00"},
            "assignee": assignee,
            "created_at": "2024-02-01T10:00:00",
            "updated_at": "2024-02-01T10:00:00",
            "comment_count": 3
        }))
        .expect("issue fixture")
    }

    #[test]
    fn truncate_appends_ellipsis_only_when_needed() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghij", 5), "abcd…");
        assert_eq!(truncate_text("abc", 1), "…");
    }

    #[test]
    fn naive_and_offset_timestamps_parse() {
        assert!(parse_api_datetime("2024-02-01T10:00:00").is_some());
        assert!(parse_api_datetime("2024-02-01T10:00:00.123456").is_some());
        assert!(parse_api_datetime("2024-02-01T10:00:00+00:00").is_some());
        assert!(parse_api_datetime("yesterday").is_none());
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn offset_timestamp_is_converted_to_local_time() {
        let expected = Utc
            .with_ymd_and_hms(2024, 2, 1, 10, 0, 0)
            .single()
            .expect("valid date")
            .with_timezone(&Local)
            .format(DISPLAY_TIME_FORMAT)
            .to_string();
        assert_eq!(format_timestamp("2024-02-01T10:00:00Z"), expected);
        assert_eq!(format_timestamp("2024-02-01T10:00:00"), expected);
    }

    #[test]
    fn issue_list_shows_labels_and_unassigned() {
        let rendered = render_issue_list(&[issue(serde_json::Value::Null)]);
        assert!(rendered.contains("In Progress"));
        assert!(rendered.contains("Critical"));
        assert!(rendered.contains("Crash on save"));
        assert!(rendered.contains("Unassigned"));
        assert!(render_issue_list(&[]).contains("No issues"));
    }

    #[test]
    fn issue_detail_lists_only_permitted_actions() {
        let issue = issue(json!({"id": 2, "name": "Bo", "email": "bo@example.com", "created_at": "2024-01-01T09:00:00"}));
        let viewer = render_issue_detail(
            &issue,
            IssueActions {
                comment: true,
                edit: false,
                delete: false,
            },
        );
        assert!(viewer.contains("Assignee: Bo"));
        assert!(viewer.contains("Steps: open, save."));
        assert!(viewer.contains("Actions: comment"));
        assert!(!viewer.contains("delete"));

        let outsider = render_issue_detail(&issue, IssueActions::default());
        assert!(!outsider.contains("Actions:"));
    }

    #[test]
    fn comments_fall_back_to_author_id() {
        let comments: Vec<Comment> = serde_json::from_value(json!([
            {"id": 5, "issue_id": 12, "author_id": 8, "body": "Seen on Firefox", "created_at": "2024-02-03T11:00:00"}
        ]))
        .expect("comment fixture");
        let rendered = render_comments(&comments);
        assert!(rendered.starts_with("user 8 · "));
        assert!(rendered.ends_with("Seen on Firefox"));
        assert_eq!(render_comments(&[]), "No comments yet.");
    }

    #[test]
    fn project_views_show_counts_and_roles() {
        let project: Project = serde_json::from_value(json!({
            "id": 4,
            "name": "Platform",
            "key": "PLAT",
            "description": "Core services",
            "created_at": "2024-01-10T08:00:00",
            "members": [
                {"user": {"id": 1, "name": "Ann", "email": "ann@example.com", "created_at": "2024-01-01T09:00:00"}, "role": "maintainer"}
            ],
            "issue_count": 7
        }))
        .expect("project fixture");

        let list = render_project_list(std::slice::from_ref(&project));
        assert!(list.contains("PLAT"));
        assert!(list.contains('7'));

        let detail = render_project_detail(&project);
        assert!(detail.starts_with("[PLAT] Platform"));
        assert!(detail.contains("Ann <ann@example.com> (id 1) (Maintainer)"));
    }
}
