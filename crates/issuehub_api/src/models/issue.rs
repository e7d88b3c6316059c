//! Issue models, request payloads and list filters for issue endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::User;

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 4] = [
        IssueStatus::Open,
        IssueStatus::InProgress,
        IssueStatus::Resolved,
        IssueStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "open",
            IssueStatus::InProgress => "in_progress",
            IssueStatus::Resolved => "resolved",
            IssueStatus::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IssueStatus::Open => "Open",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Resolved => "Resolved",
            IssueStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase().replace(['-', ' '], "_");
        IssueStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                format!("unknown status '{value}' (expected open, in_progress, resolved or closed)")
            })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum IssuePriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl IssuePriority {
    pub const ALL: [IssuePriority; 4] = [
        IssuePriority::Low,
        IssuePriority::Medium,
        IssuePriority::High,
        IssuePriority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssuePriority::Low => "low",
            IssuePriority::Medium => "medium",
            IssuePriority::High => "high",
            IssuePriority::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IssuePriority::Low => "Low",
            IssuePriority::Medium => "Medium",
            IssuePriority::High => "High",
            IssuePriority::Critical => "Critical",
        }
    }
}

impl fmt::Display for IssuePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssuePriority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        IssuePriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == normalized)
            .ok_or_else(|| {
                format!("unknown priority '{value}' (expected low, medium, high or critical)")
            })
    }
}

/// Represents an issue returned by the list or detail endpoints, including status, priority, reporter/assignee references and scheduling metadata.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Issue {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    #[serde(default)]
    pub reporter: Option<User>,
    #[serde(default)]
    pub reporter_id: Option<i64>,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub assignee_id: Option<i64>,
    #[serde(default)]
    pub expected_completion_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub comment_count: Option<u64>,
}

impl Issue {
    /// Returns reporter id from the explicit field or the embedded reporter.
    pub fn reporter_id(&self) -> Option<i64> {
        self.reporter_id
            .or_else(|| self.reporter.as_ref().map(|user| user.id))
    }

    /// Returns assignee id from the explicit field or the embedded assignee.
    pub fn assignee_id(&self) -> Option<i64> {
        self.assignee_id
            .or_else(|| self.assignee.as_ref().map(|user| user.id))
    }
}

/// Request body for creating an issue (POST).
#[derive(Debug, Serialize, Clone, Default)]
pub struct IssueCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: IssuePriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_completion_date: Option<String>,
}

/// Request body for editing an issue (PATCH). Unset fields are left untouched.
///
/// `assignee_id` is tri-state: `None` keeps the assignee, `Some(None)` sends
/// `null` and unassigns, `Some(Some(id))` reassigns.
#[derive(Debug, Serialize, Clone, Default)]
pub struct IssueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IssueStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<IssuePriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_completion_date: Option<String>,
}

impl IssueUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee_id.is_none()
            && self.expected_completion_date.is_none()
    }

    /// True when the update changes status, assignee, priority or the due date,
    /// which only maintainers and the reporter may edit.
    pub fn touches_restricted_fields(&self) -> bool {
        self.status.is_some()
            || self.assignee_id.is_some()
            || self.priority.is_some()
            || self.expected_completion_date.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IssueSort {
    #[default]
    CreatedAt,
    UpdatedAt,
    Priority,
    Status,
}

impl IssueSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSort::CreatedAt => "created_at",
            IssueSort::UpdatedAt => "updated_at",
            IssueSort::Priority => "priority",
            IssueSort::Status => "status",
        }
    }
}

impl fmt::Display for IssueSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueSort {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "created_at" | "created" => Ok(IssueSort::CreatedAt),
            "updated_at" | "updated" => Ok(IssueSort::UpdatedAt),
            "priority" => Ok(IssueSort::Priority),
            "status" => Ok(IssueSort::Status),
            _ => Err(format!(
                "unknown sort '{value}' (expected created_at, updated_at, priority or status)"
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("unknown order '{value}' (expected asc or desc)")),
        }
    }
}

/// Filters, ordering and paging for the project issue list.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct IssueQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IssueStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<IssuePriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,
    pub sort: IssueSort,
    pub order: SortOrder,
    pub page: u32,
    pub per_page: u32,
}

impl Default for IssueQuery {
    fn default() -> Self {
        Self {
            q: None,
            status: None,
            priority: None,
            assignee_id: None,
            sort: IssueSort::default(),
            order: SortOrder::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl IssueQuery {
    /// Drops blank search text and clamps paging into the range the API accepts.
    pub fn normalized(&self) -> Self {
        let q = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        Self {
            q,
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
            ..self.clone()
        }
    }
}
