//! Client-side form validation producing API request payloads.
//!
//! Every form collects all field errors before reporting, so the user sees
//! the complete list in one go.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use issuehub_api::{
    AddProjectMember, IssueCreate, IssuePriority, IssueStatus, IssueUpdate, MemberRole,
    ProjectCreate,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static PROJECT_KEY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[A-Z0-9]{2,10}$").expect("invalid project key regex"));
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex"));

const PROJECT_NAME_MIN: usize = 3;
const PROJECT_NAME_MAX: usize = 100;
const USER_NAME_MAX: usize = 100;
const ISSUE_TITLE_MIN: usize = 3;
const ISSUE_TITLE_MAX: usize = 200;
const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All validation failures of one form submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// Message reported for `field`, if it failed.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|error| error.message.as_str()).collect();
        f.write_str(&messages.join("\n"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        }
        errors.into_result(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        let name = self.name.trim();
        if name.is_empty() {
            errors.push("name", "Name is required");
        } else if name.chars().count() > USER_NAME_MAX {
            errors.push("name", format!("Name must be at most {USER_NAME_MAX} characters"));
        }
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        }
        errors.into_result(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectForm {
    pub name: String,
    pub key: String,
    pub description: Option<String>,
}

impl ProjectForm {
    pub fn validate(&self) -> Result<ProjectCreate, FormErrors> {
        let mut errors = FormErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("name", "Project name is required");
        } else if name.chars().count() < PROJECT_NAME_MIN {
            errors.push(
                "name",
                format!("Project name must be at least {PROJECT_NAME_MIN} characters"),
            );
        } else if name.chars().count() > PROJECT_NAME_MAX {
            errors.push(
                "name",
                format!("Project name must be at most {PROJECT_NAME_MAX} characters"),
            );
        }

        let key = self.key.trim();
        if key.is_empty() {
            errors.push("key", "Project key is required");
        } else if !PROJECT_KEY_REGEX.is_match(key) {
            errors.push("key", "Key must be 2-10 alphanumeric characters");
        }

        errors.into_result(ProjectCreate {
            name: name.to_string(),
            key: key.to_uppercase(),
            description: non_blank(self.description.as_deref()),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemberForm {
    pub email: String,
    pub role: Option<MemberRole>,
}

impl MemberForm {
    pub fn validate(&self) -> Result<AddProjectMember, FormErrors> {
        let mut errors = FormErrors::default();
        check_email(&mut errors, &self.email);
        errors.into_result(AddProjectMember {
            email: self.email.trim().to_string(),
            role: self.role.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct IssueForm {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<IssuePriority>,
    pub assignee_id: Option<i64>,
    pub expected_completion_date: Option<String>,
}

impl IssueForm {
    pub fn validate(&self) -> Result<IssueCreate, FormErrors> {
        let mut errors = FormErrors::default();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push("title", "Title is required");
        } else if title.chars().count() < ISSUE_TITLE_MIN {
            errors.push(
                "title",
                format!("Title must be at least {ISSUE_TITLE_MIN} characters"),
            );
        } else if title.chars().count() > ISSUE_TITLE_MAX {
            errors.push(
                "title",
                format!("Title must be at most {ISSUE_TITLE_MAX} characters"),
            );
        }

        let expected_completion_date =
            check_date(&mut errors, self.expected_completion_date.as_deref());
        let assignee_id = check_assignee(&mut errors, self.assignee_id);

        errors.into_result(IssueCreate {
            title: title.to_string(),
            description: non_blank(self.description.as_deref()),
            priority: self.priority.unwrap_or_default(),
            assignee_id,
            expected_completion_date,
        })
    }
}

/// Edits to an existing issue. `assignee` uses the same tri-state as [`IssueUpdate`].
#[derive(Debug, Clone, Default)]
pub struct IssueUpdateForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    pub assignee: Option<Option<i64>>,
    pub expected_completion_date: Option<String>,
}

impl IssueUpdateForm {
    pub fn validate(&self) -> Result<IssueUpdate, FormErrors> {
        let mut errors = FormErrors::default();

        let title = self.title.as_deref().map(str::trim);
        if let Some(title) = title {
            if title.is_empty() {
                errors.push("title", "Title cannot be empty");
            } else if title.chars().count() > ISSUE_TITLE_MAX {
                errors.push(
                    "title",
                    format!("Title must be at most {ISSUE_TITLE_MAX} characters"),
                );
            }
        }

        let expected_completion_date =
            check_date(&mut errors, self.expected_completion_date.as_deref());
        let assignee_id = match self.assignee {
            Some(Some(id)) => check_assignee(&mut errors, Some(id)).map(Some),
            Some(None) => Some(None),
            None => None,
        };

        let update = IssueUpdate {
            title: title.map(str::to_string),
            description: self.description.as_ref().map(|text| text.trim().to_string()),
            status: self.status,
            priority: self.priority,
            assignee_id,
            expected_completion_date,
        };
        if errors.is_empty() && update.is_empty() {
            errors.push("update", "Nothing to update");
        }
        errors.into_result(update)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommentForm {
    pub body: String,
}

impl CommentForm {
    /// Returns the trimmed comment body.
    pub fn validate(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::default();
        if self.body.is_empty() {
            errors.push("body", "Comment is required");
        } else if self.body.trim().is_empty() {
            errors.push("body", "Comment cannot be empty");
        }
        errors.into_result(self.body.trim().to_string())
    }
}

/// Normalizes a user-entered date to `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_completion_date(value: &str) -> Option<String> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.format(DATE_OUTPUT_FORMAT).to_string());
    }
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.format(DATE_OUTPUT_FORMAT).to_string());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_utc().format(DATE_OUTPUT_FORMAT).to_string())
}

fn check_email(errors: &mut FormErrors, email: &str) {
    let email = email.trim();
    if email.is_empty() {
        errors.push("email", "Email is required");
    } else if !EMAIL_REGEX.is_match(email) {
        errors.push("email", "Enter a valid email address");
    }
}

fn check_date(errors: &mut FormErrors, value: Option<&str>) -> Option<String> {
    let value = value.map(str::trim).filter(|text| !text.is_empty())?;
    let parsed = parse_completion_date(value);
    if parsed.is_none() {
        errors.push(
            "expected_completion_date",
            "Expected completion date must be YYYY-MM-DD or YYYY-MM-DDTHH:MM",
        );
    }
    parsed
}

fn check_assignee(errors: &mut FormErrors, assignee_id: Option<i64>) -> Option<i64> {
    match assignee_id {
        Some(id) if id <= 0 => {
            errors.push("assignee_id", "Assignee must be a valid user id");
            None
        }
        other => other,
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
