//! User-facing notifications ("toasts") and error message selection.

use crate::views::{collapse_whitespace, truncate_text};
use issuehub_api::HubError;
use log::debug;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    /// Neutral notice, e.g. a declined confirmation.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }

    /// Builds the error toast for a failed API call.
    pub fn from_api_error(err: &HubError, fallback: &str) -> Self {
        debug!("{}: {}", fallback, redact_log_details(&err.to_string()));
        Self::error(error_message(err, fallback))
    }

    pub fn render(&self) -> String {
        match self.level {
            ToastLevel::Success => format!("✓ {}", self.message),
            ToastLevel::Info => self.message.clone(),
            ToastLevel::Error => format!("✗ {}", self.message),
        }
    }

    /// Only success toasts belong on stdout; `--json` output shares it.
    pub fn uses_stdout(&self) -> bool {
        self.level == ToastLevel::Success
    }

    pub fn show(&self) {
        if self.uses_stdout() {
            println!("{}", self.render());
        } else {
            eprintln!("{}", self.render());
        }
    }
}

/// Message shown for a failed API call: the backend detail, else the generic fallback.
pub fn error_message(err: &HubError, fallback: &str) -> String {
    match err {
        HubError::Timeout(_) | HubError::Network(_) => {
            format!("{fallback}: the server could not be reached")
        }
        HubError::Other(message) => format!("{fallback}: {message}"),
        _ => err
            .detail()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string()),
    }
}

/// Shortens error details for logs and hides anything that looks like a credential.
pub fn redact_log_details(value: &str) -> String {
    let collapsed = collapse_whitespace(value);
    let category = collapsed
        .split(':')
        .next()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .unwrap_or("error");
    let lowered = collapsed.to_lowercase();
    let has_sensitive_hint = [
        "token",
        "authorization",
        "bearer",
        "password",
        "set-cookie",
    ]
    .iter()
    .any(|hint| lowered.contains(hint));

    if has_sensitive_hint {
        return format!(
            "{}: <redacted-sensitive-details>",
            truncate_text(category, 64)
        );
    }

    truncate_text(&collapsed, 180)
}

#[cfg(test)]
mod tests {
    use super::*;
    use issuehub_api::StatusCode;

    #[test]
    fn backend_detail_is_shown_verbatim() {
        let err = HubError::http(
            StatusCode::BAD_REQUEST,
            r#"{"detail":"Project key already exists"}"#,
        );
        assert_eq!(
            error_message(&err, "Failed to create project"),
            "Project key already exists"
        );
    }

    #[test]
    fn missing_detail_falls_back_to_generic_message() {
        let err = HubError::http(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        assert_eq!(
            error_message(&err, "Failed to load issues"),
            "Failed to load issues"
        );
        let err = HubError::Authentication(None);
        assert_eq!(error_message(&err, "Failed to log in"), "Failed to log in");
    }

    #[test]
    fn unreachable_server_is_called_out() {
        let err = HubError::Network("connection refused".to_string());
        assert_eq!(
            error_message(&err, "Failed to load projects"),
            "Failed to load projects: the server could not be reached"
        );
    }

    #[test]
    fn local_failures_keep_their_cause() {
        let err = HubError::Other("Failed to store session in keyring: locked".to_string());
        assert_eq!(
            error_message(&err, "Failed to log in"),
            "Failed to log in: Failed to store session in keyring: locked"
        );
    }

    #[test]
    fn api_error_toast_is_an_error() {
        let err = HubError::http(StatusCode::FORBIDDEN, r#"{"detail":"You are not a member of this project"}"#);
        let toast = Toast::from_api_error(&err, "Failed to load project");
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.render(), "✗ You are not a member of this project");
        assert_eq!(Toast::success("Issue deleted").render(), "✓ Issue deleted");
    }

    #[test]
    fn notices_stay_off_stdout() {
        let cancelled = Toast::info("Cancelled");
        assert_eq!(cancelled.render(), "Cancelled");
        assert!(!cancelled.uses_stdout());
        assert!(!Toast::error("Failed to delete issue").uses_stdout());
        assert!(Toast::success("Issue deleted").uses_stdout());
    }

    #[test]
    fn rejected_session_errors_are_redacted() {
        let err = HubError::Authentication(Some("Invalid token signature".to_string()));
        assert_eq!(
            redact_log_details(&err.to_string()),
            "authentication error: <redacted-sensitive-details>"
        );
    }

    #[test]
    fn sensitive_details_are_redacted() {
        let redacted = redact_log_details("authentication error: Bearer abc.def is invalid");
        assert_eq!(redacted, "authentication error: <redacted-sensitive-details>");

        let plain = redact_log_details("http 404 Not Found:\n  Issue   not found");
        assert_eq!(plain, "http 404 Not Found: Issue not found");
    }
}
