//! Role and ownership checks deciding which actions the client offers.
//!
//! The backend stays authoritative; these checks only hide actions the user
//! is known not to be allowed to perform.

use issuehub_api::{Issue, IssueUpdate, MemberRole, Project};

pub fn is_member(project: &Project, user_id: i64) -> bool {
    project.member(user_id).is_some()
}

pub fn is_maintainer(project: &Project, user_id: i64) -> bool {
    project
        .member(user_id)
        .is_some_and(|member| member.role == MemberRole::Maintainer)
}

pub fn is_reporter(issue: &Issue, user_id: i64) -> bool {
    issue.reporter_id() == Some(user_id)
}

/// Status, assignee and scheduling edits: maintainers and the reporter.
pub fn can_edit_issue(project: &Project, issue: &Issue, user_id: i64) -> bool {
    is_maintainer(project, user_id) || is_reporter(issue, user_id)
}

/// Title and description edits are open to every member; the rest need [`can_edit_issue`].
pub fn can_apply_update(project: &Project, issue: &Issue, update: &IssueUpdate, user_id: i64) -> bool {
    if update.touches_restricted_fields() {
        can_edit_issue(project, issue, user_id)
    } else {
        is_member(project, user_id)
    }
}

pub fn can_delete_issue(project: &Project, issue: &Issue, user_id: i64) -> bool {
    is_maintainer(project, user_id) || is_reporter(issue, user_id)
}

pub fn can_add_members(project: &Project, user_id: i64) -> bool {
    is_maintainer(project, user_id)
}

/// Actions offered on an issue detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IssueActions {
    pub comment: bool,
    pub edit: bool,
    pub delete: bool,
}

impl IssueActions {
    pub fn for_user(project: &Project, issue: &Issue, user_id: i64) -> Self {
        Self {
            comment: is_member(project, user_id),
            edit: can_edit_issue(project, issue, user_id),
            delete: can_delete_issue(project, issue, user_id),
        }
    }
}
