//! Project and membership models plus request payloads for project endpoints.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::User;

/// Role a user holds inside a project. Maintainers may edit or delete any issue and add members.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    #[default]
    Member,
    Maintainer,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Member => "member",
            MemberRole::Maintainer => "maintainer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MemberRole::Member => "Member",
            MemberRole::Maintainer => "Maintainer",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "member" => Ok(MemberRole::Member),
            "maintainer" => Ok(MemberRole::Maintainer),
            other => Err(format!(
                "unknown role '{other}' (expected member or maintainer)"
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProjectMember {
    pub user: User,
    pub role: MemberRole,
}

/// Represents a project as returned by the list and detail endpoints.
///
/// The list endpoint fills the counters and leaves `members` out; the detail
/// endpoint does the opposite.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub members: Vec<ProjectMember>,
    #[serde(default)]
    pub issue_count: Option<u64>,
    #[serde(default)]
    pub member_count: Option<u64>,
}

impl Project {
    /// Returns the membership entry for `user_id`, if the user belongs to the project.
    pub fn member(&self, user_id: i64) -> Option<&ProjectMember> {
        self.members.iter().find(|member| member.user.id == user_id)
    }
}

/// Request body for creating a project (POST).
#[derive(Debug, Serialize, Clone)]
pub struct ProjectCreate {
    pub name: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body for adding a member to a project (POST).
#[derive(Debug, Serialize, Clone)]
pub struct AddProjectMember {
    pub email: String,
    pub role: MemberRole,
}

/// Plain acknowledgement body, e.g. after adding a member.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MessageResponse {
    pub message: String,
}

fn deserialize_null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_entry_without_members_decodes() {
        let project: Project = serde_json::from_str(
            r#"{"id":1,"name":"Backend","key":"BE","description":null,
                "created_at":"2024-03-01T10:00:00","issue_count":4,"member_count":2}"#,
        )
        .expect("project should decode");
        assert!(project.members.is_empty());
        assert_eq!(project.issue_count, Some(4));
        assert!(project.description.is_none());
    }

    #[test]
    fn null_members_decode_as_empty() {
        let project: Project = serde_json::from_str(
            r#"{"id":1,"name":"Backend","key":"BE","created_at":"2024-03-01T10:00:00","members":null}"#,
        )
        .expect("project should decode");
        assert!(project.members.is_empty());
    }

    #[test]
    fn member_lookup_finds_user() {
        let project: Project = serde_json::from_str(
            r#"{"id":1,"name":"Backend","key":"BE","created_at":"2024-03-01T10:00:00",
                "members":[{"user":{"id":7,"name":"Ann","email":"ann@example.com","created_at":"2024-01-01T00:00:00"},"role":"maintainer"}]}"#,
        )
        .expect("project should decode");
        assert_eq!(project.member(7).map(|m| m.role), Some(MemberRole::Maintainer));
        assert!(project.member(8).is_none());
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Maintainer".parse::<MemberRole>(), Ok(MemberRole::Maintainer));
        assert!("owner".parse::<MemberRole>().is_err());
        assert_eq!(MemberRole::default(), MemberRole::Member);
    }
}
