//! Typed Issue Hub REST API client crate used by the native client.

mod auth;
pub mod client;
mod comments;
pub mod config;
pub mod error;
mod issues;
pub mod models;
mod projects;

pub use client::HubClient;
pub use config::HubConfig;
pub use error::{HubError, Result};
pub use reqwest::StatusCode;
pub use models::{
    AddProjectMember, Comment, Health, Issue, IssueCreate, IssuePriority, IssueQuery, IssueSort,
    IssueStatus, IssueUpdate, MemberRole, MessageResponse, Project, ProjectCreate, ProjectMember,
    SortOrder, TokenResponse, User,
};
