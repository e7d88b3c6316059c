mod comment;
mod health;
mod issue;
mod project;
mod user;

pub(crate) use comment::CommentCreateRequest;
pub use comment::Comment;
pub use health::Health;
pub use issue::{
    Issue, IssueCreate, IssuePriority, IssueQuery, IssueSort, IssueStatus, IssueUpdate, SortOrder,
    DEFAULT_PER_PAGE, MAX_PER_PAGE,
};
pub use project::{AddProjectMember, MemberRole, MessageResponse, Project, ProjectCreate, ProjectMember};
pub(crate) use user::{LoginRequest, SignupRequest};
pub use user::{TokenResponse, User};
