use serde::{Deserialize, Serialize};

use crate::models::User;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Comment {
    pub id: i64,
    pub issue_id: i64,
    pub author_id: i64,
    #[serde(default)]
    pub author: Option<User>,
    pub body: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentCreateRequest<'a> {
    pub body: &'a str,
}
