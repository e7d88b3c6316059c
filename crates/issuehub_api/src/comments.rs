use crate::client::HubClient;
use crate::error::Result;
use crate::models::{Comment, CommentCreateRequest};

impl HubClient {
    /// Lists comments of an issue, oldest first.
    pub async fn list_comments(&self, issue_id: i64) -> Result<Vec<Comment>> {
        let path = format!("issues/{}/comments", issue_id);
        self.get(&path).await
    }

    pub async fn create_comment(&self, issue_id: i64, body: &str) -> Result<Comment> {
        let path = format!("issues/{}/comments", issue_id);
        let payload = CommentCreateRequest { body };
        self.post(&path, &payload).await
    }
}
