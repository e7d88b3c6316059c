use crate::client::HubClient;
use crate::error::Result;
use crate::models::{Issue, IssueCreate, IssueQuery, IssueUpdate};
use tracing::debug;

impl HubClient {
    pub async fn list_issues(&self, project_id: i64, query: &IssueQuery) -> Result<Vec<Issue>> {
        let path = format!("projects/{}/issues", project_id);
        let query = query.normalized();
        debug!(
            "listing issues for project {} (page {}, per_page {})",
            project_id, query.page, query.per_page
        );
        self.get_with_query(&path, &query).await
    }

    pub async fn get_issue(&self, issue_id: i64) -> Result<Issue> {
        let path = format!("issues/{}", issue_id);
        self.get(&path).await
    }

    pub async fn create_issue(&self, project_id: i64, payload: &IssueCreate) -> Result<Issue> {
        let path = format!("projects/{}/issues", project_id);
        self.post(&path, payload).await
    }

    pub async fn update_issue(&self, issue_id: i64, payload: &IssueUpdate) -> Result<Issue> {
        let path = format!("issues/{}", issue_id);
        self.patch(&path, payload).await
    }

    pub async fn delete_issue(&self, issue_id: i64) -> Result<()> {
        let path = format!("issues/{}", issue_id);
        self.delete(&path).await
    }
}
