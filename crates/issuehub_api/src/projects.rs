use crate::client::HubClient;
use crate::error::Result;
use crate::models::{AddProjectMember, MessageResponse, Project, ProjectCreate};

impl HubClient {
    /// Lists the projects the current user is a member of.
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.get("projects").await
    }

    pub async fn get_project(&self, project_id: i64) -> Result<Project> {
        let path = format!("projects/{}", project_id);
        self.get(&path).await
    }

    /// Creates a project; the backend makes the caller its first maintainer.
    pub async fn create_project(&self, payload: &ProjectCreate) -> Result<Project> {
        self.post("projects", payload).await
    }

    pub async fn add_project_member(
        &self,
        project_id: i64,
        payload: &AddProjectMember,
    ) -> Result<MessageResponse> {
        let path = format!("projects/{}/members", project_id);
        self.post(&path, payload).await
    }
}
