use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use labelgate_application::{DirectoryRepository, ProjectRecord, UserRecord};
use labelgate_core::{AppResult, OrganizationId, ProjectId, UserId};

/// In-memory directory of users and projects for local runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryDirectoryRepository {
    users: RwLock<HashMap<UserId, UserRecord>>,
    projects: RwLock<HashMap<ProjectId, ProjectRecord>>,
}

impl InMemoryDirectoryRepository {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user.
    pub async fn upsert_user(&self, user: UserRecord) {
        self.users.write().await.insert(user.user_id, user);
    }

    /// Inserts or replaces a project.
    pub async fn upsert_project(&self, project: ProjectRecord) {
        self.projects
            .write()
            .await
            .insert(project.project_id, project);
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryDirectoryRepository {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn find_project(&self, project_id: ProjectId) -> AppResult<Option<ProjectRecord>> {
        Ok(self.projects.read().await.get(&project_id).cloned())
    }

    async fn list_projects(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<ProjectRecord>> {
        let projects = self.projects.read().await;
        let mut listed: Vec<ProjectRecord> = projects
            .values()
            .filter(|project| project.organization_id == organization_id)
            .cloned()
            .collect();
        listed.sort_by(|left, right| left.title.cmp(&right.title));
        Ok(listed)
    }
}
