use async_trait::async_trait;

use labelgate_core::{AppResult, OrganizationId, ProjectId, UserId, UserIdentity};

/// User record owned by the host product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Stable user identifier.
    pub user_id: UserId,
    /// Login email.
    pub email: String,
    /// Organization the user belongs to.
    pub organization_id: OrganizationId,
    /// Host superuser flag.
    pub is_superuser: bool,
    /// Host staff flag.
    pub is_staff: bool,
    /// User who created this account, when known.
    pub created_by: Option<UserId>,
}

impl UserRecord {
    /// Builds the principal used for authorization decisions.
    #[must_use]
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(self.user_id, self.email.clone(), self.organization_id)
            .with_flags(self.is_superuser, self.is_staff)
    }
}

/// Project record owned by the host product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    /// Stable project identifier.
    pub project_id: ProjectId,
    /// Organization the project belongs to.
    pub organization_id: OrganizationId,
    /// Project title.
    pub title: String,
    /// Creator of the project, used for the ownership fallback.
    pub created_by: Option<UserId>,
}

/// Read-only port onto the host product's users and projects.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Finds one user.
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Finds one project.
    async fn find_project(&self, project_id: ProjectId) -> AppResult<Option<ProjectRecord>>;

    /// Lists projects in an organization ordered by title.
    async fn list_projects(&self, organization_id: OrganizationId)
    -> AppResult<Vec<ProjectRecord>>;
}
