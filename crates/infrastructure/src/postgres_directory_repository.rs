use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use labelgate_application::{DirectoryRepository, ProjectRecord, UserRecord};
use labelgate_core::{AppResult, OrganizationId, ProjectId, UserId};

use crate::postgres_rows::map_query_error;

/// PostgreSQL-backed read model over the host's users and projects.
#[derive(Clone)]
pub struct PostgresDirectoryRepository {
    pool: PgPool,
}

impl PostgresDirectoryRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    organization_id: Uuid,
    is_superuser: bool,
    is_staff: bool,
    created_by: Option<Uuid>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.id),
            email: row.email,
            organization_id: OrganizationId::from_uuid(row.organization_id),
            is_superuser: row.is_superuser,
            is_staff: row.is_staff,
            created_by: row.created_by.map(UserId::from_uuid),
        }
    }
}

#[derive(Debug, FromRow)]
struct ProjectRow {
    id: Uuid,
    organization_id: Uuid,
    title: String,
    created_by: Option<Uuid>,
}

impl From<ProjectRow> for ProjectRecord {
    fn from(row: ProjectRow) -> Self {
        Self {
            project_id: ProjectId::from_uuid(row.id),
            organization_id: OrganizationId::from_uuid(row.organization_id),
            title: row.title,
            created_by: row.created_by.map(UserId::from_uuid),
        }
    }
}

#[async_trait]
impl DirectoryRepository for PostgresDirectoryRepository {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, organization_id, is_superuser, is_staff, created_by
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_query_error("find user"))?;

        Ok(row.map(UserRecord::from))
    }

    async fn find_project(&self, project_id: ProjectId) -> AppResult<Option<ProjectRecord>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, organization_id, title, created_by
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(project_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_query_error("find project"))?;

        Ok(row.map(ProjectRecord::from))
    }

    async fn list_projects(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<ProjectRecord>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, organization_id, title, created_by
            FROM projects
            WHERE organization_id = $1
            ORDER BY title, id
            "#,
        )
        .bind(organization_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_query_error("list projects"))?;

        Ok(rows.into_iter().map(ProjectRecord::from).collect())
    }
}
