use async_trait::async_trait;
use sqlx::PgPool;

use labelgate_application::{AuthorizationRepository, ProjectAccessGrant, SettingsAccessGrant};
use labelgate_core::{AppResult, ProjectId, UserId};
use labelgate_domain::RoleKind;

use crate::postgres_rows::{
    PROJECT_ACCESS_COLUMNS, ProjectAccessRow, SETTINGS_ACCESS_COLUMNS, SettingsAccessRow,
    map_query_error, stored_role_name,
};

/// PostgreSQL-backed repository for decision lookups.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn list_active_role_kinds(&self, user_id: UserId) -> AppResult<Vec<RoleKind>> {
        let role_names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT roles.name
            FROM rbac_user_role_assignments AS assignments
            INNER JOIN rbac_roles AS roles
                ON roles.id = assignments.role_id
            WHERE assignments.user_id = $1
                AND assignments.is_active
                AND roles.is_active
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_query_error("list active roles"))?;

        role_names
            .into_iter()
            .map(|name| stored_role_name(name).map(|name| name.kind()))
            .collect()
    }

    async fn find_project_access(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<Option<ProjectAccessGrant>> {
        let sql = format!(
            "SELECT {PROJECT_ACCESS_COLUMNS} FROM project_access WHERE user_id = $1 AND project_id = $2"
        );
        let row = sqlx::query_as::<_, ProjectAccessRow>(sql.as_str())
            .bind(user_id.as_uuid())
            .bind(project_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_query_error("find project access"))?;

        row.map(ProjectAccessGrant::try_from).transpose()
    }

    async fn find_settings_access(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<Option<SettingsAccessGrant>> {
        let sql = format!(
            "SELECT {SETTINGS_ACCESS_COLUMNS} FROM project_settings_access WHERE user_id = $1 AND project_id = $2"
        );
        let row = sqlx::query_as::<_, SettingsAccessRow>(sql.as_str())
            .bind(user_id.as_uuid())
            .bind(project_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_query_error("find settings access"))?;

        row.map(SettingsAccessGrant::try_from).transpose()
    }
}
