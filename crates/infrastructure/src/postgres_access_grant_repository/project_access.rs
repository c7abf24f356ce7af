use super::*;

impl PostgresAccessGrantRepository {
    pub(super) async fn upsert_project_access_impl(
        &self,
        input: UpsertProjectAccessInput,
    ) -> AppResult<ProjectAccessGrant> {
        let sql = format!(
            r#"
            INSERT INTO project_access (user_id, project_id, access_level, granted_by, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, project_id) DO UPDATE
            SET access_level = EXCLUDED.access_level,
                granted_by = EXCLUDED.granted_by,
                granted_at = now(),
                expires_at = EXCLUDED.expires_at,
                is_active = true
            RETURNING {PROJECT_ACCESS_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ProjectAccessRow>(sql.as_str())
            .bind(input.user_id.as_uuid())
            .bind(input.project_id.as_uuid())
            .bind(input.access_level.as_str())
            .bind(input.granted_by.as_uuid())
            .bind(input.expires_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_query_error("upsert project access"))?;

        ProjectAccessGrant::try_from(row)
    }

    pub(super) async fn revoke_project_access_impl(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<ProjectAccessGrant> {
        let sql = format!(
            r#"
            UPDATE project_access
            SET is_active = false
            WHERE user_id = $1 AND project_id = $2 AND is_active
            RETURNING {PROJECT_ACCESS_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ProjectAccessRow>(sql.as_str())
            .bind(user_id.as_uuid())
            .bind(project_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_query_error("revoke project access"))?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "user '{user_id}' has no active access to project '{project_id}'"
                ))
            })?;

        ProjectAccessGrant::try_from(row)
    }

    pub(super) async fn list_project_access_impl(
        &self,
        key_column: &'static str,
        key: uuid::Uuid,
    ) -> AppResult<Vec<ProjectAccessGrant>> {
        let sql = format!(
            "SELECT {PROJECT_ACCESS_COLUMNS} FROM project_access WHERE {key_column} = $1 AND is_active ORDER BY granted_at"
        );
        let rows = sqlx::query_as::<_, ProjectAccessRow>(sql.as_str())
            .bind(key)
            .fetch_all(&self.pool)
            .await
            .map_err(map_query_error("list project access"))?;

        rows.into_iter().map(ProjectAccessGrant::try_from).collect()
    }
}
