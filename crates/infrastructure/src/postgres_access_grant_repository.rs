use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use labelgate_application::{
    AccessGrantRepository, ProjectAccessGrant, SettingsAccessGrant, SettingsAccessUpdate,
    UpsertProjectAccessInput, UpsertSettingsAccessInput,
};
use labelgate_core::{AppError, AppResult, ProjectId, UserId};
use labelgate_domain::{AccessLevel, SettingsAccessLevels, SettingsField};

use crate::postgres_rows::{
    PROJECT_ACCESS_COLUMNS, ProjectAccessRow, SETTINGS_ACCESS_COLUMNS, SettingsAccessRow,
    map_query_error,
};

mod project_access;
mod settings_access;


/// PostgreSQL-backed repository for project and settings access grants.
///
/// Upserts rely on the unique (user, project) constraints with `ON CONFLICT`, so concurrent
/// grants converge on one record.
#[derive(Clone)]
pub struct PostgresAccessGrantRepository {
    pool: PgPool,
}

impl PostgresAccessGrantRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'_, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))
    }
}

#[async_trait]
impl AccessGrantRepository for PostgresAccessGrantRepository {
    async fn upsert_project_access(
        &self,
        input: UpsertProjectAccessInput,
    ) -> AppResult<ProjectAccessGrant> {
        self.upsert_project_access_impl(input).await
    }

    async fn revoke_project_access(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<ProjectAccessGrant> {
        self.revoke_project_access_impl(user_id, project_id).await
    }

    async fn list_project_access_for_user(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<ProjectAccessGrant>> {
        self.list_project_access_impl("user_id", user_id.as_uuid())
            .await
    }

    async fn list_project_access_for_project(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Vec<ProjectAccessGrant>> {
        self.list_project_access_impl("project_id", project_id.as_uuid())
            .await
    }

    async fn upsert_settings_access(
        &self,
        input: UpsertSettingsAccessInput,
    ) -> AppResult<SettingsAccessGrant> {
        self.upsert_settings_access_impl(input).await
    }

    async fn update_settings_levels(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        changes: &[(SettingsField, AccessLevel)],
    ) -> AppResult<SettingsAccessUpdate> {
        self.update_settings_levels_impl(user_id, project_id, changes)
            .await
    }

    async fn revoke_settings_access(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<SettingsAccessGrant> {
        self.revoke_settings_access_impl(user_id, project_id).await
    }

    async fn list_settings_access_for_project(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Vec<SettingsAccessGrant>> {
        let sql = format!(
            "SELECT {SETTINGS_ACCESS_COLUMNS} FROM project_settings_access WHERE project_id = $1 AND is_active ORDER BY granted_at"
        );
        let rows = sqlx::query_as::<_, SettingsAccessRow>(sql.as_str())
            .bind(project_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(map_query_error("list settings access"))?;

        rows.into_iter().map(SettingsAccessGrant::try_from).collect()
    }
}

fn settings_column(field: SettingsField) -> &'static str {
    match field {
        SettingsField::General => "general_access",
        SettingsField::LabelingInterface => "labeling_interface_access",
        SettingsField::Annotation => "annotation_access",
        SettingsField::Model => "model_access",
        SettingsField::Predictions => "predictions_access",
        SettingsField::CloudStorage => "cloud_storage_access",
        SettingsField::Webhooks => "webhooks_access",
        SettingsField::DangerZone => "danger_zone_access",
    }
}

fn levels_in_column_order(levels: &SettingsAccessLevels) -> [&'static str; 8] {
    [
        levels.general.as_str(),
        levels.labeling_interface.as_str(),
        levels.annotation.as_str(),
        levels.model.as_str(),
        levels.predictions.as_str(),
        levels.cloud_storage.as_str(),
        levels.webhooks.as_str(),
        levels.danger_zone.as_str(),
    ]
}
