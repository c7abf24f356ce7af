use super::*;

impl PostgresAccessGrantRepository {
    pub(super) async fn upsert_settings_access_impl(
        &self,
        input: UpsertSettingsAccessInput,
    ) -> AppResult<SettingsAccessGrant> {
        let sql = format!(
            r#"
            INSERT INTO project_settings_access (
                user_id,
                project_id,
                general_access,
                labeling_interface_access,
                annotation_access,
                model_access,
                predictions_access,
                cloud_storage_access,
                webhooks_access,
                danger_zone_access,
                granted_by,
                expires_at,
                notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (user_id, project_id) DO UPDATE
            SET general_access = EXCLUDED.general_access,
                labeling_interface_access = EXCLUDED.labeling_interface_access,
                annotation_access = EXCLUDED.annotation_access,
                model_access = EXCLUDED.model_access,
                predictions_access = EXCLUDED.predictions_access,
                cloud_storage_access = EXCLUDED.cloud_storage_access,
                webhooks_access = EXCLUDED.webhooks_access,
                danger_zone_access = EXCLUDED.danger_zone_access,
                granted_by = EXCLUDED.granted_by,
                granted_at = now(),
                expires_at = EXCLUDED.expires_at,
                is_active = true,
                notes = EXCLUDED.notes
            RETURNING {SETTINGS_ACCESS_COLUMNS}
            "#
        );

        let mut query = sqlx::query_as::<_, SettingsAccessRow>(sql.as_str())
            .bind(input.user_id.as_uuid())
            .bind(input.project_id.as_uuid());
        for level in levels_in_column_order(&input.levels) {
            query = query.bind(level);
        }
        let row = query
            .bind(input.granted_by.as_uuid())
            .bind(input.expires_at)
            .bind(input.notes.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_query_error("upsert settings access"))?;

        SettingsAccessGrant::try_from(row)
    }

    pub(super) async fn update_settings_levels_impl(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        changes: &[(SettingsField, AccessLevel)],
    ) -> AppResult<SettingsAccessUpdate> {
        let mut transaction = self.begin().await?;

        let select = format!(
            r#"
            SELECT {SETTINGS_ACCESS_COLUMNS}
            FROM project_settings_access
            WHERE user_id = $1
                AND project_id = $2
                AND is_active
                AND (expires_at IS NULL OR expires_at >= now())
            FOR UPDATE
            "#
        );
        let current = sqlx::query_as::<_, SettingsAccessRow>(select.as_str())
            .bind(user_id.as_uuid())
            .bind(project_id.as_uuid())
            .fetch_optional(&mut *transaction)
            .await
            .map_err(map_query_error("lock settings access"))?
            .ok_or_else(|| settings_not_found(user_id, project_id))?;
        let current = SettingsAccessGrant::try_from(current)?;

        let mut levels = current.levels;
        for (field, level) in changes {
            levels.set(*field, *level);
        }

        let assignments = SettingsField::all()
            .iter()
            .enumerate()
            .map(|(index, field)| format!("{} = ${}", settings_column(*field), index + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let update = format!(
            "UPDATE project_settings_access SET {assignments} WHERE id = $1 RETURNING {SETTINGS_ACCESS_COLUMNS}"
        );
        let mut query =
            sqlx::query_as::<_, SettingsAccessRow>(update.as_str()).bind(current.grant_id);
        for level in levels_in_column_order(&levels) {
            query = query.bind(level);
        }
        let row = query
            .fetch_one(&mut *transaction)
            .await
            .map_err(map_query_error("update settings access"))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(SettingsAccessUpdate {
            previous: current.levels,
            grant: SettingsAccessGrant::try_from(row)?,
        })
    }

    pub(super) async fn revoke_settings_access_impl(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<SettingsAccessGrant> {
        let sql = format!(
            r#"
            UPDATE project_settings_access
            SET is_active = false
            WHERE user_id = $1 AND project_id = $2 AND is_active
            RETURNING {SETTINGS_ACCESS_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, SettingsAccessRow>(sql.as_str())
            .bind(user_id.as_uuid())
            .bind(project_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_query_error("revoke settings access"))?
            .ok_or_else(|| settings_not_found(user_id, project_id))?;

        SettingsAccessGrant::try_from(row)
    }
}

fn settings_not_found(user_id: UserId, project_id: ProjectId) -> AppError {
    AppError::NotFound(format!(
        "user '{user_id}' has no active settings access on project '{project_id}'"
    ))
}
