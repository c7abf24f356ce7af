use super::*;

impl InMemoryAccessControlRepository {
    pub(super) async fn upsert_project_access_impl(
        &self,
        input: UpsertProjectAccessInput,
    ) -> AppResult<ProjectAccessGrant> {
        let mut grants = self.project_access.write().await;
        let grant = grants
            .entry((input.user_id, input.project_id))
            .or_insert_with(|| ProjectAccessGrant {
                grant_id: Uuid::new_v4(),
                user_id: input.user_id,
                project_id: input.project_id,
                access_level: input.access_level,
                granted_by: None,
                granted_at: Utc::now(),
                expires_at: None,
                is_active: true,
            });

        grant.access_level = input.access_level;
        grant.granted_by = Some(input.granted_by);
        grant.granted_at = Utc::now();
        grant.expires_at = input.expires_at;
        grant.is_active = true;
        Ok(grant.clone())
    }

    pub(super) async fn revoke_project_access_impl(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<ProjectAccessGrant> {
        let mut grants = self.project_access.write().await;
        let grant = grants
            .get_mut(&(user_id, project_id))
            .filter(|grant| grant.is_active)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "user '{user_id}' has no active access to project '{project_id}'"
                ))
            })?;

        grant.is_active = false;
        Ok(grant.clone())
    }

    pub(super) async fn list_project_access_impl<F>(
        &self,
        predicate: F,
    ) -> AppResult<Vec<ProjectAccessGrant>>
    where
        F: Fn(&ProjectAccessGrant) -> bool + Send,
    {
        let grants = self.project_access.read().await;
        let mut listed: Vec<ProjectAccessGrant> = grants
            .values()
            .filter(|grant| grant.is_active && predicate(grant))
            .cloned()
            .collect();
        listed.sort_by_key(|grant| grant.granted_at);
        Ok(listed)
    }

    pub(super) async fn upsert_settings_access_impl(
        &self,
        input: UpsertSettingsAccessInput,
    ) -> AppResult<SettingsAccessGrant> {
        let mut grants = self.settings_access.write().await;
        let grant = grants
            .entry((input.user_id, input.project_id))
            .or_insert_with(|| SettingsAccessGrant {
                grant_id: Uuid::new_v4(),
                user_id: input.user_id,
                project_id: input.project_id,
                levels: input.levels,
                granted_by: None,
                granted_at: Utc::now(),
                expires_at: None,
                is_active: true,
                notes: String::new(),
            });

        grant.levels = input.levels;
        grant.granted_by = Some(input.granted_by);
        grant.granted_at = Utc::now();
        grant.expires_at = input.expires_at;
        grant.is_active = true;
        grant.notes = input.notes;
        Ok(grant.clone())
    }

    pub(super) async fn update_settings_levels_impl(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        changes: &[(SettingsField, AccessLevel)],
    ) -> AppResult<SettingsAccessUpdate> {
        let now = Utc::now();
        let mut grants = self.settings_access.write().await;
        let grant = grants
            .get_mut(&(user_id, project_id))
            .filter(|grant| grant.is_effective_at(now))
            .ok_or_else(|| settings_not_found(user_id, project_id))?;

        let previous = grant.levels;
        for (field, level) in changes {
            grant.levels.set(*field, *level);
        }

        Ok(SettingsAccessUpdate {
            previous,
            grant: grant.clone(),
        })
    }

    pub(super) async fn revoke_settings_access_impl(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<SettingsAccessGrant> {
        let mut grants = self.settings_access.write().await;
        let grant = grants
            .get_mut(&(user_id, project_id))
            .filter(|grant| grant.is_active)
            .ok_or_else(|| settings_not_found(user_id, project_id))?;

        grant.is_active = false;
        Ok(grant.clone())
    }
}

fn settings_not_found(user_id: UserId, project_id: ProjectId) -> AppError {
    AppError::NotFound(format!(
        "user '{user_id}' has no active settings access on project '{project_id}'"
    ))
}
