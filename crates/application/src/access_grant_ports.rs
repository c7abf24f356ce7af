use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use labelgate_core::{AppResult, ProjectId, UserId};
use labelgate_domain::{AccessLevel, SettingsAccessLevels, SettingsField};

/// Project access grant projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectAccessGrant {
    /// Stable grant identifier.
    pub grant_id: Uuid,
    /// Grantee.
    pub user_id: UserId,
    /// Project the grant applies to.
    pub project_id: ProjectId,
    /// Granted level.
    pub access_level: AccessLevel,
    /// User that issued the grant, when known.
    pub granted_by: Option<UserId>,
    /// Issue timestamp.
    pub granted_at: DateTime<Utc>,
    /// Optional expiry timestamp.
    pub expires_at: Option<DateTime<Utc>>,
    /// Cleared on revocation.
    pub is_active: bool,
}

impl ProjectAccessGrant {
    /// Returns whether the grant is active and not expired at `now`.
    #[must_use]
    pub fn is_effective_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.is_none_or(|expires_at| now <= expires_at)
    }
}

/// Project settings access grant projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsAccessGrant {
    /// Stable grant identifier.
    pub grant_id: Uuid,
    /// Grantee.
    pub user_id: UserId,
    /// Project the grant applies to.
    pub project_id: ProjectId,
    /// Per-field levels.
    pub levels: SettingsAccessLevels,
    /// User that issued the grant, when known.
    pub granted_by: Option<UserId>,
    /// Issue timestamp.
    pub granted_at: DateTime<Utc>,
    /// Optional expiry timestamp.
    pub expires_at: Option<DateTime<Utc>>,
    /// Cleared on revocation.
    pub is_active: bool,
    /// Free-form notes.
    pub notes: String,
}

impl SettingsAccessGrant {
    /// Returns whether the grant is active and not expired at `now`.
    #[must_use]
    pub fn is_effective_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.is_none_or(|expires_at| now <= expires_at)
    }
}

/// Input payload for granting project access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantProjectAccessInput {
    /// Grantee.
    pub user_id: UserId,
    /// Target project.
    pub project_id: ProjectId,
    /// Level to grant, `none` is rejected.
    pub access_level: AccessLevel,
    /// Optional expiry timestamp.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Input payload for granting settings access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantSettingsAccessInput {
    /// Grantee.
    pub user_id: UserId,
    /// Target project.
    pub project_id: ProjectId,
    /// Per-field levels.
    pub levels: SettingsAccessLevels,
    /// Optional expiry timestamp.
    pub expires_at: Option<DateTime<Utc>>,
    /// Free-form notes.
    pub notes: String,
}

/// Repository payload for the project access upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertProjectAccessInput {
    /// Grantee.
    pub user_id: UserId,
    /// Target project.
    pub project_id: ProjectId,
    /// Level to store.
    pub access_level: AccessLevel,
    /// Optional expiry timestamp.
    pub expires_at: Option<DateTime<Utc>>,
    /// Issuing user.
    pub granted_by: UserId,
}

/// Repository payload for the settings access upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertSettingsAccessInput {
    /// Grantee.
    pub user_id: UserId,
    /// Target project.
    pub project_id: ProjectId,
    /// Per-field levels.
    pub levels: SettingsAccessLevels,
    /// Optional expiry timestamp.
    pub expires_at: Option<DateTime<Utc>>,
    /// Issuing user.
    pub granted_by: UserId,
    /// Free-form notes.
    pub notes: String,
}

/// Result of a partial settings access update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsAccessUpdate {
    /// Levels before the update.
    pub previous: SettingsAccessLevels,
    /// Stored grant after the update.
    pub grant: SettingsAccessGrant,
}

/// Repository port for project and settings access records.
///
/// Upserts keep at most one record per (user, project) and reactivate a revoked record
/// instead of inserting a second one.
#[async_trait]
pub trait AccessGrantRepository: Send + Sync {
    /// Creates or reactivates the project access record.
    async fn upsert_project_access(
        &self,
        input: UpsertProjectAccessInput,
    ) -> AppResult<ProjectAccessGrant>;

    /// Deactivates the active project access record.
    async fn revoke_project_access(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<ProjectAccessGrant>;

    /// Lists active project access records held by one user.
    async fn list_project_access_for_user(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<ProjectAccessGrant>>;

    /// Lists active project access records on one project.
    async fn list_project_access_for_project(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Vec<ProjectAccessGrant>>;

    /// Creates or reactivates the settings access record.
    async fn upsert_settings_access(
        &self,
        input: UpsertSettingsAccessInput,
    ) -> AppResult<SettingsAccessGrant>;

    /// Applies per-field changes to the effective settings access record.
    ///
    /// Revoked and expired records are `NotFound`.
    async fn update_settings_levels(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        changes: &[(SettingsField, AccessLevel)],
    ) -> AppResult<SettingsAccessUpdate>;

    /// Deactivates the active settings access record.
    async fn revoke_settings_access(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<SettingsAccessGrant>;

    /// Lists active settings access records on one project.
    async fn list_settings_access_for_project(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Vec<SettingsAccessGrant>>;
}
