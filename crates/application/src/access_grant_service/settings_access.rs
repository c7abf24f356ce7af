use super::*;

use labelgate_domain::{SettingsAccessLevels, SettingsAccessTemplate, SettingsField};

use crate::access_grant_ports::{
    GrantSettingsAccessInput, SettingsAccessGrant, UpsertSettingsAccessInput,
};

/// Effective access of one principal on one settings section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAccessCheck {
    /// Checked section.
    pub field: SettingsField,
    /// Level the caller asked about.
    pub required_level: AccessLevel,
    /// Effective level of the principal.
    pub current_level: AccessLevel,
    /// Whether the decision engine allows the access.
    pub has_access: bool,
}

/// The actor's own settings grant next to the levels the decision engine applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsAccessSummary {
    /// Effective explicit grant, if any.
    pub grant: Option<SettingsAccessGrant>,
    /// Per-field levels after admin and ownership overrides.
    pub effective_levels: SettingsAccessLevels,
}

impl AccessGrantService {
    /// Grants or re-grants settings access and emits an audit event.
    pub async fn grant_settings_access(
        &self,
        actor: &UserIdentity,
        input: GrantSettingsAccessInput,
    ) -> AppResult<SettingsAccessGrant> {
        validate_expiry(input.expires_at)?;
        let project = self
            .require_project_level(actor, input.project_id, AccessLevel::Admin)
            .await?;
        let target = self.require_user(input.user_id).await?;

        let grant = self
            .repository
            .upsert_settings_access(UpsertSettingsAccessInput {
                user_id: target.user_id,
                project_id: project.project_id,
                levels: input.levels,
                expires_at: input.expires_at,
                granted_by: actor.user_id(),
                notes: input.notes.trim().to_owned(),
            })
            .await?;

        self.append_audit(
            actor,
            &project,
            AuditAction::SettingsAccessGranted,
            "project_settings_access",
            target.user_id,
            format!("granted settings access {}", grant.levels.describe()),
        )
        .await?;

        Ok(grant)
    }

    /// Applies per-field changes to an existing settings grant.
    pub async fn update_settings_access(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        project_id: ProjectId,
        changes: Vec<(SettingsField, AccessLevel)>,
    ) -> AppResult<SettingsAccessGrant> {
        if changes.is_empty() {
            return Err(AppError::Validation(
                "at least one settings field must be updated".to_owned(),
            ));
        }
        let project = self
            .require_project_level(actor, project_id, AccessLevel::Admin)
            .await?;

        let update = self
            .repository
            .update_settings_levels(user_id, project_id, &changes)
            .await?;

        let changed = changes
            .iter()
            .map(|(field, level)| {
                format!(
                    "{}: {} -> {}",
                    field.as_str(),
                    update.previous.get(*field).as_str(),
                    level.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        self.append_audit(
            actor,
            &project,
            AuditAction::SettingsAccessUpdated,
            "project_settings_access",
            user_id,
            format!("updated settings access {changed}"),
        )
        .await?;

        Ok(update.grant)
    }

    /// Revokes a settings grant and emits an audit event.
    pub async fn revoke_settings_access(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<SettingsAccessGrant> {
        let project = self
            .require_project_level(actor, project_id, AccessLevel::Admin)
            .await?;

        let grant = self
            .repository
            .revoke_settings_access(user_id, project_id)
            .await?;

        self.append_audit(
            actor,
            &project,
            AuditAction::SettingsAccessRevoked,
            "project_settings_access",
            user_id,
            format!("revoked settings access on '{}'", project.title),
        )
        .await?;

        Ok(grant)
    }

    /// Replaces a user's settings grant with the levels of a built-in template.
    pub async fn apply_settings_template(
        &self,
        actor: &UserIdentity,
        template: SettingsAccessTemplate,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<SettingsAccessGrant> {
        let project = self
            .require_project_level(actor, project_id, AccessLevel::Admin)
            .await?;
        let target = self.require_user(user_id).await?;

        let grant = self
            .repository
            .upsert_settings_access(UpsertSettingsAccessInput {
                user_id: target.user_id,
                project_id,
                levels: template.levels(),
                expires_at: None,
                granted_by: actor.user_id(),
                notes: format!("Applied template: {}", template.display_name()),
            })
            .await?;

        self.append_audit(
            actor,
            &project,
            AuditAction::SettingsTemplateApplied,
            "project_settings_access",
            target.user_id,
            format!(
                "applied template '{}' to '{}'",
                template.as_str(),
                target.email
            ),
        )
        .await?;

        Ok(grant)
    }

    /// Lists effective settings grants on one project.
    pub async fn list_settings_access_for_project(
        &self,
        actor: &UserIdentity,
        project_id: ProjectId,
    ) -> AppResult<Vec<SettingsAccessGrant>> {
        self.require_project_level(actor, project_id, AccessLevel::Read)
            .await?;

        let now = Utc::now();
        Ok(self
            .repository
            .list_settings_access_for_project(project_id)
            .await?
            .into_iter()
            .filter(|grant| grant.is_effective_at(now))
            .collect())
    }

    /// Returns the actor's own effective settings grant on a project, if any.
    pub async fn my_settings_access(
        &self,
        actor: &UserIdentity,
        project_id: ProjectId,
    ) -> AppResult<SettingsAccessSummary> {
        self.require_project(project_id).await?;

        let grant = self
            .authorization_service
            .effective_settings_grant(actor.user_id(), project_id)
            .await?;
        let effective_levels = self
            .authorization_service
            .effective_settings_access(actor, project_id)
            .await;

        Ok(SettingsAccessSummary {
            grant,
            effective_levels,
        })
    }

    /// Reports the actor's effective level and decision on one settings section.
    pub async fn check_field_access(
        &self,
        actor: &UserIdentity,
        project_id: ProjectId,
        field: SettingsField,
        required_level: AccessLevel,
    ) -> AppResult<FieldAccessCheck> {
        self.require_project(project_id).await?;

        let decision = self
            .authorization_service
            .authorize(
                actor,
                Resource::project_settings(project_id, field),
                required_level,
            )
            .await;
        let current_level = self
            .authorization_service
            .effective_settings_access(actor, project_id)
            .await
            .get(field);

        Ok(FieldAccessCheck {
            field,
            required_level,
            current_level,
            has_access: decision.is_allowed(),
        })
    }

    /// Returns the built-in settings templates.
    #[must_use]
    pub fn list_settings_templates() -> &'static [SettingsAccessTemplate] {
        SettingsAccessTemplate::all()
    }
}
