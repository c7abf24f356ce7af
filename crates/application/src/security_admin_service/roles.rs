use super::*;

use labelgate_domain::RolePermission;

use crate::security_admin_ports::{CreateRoleInput, NewRole};

impl SecurityAdminService {
    /// Lists roles, inactive ones only for administrators.
    pub async fn list_roles(
        &self,
        actor: &UserIdentity,
        include_inactive: bool,
    ) -> AppResult<Vec<RoleDefinition>> {
        if include_inactive {
            self.authorization_service.require_admin(actor).await?;
        }

        self.repository.list_roles(include_inactive).await
    }

    /// Creates a role under its canonical name and emits an audit event.
    pub async fn create_role(
        &self,
        actor: &UserIdentity,
        input: CreateRoleInput,
    ) -> AppResult<RoleDefinition> {
        let name = RoleName::new(input.name)?;
        self.require_role_manage(actor, name.kind()).await?;

        let display_name = input
            .display_name
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| name.default_display_name());

        let role = self
            .repository
            .create_role(NewRole {
                name,
                display_name,
                description: input.description.trim().to_owned(),
                is_system: false,
                created_by: Some(actor.user_id()),
            })
            .await?;

        if !input.permissions.is_empty() {
            self.repository
                .replace_role_permissions(&role.name, input.permissions)
                .await?;
        }

        self.append_audit(
            actor,
            AuditAction::RoleCreated,
            "role",
            role.name.to_string(),
            format!("created role '{}'", role.name),
        )
        .await?;

        Ok(role)
    }

    /// Activates or deactivates a role. System roles stay active.
    pub async fn set_role_active(
        &self,
        actor: &UserIdentity,
        role_name: &str,
        is_active: bool,
    ) -> AppResult<RoleDefinition> {
        let name = RoleName::new(role_name)?;
        self.require_role_manage(actor, name.kind()).await?;

        let role = self.require_role(&name).await?;
        if role.is_system && !is_active {
            return Err(AppError::Validation(format!(
                "system role '{name}' cannot be deactivated"
            )));
        }

        let role = self.repository.set_role_active(&name, is_active).await?;

        let action = if is_active {
            AuditAction::RoleActivated
        } else {
            AuditAction::RoleDeactivated
        };
        self.append_audit(
            actor,
            action,
            "role",
            name.to_string(),
            format!("set role '{name}' active={is_active}"),
        )
        .await?;

        Ok(role)
    }

    /// Replaces the permission entries of a role and emits an audit event.
    pub async fn set_role_permissions(
        &self,
        actor: &UserIdentity,
        role_name: &str,
        permissions: Vec<RolePermission>,
    ) -> AppResult<Vec<RolePermission>> {
        let name = RoleName::new(role_name)?;
        self.require_role_manage(actor, name.kind()).await?;
        self.require_role(&name).await?;

        let count = permissions.len();
        let permissions = self
            .repository
            .replace_role_permissions(&name, permissions)
            .await?;

        self.append_audit(
            actor,
            AuditAction::RolePermissionsUpdated,
            "role",
            name.to_string(),
            format!("replaced permissions of role '{name}' with {count} entries"),
        )
        .await?;

        Ok(permissions)
    }

    /// Lists the permission entries of a role.
    pub async fn list_role_permissions(
        &self,
        actor: &UserIdentity,
        role_name: &str,
    ) -> AppResult<Vec<RolePermission>> {
        self.authorization_service.require_admin(actor).await?;

        let name = RoleName::new(role_name)?;
        self.require_role(&name).await?;
        self.repository.list_role_permissions(&name).await
    }
}
