use super::*;

use crate::security_admin_ports::{
    AssignRoleInput, AssignmentOutcome, AssignmentResult, NewRoleAssignment, RoleAssignment,
};

impl SecurityAdminService {
    /// Assigns a role, reactivating a revoked assignment when one exists.
    pub async fn assign_role(
        &self,
        actor: &UserIdentity,
        input: AssignRoleInput,
    ) -> AppResult<AssignmentResult> {
        let name = RoleName::new(input.role_name)?;
        let target = self.require_user(input.user_id).await?;
        let role = self.require_role(&name).await?;
        if !role.is_active {
            return Err(AppError::Validation(format!(
                "role '{name}' is inactive and cannot be assigned"
            )));
        }
        self.require_assignment_manage(actor, &target, role.kind())
            .await?;

        let result = self
            .repository
            .activate_or_create_assignment(NewRoleAssignment {
                user_id: target.user_id,
                role_name: name.clone(),
                assigned_by: actor.user_id(),
                notes: input.notes.unwrap_or_default(),
            })
            .await?;

        let action = match result.outcome {
            AssignmentOutcome::Created => AuditAction::RoleAssigned,
            AssignmentOutcome::Reactivated => AuditAction::RoleReactivated,
        };
        self.append_audit(
            actor,
            action,
            "role_assignment",
            format!("{}:{name}", target.user_id),
            format!("assigned role '{name}' to '{}'", target.email),
        )
        .await?;

        Ok(result)
    }

    /// Revokes an active assignment and emits an audit event.
    pub async fn revoke_assignment(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        role_name: &str,
    ) -> AppResult<RoleAssignment> {
        let name = RoleName::new(role_name)?;
        let target = self.require_user(user_id).await?;
        self.require_assignment_manage(actor, &target, name.kind())
            .await?;

        let assignment = self
            .repository
            .revoke_assignment(user_id, &name, actor.user_id())
            .await?;

        self.append_audit(
            actor,
            AuditAction::RoleRevoked,
            "role_assignment",
            format!("{user_id}:{name}"),
            format!("revoked role '{name}' from '{}'", target.email),
        )
        .await?;

        Ok(assignment)
    }

    /// Lists assignments of one user, for the user themselves or an administrator.
    pub async fn list_assignments_for_user(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        active_only: bool,
    ) -> AppResult<Vec<RoleAssignment>> {
        if user_id != actor.user_id() {
            self.authorization_service
                .require_admin_of(actor, user_id)
                .await?;
        }

        self.repository
            .list_assignments_for_user(user_id, active_only)
            .await
    }

    /// Lists active assignments of one role.
    pub async fn list_assignments_for_role(
        &self,
        actor: &UserIdentity,
        role_name: &str,
    ) -> AppResult<Vec<RoleAssignment>> {
        self.authorization_service.require_admin(actor).await?;

        let name = RoleName::new(role_name)?;
        self.require_role(&name).await?;
        self.repository.list_assignments_for_role(&name).await
    }
}
