use super::*;

use crate::security_admin_ports::HeldRole;

impl SecurityAdminService {
    /// Lists the actor's active roles with the permission entries they grant.
    pub async fn my_access(&self, actor: &UserIdentity) -> AppResult<Vec<HeldRole>> {
        self.repository.list_held_roles(actor.user_id()).await
    }

    /// Returns whether any role the actor holds grants `permission_name` on `resource`.
    ///
    /// Resources match exactly, an empty resource names the unscoped entry.
    pub async fn check_permission(
        &self,
        actor: &UserIdentity,
        permission_name: &str,
        resource: &str,
    ) -> AppResult<bool> {
        let permission_name = permission_name.trim();
        if permission_name.is_empty() {
            return Err(AppError::Validation(
                "permission name must not be empty".to_owned(),
            ));
        }

        let resource = resource.trim();
        Ok(self
            .repository
            .list_held_roles(actor.user_id())
            .await?
            .iter()
            .any(|held| held.grants(permission_name, resource)))
    }
}
