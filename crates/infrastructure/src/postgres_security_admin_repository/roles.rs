use super::*;

impl PostgresSecurityAdminRepository {
    pub(super) async fn create_role_impl(&self, role: NewRole) -> AppResult<RoleDefinition> {
        let sql = format!(
            r#"
            INSERT INTO rbac_roles (name, display_name, description, is_system, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ROLE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, RoleRow>(sql.as_str())
            .bind(role.name.as_str())
            .bind(role.display_name.as_str())
            .bind(role.description.as_str())
            .bind(role.is_system)
            .bind(role.created_by.map(|user_id| user_id.as_uuid()))
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                map_write_error(error, || format!("role '{}' already exists", role.name))
            })?;

        RoleDefinition::try_from(row)
    }

    pub(super) async fn find_role_impl(
        &self,
        name: &RoleName,
    ) -> AppResult<Option<RoleDefinition>> {
        let sql = format!("SELECT {ROLE_COLUMNS} FROM rbac_roles WHERE name = $1");
        let row = sqlx::query_as::<_, RoleRow>(sql.as_str())
            .bind(name.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_query_error("find role"))?;

        row.map(RoleDefinition::try_from).transpose()
    }

    pub(super) async fn list_roles_impl(
        &self,
        include_inactive: bool,
    ) -> AppResult<Vec<RoleDefinition>> {
        let sql = format!(
            "SELECT {ROLE_COLUMNS} FROM rbac_roles WHERE $1 OR is_active ORDER BY name"
        );
        let rows = sqlx::query_as::<_, RoleRow>(sql.as_str())
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await
            .map_err(map_query_error("list roles"))?;

        rows.into_iter().map(RoleDefinition::try_from).collect()
    }

    pub(super) async fn set_role_active_impl(
        &self,
        name: &RoleName,
        is_active: bool,
    ) -> AppResult<RoleDefinition> {
        let sql = format!(
            "UPDATE rbac_roles SET is_active = $2 WHERE name = $1 RETURNING {ROLE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, RoleRow>(sql.as_str())
            .bind(name.as_str())
            .bind(is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_query_error("update role"))?
            .ok_or_else(|| role_not_found(name))?;

        RoleDefinition::try_from(row)
    }

    pub(super) async fn replace_role_permissions_impl(
        &self,
        name: &RoleName,
        permissions: Vec<RolePermission>,
    ) -> AppResult<Vec<RolePermission>> {
        let mut transaction = self.begin().await?;

        let role_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM rbac_roles
            WHERE name = $1
            FOR UPDATE
            "#,
        )
        .bind(name.as_str())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(map_query_error("resolve role"))?
        .ok_or_else(|| role_not_found(name))?;

        sqlx::query("DELETE FROM rbac_role_permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *transaction)
            .await
            .map_err(map_query_error("clear role permissions"))?;

        for permission in &permissions {
            sqlx::query(
                r#"
                INSERT INTO rbac_role_permissions (
                    role_id,
                    permission_name,
                    permission_type,
                    resource,
                    is_granted
                )
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (role_id, permission_name, resource) DO UPDATE
                SET permission_type = EXCLUDED.permission_type,
                    is_granted = EXCLUDED.is_granted
                "#,
            )
            .bind(role_id)
            .bind(permission.permission_name())
            .bind(permission.permission_type().as_str())
            .bind(permission.resource())
            .bind(permission.is_granted())
            .execute(&mut *transaction)
            .await
            .map_err(map_query_error("persist role permission"))?;
        }

        let stored = list_permissions(&mut transaction, name).await?;
        commit(transaction).await?;
        Ok(stored)
    }

    pub(super) async fn list_held_roles_impl(&self, user_id: UserId) -> AppResult<Vec<HeldRole>> {
        let role_rows = sqlx::query_as::<_, HeldRoleRow>(
            r#"
            SELECT
                roles.id AS role_id,
                roles.name,
                roles.display_name,
                roles.description,
                roles.is_system,
                roles.is_active,
                roles.created_by,
                roles.created_at,
                assignments.assigned_at
            FROM rbac_user_role_assignments AS assignments
            INNER JOIN rbac_roles AS roles
                ON roles.id = assignments.role_id
            WHERE assignments.user_id = $1
                AND assignments.is_active
                AND roles.is_active
            ORDER BY roles.name
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_query_error("list held roles"))?;

        let role_ids: Vec<Uuid> = role_rows.iter().map(|row| row.role.role_id).collect();
        let permission_rows = sqlx::query_as::<_, HeldPermissionRow>(
            r#"
            SELECT
                role_id,
                permission_name,
                permission_type,
                resource,
                is_granted
            FROM rbac_role_permissions
            WHERE role_id = ANY($1) AND is_granted
            ORDER BY permission_name, resource
            "#,
        )
        .bind(role_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_query_error("list held role permissions"))?;

        let mut permissions = Vec::with_capacity(permission_rows.len());
        for row in permission_rows {
            permissions.push((row.role_id, RolePermission::try_from(row.permission)?));
        }

        role_rows
            .into_iter()
            .map(|row| {
                let role_id = row.role.role_id;
                Ok(HeldRole {
                    role: RoleDefinition::try_from(row.role)?,
                    assigned_at: row.assigned_at,
                    permissions: permissions
                        .iter()
                        .filter(|(owner, _)| *owner == role_id)
                        .map(|(_, permission)| permission.clone())
                        .collect(),
                })
            })
            .collect()
    }
}
