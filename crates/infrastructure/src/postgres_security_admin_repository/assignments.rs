use super::*;

use labelgate_application::AssignmentOutcome;

impl PostgresSecurityAdminRepository {
    pub(super) async fn activate_or_create_assignment_impl(
        &self,
        assignment: NewRoleAssignment,
    ) -> AppResult<AssignmentResult> {
        let mut transaction = self.begin().await?;

        let role_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM rbac_roles WHERE name = $1")
            .bind(assignment.role_name.as_str())
            .fetch_optional(&mut *transaction)
            .await
            .map_err(map_query_error("resolve role"))?
            .ok_or_else(|| role_not_found(&assignment.role_name))?;

        let existing = sqlx::query_as::<_, (Uuid, bool)>(
            r#"
            SELECT id, is_active
            FROM rbac_user_role_assignments
            WHERE user_id = $1 AND role_id = $2
            FOR UPDATE
            "#,
        )
        .bind(assignment.user_id.as_uuid())
        .bind(role_id)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(map_query_error("lock role assignment"))?;

        let conflict = || {
            format!(
                "user '{}' already holds role '{}'",
                assignment.user_id, assignment.role_name
            )
        };

        let (assignment_id, outcome) = match existing {
            Some((_, true)) => return Err(AppError::Conflict(conflict())),
            Some((assignment_id, false)) => {
                sqlx::query(
                    r#"
                    UPDATE rbac_user_role_assignments
                    SET is_active = true,
                        assigned_by = $2,
                        assigned_at = now(),
                        revoked_at = NULL,
                        revoked_by = NULL,
                        notes = CASE WHEN $3 = '' THEN notes ELSE $3 END
                    WHERE id = $1
                    "#,
                )
                .bind(assignment_id)
                .bind(assignment.assigned_by.as_uuid())
                .bind(assignment.notes.as_str())
                .execute(&mut *transaction)
                .await
                .map_err(map_query_error("reactivate role assignment"))?;

                (assignment_id, AssignmentOutcome::Reactivated)
            }
            None => {
                let assignment_id = sqlx::query_scalar::<_, Uuid>(
                    r#"
                    INSERT INTO rbac_user_role_assignments (user_id, role_id, assigned_by, notes)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id
                    "#,
                )
                .bind(assignment.user_id.as_uuid())
                .bind(role_id)
                .bind(assignment.assigned_by.as_uuid())
                .bind(assignment.notes.as_str())
                .fetch_one(&mut *transaction)
                .await
                .map_err(|error| map_write_error(error, conflict))?;

                (assignment_id, AssignmentOutcome::Created)
            }
        };

        let stored = fetch_assignment(&mut transaction, assignment_id).await?;
        commit(transaction).await?;

        Ok(AssignmentResult {
            assignment: stored,
            outcome,
        })
    }

    pub(super) async fn revoke_assignment_impl(
        &self,
        user_id: UserId,
        role_name: &RoleName,
        revoked_by: UserId,
    ) -> AppResult<RoleAssignment> {
        let mut transaction = self.begin().await?;

        let assignment_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE rbac_user_role_assignments AS assignments
            SET is_active = false,
                revoked_at = now(),
                revoked_by = $3
            FROM rbac_roles AS roles
            WHERE roles.id = assignments.role_id
                AND roles.name = $2
                AND assignments.user_id = $1
                AND assignments.is_active
            RETURNING assignments.id
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_name.as_str())
        .bind(revoked_by.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(map_query_error("revoke role assignment"))?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "user '{user_id}' has no active assignment of role '{role_name}'"
            ))
        })?;

        let stored = fetch_assignment(&mut transaction, assignment_id).await?;
        commit(transaction).await?;
        Ok(stored)
    }
}
