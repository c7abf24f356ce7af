use std::str::FromStr;

use labelgate_application::{
    AssignmentOutcome, AssignmentResult, AuditLogEntry, HeldRole, RoleAssignment,
    RoleDefinition,
};
use labelgate_core::{AppError, UserIdentity};
use labelgate_domain::{PermissionType, RolePermission};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming role permission entry.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-permission-request.ts"
)]
pub struct RolePermissionRequest {
    pub permission_name: String,
    pub permission_type: String,
    pub resource: Option<String>,
    pub is_granted: Option<bool>,
}

/// Incoming payload for custom role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<RolePermissionRequest>,
}

/// Incoming payload replacing a role's permission entries.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/set-role-permissions-request.ts"
)]
pub struct SetRolePermissionsRequest {
    pub permissions: Vec<RolePermissionRequest>,
}

/// Incoming payload toggling a role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/set-role-active-request.ts"
)]
pub struct SetRoleActiveRequest {
    pub is_active: bool,
}

/// Incoming payload for role assignment.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-role-request.ts"
)]
pub struct AssignRoleRequest {
    pub user_id: String,
    pub role_name: String,
    pub notes: Option<String>,
}

/// Incoming payload for role revocation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/revoke-role-assignment-request.ts"
)]
pub struct RevokeRoleAssignmentRequest {
    pub user_id: String,
    pub role_name: String,
}

/// API representation of an RBAC role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub kind: String,
    pub is_system: bool,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: String,
}

/// API representation of a role permission entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-permission-response.ts"
)]
pub struct RolePermissionResponse {
    pub permission_name: String,
    pub permission_type: String,
    pub resource: String,
    pub is_granted: bool,
}

/// API representation of a role assignment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-assignment-response.ts"
)]
pub struct RoleAssignmentResponse {
    pub assignment_id: String,
    pub user_id: String,
    pub role_id: String,
    pub role_name: String,
    pub is_active: bool,
    pub assigned_by: Option<String>,
    pub assigned_at: String,
    pub revoked_at: Option<String>,
    pub revoked_by: Option<String>,
    pub notes: String,
}

/// API representation of an assignment request outcome.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-role-response.ts"
)]
pub struct AssignRoleResponse {
    pub outcome: String,
    pub assignment: RoleAssignmentResponse,
}

/// API representation of an audit log entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/audit-log-entry-response.ts"
)]
pub struct AuditLogEntryResponse {
    pub event_id: String,
    pub actor_id: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub detail: Option<String>,
    pub created_at: String,
}

/// API representation of a role held through an active assignment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/held-role-response.ts"
)]
pub struct HeldRoleResponse {
    pub role_id: String,
    pub name: String,
    pub display_name: String,
    pub assigned_at: String,
    pub permissions: Vec<RolePermissionResponse>,
}

/// API representation of the caller's roles and granted permissions.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/my-access-response.ts"
)]
pub struct MyAccessResponse {
    pub user_id: String,
    pub email: String,
    pub roles: Vec<HeldRoleResponse>,
}

/// API representation of a permission check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-check-response.ts"
)]
pub struct PermissionCheckResponse {
    pub permission: String,
    pub resource: String,
    pub has_permission: bool,
}

impl MyAccessResponse {
    pub fn new(user: &UserIdentity, roles: Vec<HeldRole>) -> Self {
        Self {
            user_id: user.user_id().to_string(),
            email: user.email().to_owned(),
            roles: roles.into_iter().map(HeldRoleResponse::from).collect(),
        }
    }
}

impl From<HeldRole> for HeldRoleResponse {
    fn from(value: HeldRole) -> Self {
        Self {
            role_id: value.role.role_id.to_string(),
            name: value.role.name.into(),
            display_name: value.role.display_name,
            assigned_at: value.assigned_at.to_rfc3339(),
            permissions: value
                .permissions
                .into_iter()
                .map(RolePermissionResponse::from)
                .collect(),
        }
    }
}

impl TryFrom<RolePermissionRequest> for RolePermission {
    type Error = AppError;

    fn try_from(value: RolePermissionRequest) -> Result<Self, Self::Error> {
        RolePermission::new(
            value.permission_name,
            PermissionType::from_str(value.permission_type.as_str())?,
            value.resource.unwrap_or_default(),
            value.is_granted.unwrap_or(true),
        )
    }
}

impl From<RoleDefinition> for RoleResponse {
    fn from(value: RoleDefinition) -> Self {
        Self {
            role_id: value.role_id.to_string(),
            kind: value.kind().as_str().to_owned(),
            name: value.name.into(),
            display_name: value.display_name,
            description: value.description,
            is_system: value.is_system,
            is_active: value.is_active,
            created_by: value.created_by.map(|user_id| user_id.to_string()),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

impl From<RolePermission> for RolePermissionResponse {
    fn from(value: RolePermission) -> Self {
        Self {
            permission_name: value.permission_name().to_owned(),
            permission_type: value.permission_type().as_str().to_owned(),
            resource: value.resource().to_owned(),
            is_granted: value.is_granted(),
        }
    }
}

impl From<RoleAssignment> for RoleAssignmentResponse {
    fn from(value: RoleAssignment) -> Self {
        Self {
            assignment_id: value.assignment_id.to_string(),
            user_id: value.user_id.to_string(),
            role_id: value.role_id.to_string(),
            role_name: value.role_name.into(),
            is_active: value.is_active,
            assigned_by: value.assigned_by.map(|user_id| user_id.to_string()),
            assigned_at: value.assigned_at.to_rfc3339(),
            revoked_at: value.revoked_at.map(|revoked_at| revoked_at.to_rfc3339()),
            revoked_by: value.revoked_by.map(|user_id| user_id.to_string()),
            notes: value.notes,
        }
    }
}

impl From<AssignmentResult> for AssignRoleResponse {
    fn from(value: AssignmentResult) -> Self {
        let outcome = match value.outcome {
            AssignmentOutcome::Created => "created",
            AssignmentOutcome::Reactivated => "reactivated",
        };

        Self {
            outcome: outcome.to_owned(),
            assignment: RoleAssignmentResponse::from(value.assignment),
        }
    }
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(value: AuditLogEntry) -> Self {
        Self {
            event_id: value.event_id.to_string(),
            actor_id: value.actor_id.to_string(),
            action: value.action,
            resource_type: value.resource_type,
            resource_id: value.resource_id,
            detail: value.detail,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}
