use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use labelgate_application::{AssignRoleInput, CreateRoleInput};
use labelgate_core::{AppResult, UserId, UserIdentity};
use labelgate_domain::RolePermission;

use crate::dto::{
    AssignRoleRequest, AssignRoleResponse, AuditLogEntryResponse, CreateRoleRequest,
    MyAccessResponse, PermissionCheckResponse, RevokeRoleAssignmentRequest,
    RoleAssignmentResponse, RolePermissionRequest, RolePermissionResponse, RoleResponse,
    SetRoleActiveRequest, SetRolePermissionsRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod assignments;
mod audit;
mod permissions;
mod roles;

#[cfg(test)]
mod tests;

pub use assignments::{
    assign_role_handler, list_role_assignments_handler, list_user_role_assignments_handler,
    revoke_role_assignment_handler,
};
pub use audit::list_audit_log_handler;
pub use permissions::{check_permission_handler, my_access_handler};
pub use roles::{
    create_role_handler, list_role_permissions_handler, list_roles_handler,
    set_role_active_handler, set_role_permissions_handler,
};

fn parse_permissions(permissions: Vec<RolePermissionRequest>) -> AppResult<Vec<RolePermission>> {
    permissions
        .into_iter()
        .map(RolePermission::try_from)
        .collect()
}
