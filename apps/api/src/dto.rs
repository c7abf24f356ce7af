use serde::Serialize;
use ts_rs::TS;

mod access;
mod authorization;
mod security;

pub use access::{
    ApplySettingsTemplateRequest, FieldAccessCheckResponse, GrantProjectAccessRequest,
    GrantSettingsAccessRequest, MySettingsAccessResponse, ProjectAccessResponse,
    RevokeProjectAccessRequest, SettingsAccessLevelsResponse, SettingsAccessResponse,
    SettingsTemplateResponse, UpdateSettingsAccessRequest,
};
pub use authorization::{AuthorizeRequest, AuthorizeResponse, ProjectResponse};
pub use security::{
    AssignRoleRequest, AssignRoleResponse, AuditLogEntryResponse, CreateRoleRequest,
    HeldRoleResponse, MyAccessResponse, PermissionCheckResponse, RevokeRoleAssignmentRequest,
    RoleAssignmentResponse, RolePermissionRequest, RolePermissionResponse, RoleResponse,
    SetRoleActiveRequest, SetRolePermissionsRequest,
};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: &'static str,
}
