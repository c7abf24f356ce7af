//! Application services and ports.

#![forbid(unsafe_code)]

mod access_grant_ports;
mod access_grant_service;
mod audit_ports;
mod authorization_service;
mod directory_ports;
mod security_admin_ports;
mod security_admin_service;

#[cfg(test)]
mod test_support;

pub use access_grant_ports::{
    AccessGrantRepository, GrantProjectAccessInput, GrantSettingsAccessInput, ProjectAccessGrant,
    SettingsAccessGrant, SettingsAccessUpdate, UpsertProjectAccessInput,
    UpsertSettingsAccessInput,
};
pub use access_grant_service::{AccessGrantService, FieldAccessCheck, SettingsAccessSummary};
pub use audit_ports::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
};
pub use authorization_service::{
    AccessDecision, AdminAllowList, AllowReason, AuthorizationRepository, AuthorizationService,
    DenyReason,
};
pub use directory_ports::{DirectoryRepository, ProjectRecord, UserRecord};
pub use security_admin_ports::{
    AssignRoleInput, AssignmentOutcome, AssignmentResult, CreateRoleInput, HeldRole, NewRole,
    NewRoleAssignment, RoleAssignment, RoleDefinition, SecurityAdminRepository,
};
pub use security_admin_service::SecurityAdminService;
