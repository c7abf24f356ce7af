//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod resource;
mod role;
mod security;
mod settings;

pub use access::{AccessLevel, AdminStatus};
pub use resource::Resource;
pub use role::{PermissionType, ROLE_NAME_MAX_LENGTH, RoleKind, RoleName, RolePermission};
pub use security::AuditAction;
pub use settings::{SettingsAccessLevels, SettingsAccessTemplate, SettingsField};
