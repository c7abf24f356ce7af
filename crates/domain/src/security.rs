use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a role is created.
    RoleCreated,
    /// Emitted when a role is activated.
    RoleActivated,
    /// Emitted when a role is deactivated.
    RoleDeactivated,
    /// Emitted when a role's permission set is replaced.
    RolePermissionsUpdated,
    /// Emitted when a role is assigned to a user for the first time.
    RoleAssigned,
    /// Emitted when a revoked assignment is reactivated.
    RoleReactivated,
    /// Emitted when a role assignment is revoked.
    RoleRevoked,
    /// Emitted when project access is granted or replaced.
    ProjectAccessGranted,
    /// Emitted when project access is revoked.
    ProjectAccessRevoked,
    /// Emitted when project settings access is granted or replaced.
    SettingsAccessGranted,
    /// Emitted when individual settings levels change.
    SettingsAccessUpdated,
    /// Emitted when project settings access is revoked.
    SettingsAccessRevoked,
    /// Emitted when a settings template is applied.
    SettingsTemplateApplied,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleCreated => "role.created",
            Self::RoleActivated => "role.activated",
            Self::RoleDeactivated => "role.deactivated",
            Self::RolePermissionsUpdated => "role.permissions_updated",
            Self::RoleAssigned => "role.assigned",
            Self::RoleReactivated => "role.reactivated",
            Self::RoleRevoked => "role.revoked",
            Self::ProjectAccessGranted => "project_access.granted",
            Self::ProjectAccessRevoked => "project_access.revoked",
            Self::SettingsAccessGranted => "settings_access.granted",
            Self::SettingsAccessUpdated => "settings_access.updated",
            Self::SettingsAccessRevoked => "settings_access.revoked",
            Self::SettingsTemplateApplied => "settings_access.template_applied",
        }
    }
}
