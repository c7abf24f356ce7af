use std::fmt::{Display, Formatter};
use std::str::FromStr;

use labelgate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Maximum length of a canonical role name.
pub const ROLE_NAME_MAX_LENGTH: usize = 100;

const ADMIN_SYNONYMS: &[&str] = &["admin", "administrator"];
const SUPER_ADMIN_SYNONYMS: &[&str] = &["super_admin", "superadmin", "super_administrator"];

/// Canonical role name.
///
/// Names are normalized once when constructed: trimmed, lowercased, with hyphens and
/// whitespace folded into single underscores. Known synonyms of the built-in admin roles
/// collapse onto one canonical spelling, so "Administrator", "ADMIN" and "admin" name the
/// same role and cannot coexist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    /// Canonical name of the built-in super-admin role.
    pub const SUPER_ADMIN: &'static str = "super_admin";
    /// Canonical name of the built-in admin role.
    pub const ADMIN: &'static str = "admin";

    /// Creates a canonical role name from user input.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let canonical = canonicalize(value.as_str());

        if canonical.is_empty() {
            return Err(AppError::Validation(
                "role name must contain at least one letter or digit".to_owned(),
            ));
        }

        if canonical.len() > ROLE_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "role name must be at most {ROLE_NAME_MAX_LENGTH} characters"
            )));
        }

        if let Some(invalid) = canonical
            .chars()
            .find(|character| !(character.is_ascii_alphanumeric() || *character == '_'))
        {
            return Err(AppError::Validation(format!(
                "role name '{value}' contains unsupported character '{invalid}'"
            )));
        }

        Ok(Self(canonical))
    }

    /// Returns the canonical name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the built-in classification of this role.
    #[must_use]
    pub fn kind(&self) -> RoleKind {
        match self.0.as_str() {
            Self::SUPER_ADMIN => RoleKind::SuperAdmin,
            Self::ADMIN => RoleKind::Admin,
            _ => RoleKind::Custom,
        }
    }

    /// Derives a human-readable display name, e.g. `project_lead` -> `Project Lead`.
    #[must_use]
    pub fn default_display_name(&self) -> String {
        self.0
            .split('_')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let mut characters = segment.chars();
                match characters.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + characters.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Display for RoleName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for RoleName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

fn canonicalize(value: &str) -> String {
    let mut folded = String::with_capacity(value.len());
    for character in value.trim().chars() {
        let character = if character == '-' || character.is_whitespace() {
            '_'
        } else {
            character.to_ascii_lowercase()
        };

        if character == '_' && (folded.is_empty() || folded.ends_with('_')) {
            continue;
        }
        folded.push(character);
    }

    while folded.ends_with('_') {
        folded.pop();
    }

    if SUPER_ADMIN_SYNONYMS.contains(&folded.as_str()) {
        return RoleName::SUPER_ADMIN.to_owned();
    }
    if ADMIN_SYNONYMS.contains(&folded.as_str()) {
        return RoleName::ADMIN.to_owned();
    }

    folded
}

/// Built-in classification of a role, derived from its canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    /// Grants global super-admin override.
    SuperAdmin,
    /// Grants organization-scoped admin override.
    Admin,
    /// Custom role without override semantics.
    Custom,
}

impl RoleKind {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Custom => "custom",
        }
    }

    /// Returns whether assigning this role confers an admin override.
    #[must_use]
    pub fn is_privileged(&self) -> bool {
        !matches!(self, Self::Custom)
    }
}

/// Action class of a role permission entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionType {
    /// Read access.
    Read,
    /// Write access.
    Write,
    /// Delete access.
    Delete,
    /// Administrative access.
    Admin,
}

impl PermissionType {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for PermissionType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "delete" => Ok(Self::Delete),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!(
                "unknown permission type '{value}'"
            ))),
        }
    }
}

/// One permission entry attached to a role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RolePermission {
    permission_name: String,
    permission_type: PermissionType,
    resource: String,
    is_granted: bool,
}

impl RolePermission {
    /// Creates a validated role permission entry.
    ///
    /// An empty resource scopes the permission to every resource.
    pub fn new(
        permission_name: impl Into<String>,
        permission_type: PermissionType,
        resource: impl Into<String>,
        is_granted: bool,
    ) -> AppResult<Self> {
        let permission_name = permission_name.into().trim().to_owned();
        if permission_name.is_empty() {
            return Err(AppError::Validation(
                "permission_name must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            permission_name,
            permission_type,
            resource: resource.into().trim().to_owned(),
            is_granted,
        })
    }

    /// Returns the permission identifier.
    #[must_use]
    pub fn permission_name(&self) -> &str {
        self.permission_name.as_str()
    }

    /// Returns the action class.
    #[must_use]
    pub fn permission_type(&self) -> PermissionType {
        self.permission_type
    }

    /// Returns the resource scope, empty for every resource.
    #[must_use]
    pub fn resource(&self) -> &str {
        self.resource.as_str()
    }

    /// Returns whether the entry grants (true) or denies (false).
    #[must_use]
    pub fn is_granted(&self) -> bool {
        self.is_granted
    }
}
