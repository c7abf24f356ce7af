use std::fmt::{Display, Formatter};

use labelgate_domain::AccessLevel;

/// Why access was allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    /// Global super-admin override.
    SuperAdmin,
    /// Admin override within the principal's organization.
    OrganizationAdmin,
    /// A valid grant at or above the required level.
    Grant(AccessLevel),
    /// The principal created the project.
    Owner,
}

impl AllowReason {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::OrganizationAdmin => "organization_admin",
            Self::Grant(_) => "grant",
            Self::Owner => "owner",
        }
    }
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The project does not exist.
    ResourceNotFound,
    /// No valid grant and not the owner.
    NoGrant,
    /// A valid grant exists below the required level.
    InsufficientGrant(AccessLevel),
    /// A lookup failed while evaluating.
    LookupFailed,
}

impl DenyReason {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResourceNotFound => "resource_not_found",
            Self::NoGrant => "no_grant",
            Self::InsufficientGrant(_) => "insufficient_grant",
            Self::LookupFailed => "lookup_failed",
        }
    }
}

/// Outcome of one authorization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access is permitted.
    Allow(AllowReason),
    /// Access is refused.
    Deny(DenyReason),
}

impl AccessDecision {
    /// Returns whether access is permitted.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }

    /// Returns the stable reason value.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Allow(reason) => reason.as_str(),
            Self::Deny(reason) => reason.as_str(),
        }
    }

    /// Returns the grant level that took part in the decision, if any.
    #[must_use]
    pub fn granted_level(&self) -> Option<AccessLevel> {
        match self {
            Self::Allow(AllowReason::Grant(level))
            | Self::Deny(DenyReason::InsufficientGrant(level)) => Some(*level),
            _ => None,
        }
    }
}

impl Display for AccessDecision {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let verdict = if self.is_allowed() { "allow" } else { "deny" };
        match self.granted_level() {
            Some(level) => write!(formatter, "{verdict}:{}({})", self.reason(), level.as_str()),
            None => write!(formatter, "{verdict}:{}", self.reason()),
        }
    }
}
