use serde::{Deserialize, Serialize};

use crate::{OrganizationId, UserId};

/// Authenticated principal as resolved by the host's authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: UserId,
    email: String,
    organization_id: OrganizationId,
    is_superuser: bool,
    is_staff: bool,
}

impl UserIdentity {
    /// Creates a regular (non-staff, non-superuser) identity.
    #[must_use]
    pub fn new(
        user_id: UserId,
        email: impl Into<String>,
        organization_id: OrganizationId,
    ) -> Self {
        Self {
            user_id,
            email: email.into(),
            organization_id,
            is_superuser: false,
            is_staff: false,
        }
    }

    /// Returns a copy carrying the host's staff and superuser flags.
    #[must_use]
    pub fn with_flags(mut self, is_superuser: bool, is_staff: bool) -> Self {
        self.is_superuser = is_superuser;
        self.is_staff = is_staff;
        self
    }

    /// Returns the stable user identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the login email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the organization the principal is acting in.
    #[must_use]
    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    /// Returns whether the host flagged the user as superuser.
    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    /// Returns whether the host flagged the user as staff.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.is_staff
    }
}
