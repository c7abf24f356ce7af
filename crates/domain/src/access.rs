use std::str::FromStr;

use labelgate_core::AppError;
use serde::{Deserialize, Serialize};

/// Ordinal access level attached to a resource grant.
///
/// Levels are totally ordered: `none < read < write < admin`. A grant satisfies a
/// requirement when its level is greater than or equal to the required level.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// No access.
    #[default]
    None,
    /// Read-only access.
    Read,
    /// Read and write access.
    Write,
    /// Full access including grant management.
    Admin,
}

impl AccessLevel {
    /// Returns a stable storage value for this level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }

    /// Returns the ordinal rank used for comparisons.
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Read => 1,
            Self::Write => 2,
            Self::Admin => 3,
        }
    }

    /// Returns whether this level is sufficient for `required`.
    #[must_use]
    pub fn satisfies(&self, required: Self) -> bool {
        self.rank() >= required.rank()
    }

    /// Returns all levels in ascending order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[AccessLevel] = &[
            AccessLevel::None,
            AccessLevel::Read,
            AccessLevel::Write,
            AccessLevel::Admin,
        ];

        ALL
    }

    /// Parses a transport value into an access level.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for AccessLevel {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!(
                "unknown access level '{value}'"
            ))),
        }
    }
}

/// Override tier of a principal, derived before any resource grant is consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminStatus {
    /// Regular user, subject to grants and ownership.
    #[default]
    None,
    /// Administrator of the principal's organization.
    Admin,
    /// Global super administrator.
    SuperAdmin,
}

impl AdminStatus {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Returns whether the status carries any admin override.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;

    use super::{AccessLevel, AdminStatus};

    #[test]
    fn write_satisfies_read_but_not_admin() {
        assert!(AccessLevel::Write.satisfies(AccessLevel::Read));
        assert!(AccessLevel::Write.satisfies(AccessLevel::Write));
        assert!(!AccessLevel::Write.satisfies(AccessLevel::Admin));
    }

    #[test]
    fn none_satisfies_only_none() {
        assert!(AccessLevel::None.satisfies(AccessLevel::None));
        assert!(!AccessLevel::None.satisfies(AccessLevel::Read));
    }

    #[test]
    fn parsing_is_case_insensitive() {
        let parsed = AccessLevel::from_str(" Write ");
        assert!(matches!(parsed, Ok(AccessLevel::Write)));
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(AccessLevel::from_str("owner").is_err());
    }

    #[test]
    fn super_admin_outranks_admin() {
        assert!(AdminStatus::SuperAdmin > AdminStatus::Admin);
        assert!(!AdminStatus::None.is_admin());
    }

    fn level_strategy() -> impl Strategy<Value = AccessLevel> {
        prop::sample::select(AccessLevel::all().to_vec())
    }

    proptest! {
        #[test]
        fn satisfies_matches_total_order(granted in level_strategy(), required in level_strategy()) {
            prop_assert_eq!(granted.satisfies(required), granted >= required);
        }

        #[test]
        fn storage_value_roundtrips(level in level_strategy()) {
            let parsed = AccessLevel::from_str(level.as_str());
            prop_assert!(matches!(parsed, Ok(value) if value == level));
        }
    }
}
