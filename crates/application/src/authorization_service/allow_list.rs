use std::collections::BTreeSet;

use labelgate_domain::AdminStatus;

/// Configured email allow-lists that confer admin status without a role assignment.
///
/// Emails are compared case-insensitively after trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList {
    super_admin_emails: BTreeSet<String>,
    admin_emails: BTreeSet<String>,
}

impl AdminAllowList {
    /// Creates an allow-list from super-admin and admin email collections.
    #[must_use]
    pub fn new<S, A>(super_admin_emails: S, admin_emails: A) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        Self {
            super_admin_emails: normalize_all(super_admin_emails),
            admin_emails: normalize_all(admin_emails),
        }
    }

    /// Returns the status the allow-list alone confers on an email.
    #[must_use]
    pub fn status_for(&self, email: &str) -> AdminStatus {
        let email = normalize(email);
        if email.is_empty() {
            return AdminStatus::None;
        }

        if self.super_admin_emails.contains(&email) {
            AdminStatus::SuperAdmin
        } else if self.admin_emails.contains(&email) {
            AdminStatus::Admin
        } else {
            AdminStatus::None
        }
    }

    /// Returns whether both lists are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.super_admin_emails.is_empty() && self.admin_emails.is_empty()
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

fn normalize_all<I>(emails: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    emails
        .into_iter()
        .map(|email| normalize(email.as_ref()))
        .filter(|email| !email.is_empty())
        .collect()
}
