use super::*;

use crate::{AuditLogEntry, AuditLogQuery};

const MAX_AUDIT_PAGE: usize = 500;

impl SecurityAdminService {
    /// Lists recent audit entries of the actor's organization.
    pub async fn list_audit_log(
        &self,
        actor: &UserIdentity,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        self.authorization_service.require_admin(actor).await?;

        if query.limit == 0 {
            return Err(AppError::Validation(
                "audit log limit must be greater than zero".to_owned(),
            ));
        }

        let query = AuditLogQuery {
            limit: query.limit.min(MAX_AUDIT_PAGE),
            action: query
                .action
                .map(|action| action.trim().to_owned())
                .filter(|action| !action.is_empty()),
            ..query
        };

        self.audit_log_repository
            .list_recent_entries(actor.organization_id(), query)
            .await
    }
}
