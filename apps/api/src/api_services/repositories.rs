use std::sync::Arc;

use labelgate_application::{
    AccessGrantRepository, AuditLogRepository, AuditRepository, AuthorizationRepository,
    DirectoryRepository, SecurityAdminRepository,
};
use labelgate_infrastructure::{
    InMemoryAccessControlRepository, InMemoryDirectoryRepository, PostgresAccessGrantRepository,
    PostgresAuditLogRepository, PostgresAuditRepository, PostgresAuthorizationRepository,
    PostgresDirectoryRepository, PostgresSecurityAdminRepository,
};
use sqlx::PgPool;

/// Port implementations for one storage backend.
#[derive(Clone)]
pub struct RepositorySet {
    pub directory: Arc<dyn DirectoryRepository>,
    pub authorization: Arc<dyn AuthorizationRepository>,
    pub security_admin: Arc<dyn SecurityAdminRepository>,
    pub access_grants: Arc<dyn AccessGrantRepository>,
    pub audit: Arc<dyn AuditRepository>,
    pub audit_log: Arc<dyn AuditLogRepository>,
}

impl RepositorySet {
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            directory: Arc::new(PostgresDirectoryRepository::new(pool.clone())),
            authorization: Arc::new(PostgresAuthorizationRepository::new(pool.clone())),
            security_admin: Arc::new(PostgresSecurityAdminRepository::new(pool.clone())),
            access_grants: Arc::new(PostgresAccessGrantRepository::new(pool.clone())),
            audit: Arc::new(PostgresAuditRepository::new(pool.clone())),
            audit_log: Arc::new(PostgresAuditLogRepository::new(pool.clone())),
        }
    }

    /// Builds a set whose access-control ports share one in-memory store.
    pub fn in_memory(directory: Arc<InMemoryDirectoryRepository>) -> Self {
        let store = Arc::new(InMemoryAccessControlRepository::new());
        Self {
            directory,
            authorization: store.clone(),
            security_admin: store.clone(),
            access_grants: store.clone(),
            audit: store.clone(),
            audit_log: store,
        }
    }
}
