//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_access_control_repository;
mod in_memory_directory_repository;
mod postgres_access_grant_repository;
mod postgres_audit_log_repository;
mod postgres_audit_repository;
mod postgres_authorization_repository;
mod postgres_directory_repository;
mod postgres_rows;
mod postgres_security_admin_repository;

pub use in_memory_access_control_repository::InMemoryAccessControlRepository;
pub use in_memory_directory_repository::InMemoryDirectoryRepository;
pub use postgres_access_grant_repository::PostgresAccessGrantRepository;
pub use postgres_audit_log_repository::PostgresAuditLogRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_directory_repository::PostgresDirectoryRepository;
pub use postgres_security_admin_repository::PostgresSecurityAdminRepository;

/// Embedded schema migrations for the PostgreSQL adapters.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
