use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use labelgate_application::{AuditLogEntry, AuditLogQuery, AuditLogRepository};
use labelgate_core::{AppError, AppResult, OrganizationId, UserId};

#[cfg(test)]
mod tests;

const MAX_PAGE_SIZE: usize = 500;
const MAX_OFFSET: usize = 10_000;

/// PostgreSQL-backed repository for audit log read models.
#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditLogRow {
    event_id: uuid::Uuid,
    actor_id: uuid::Uuid,
    action: String,
    resource_type: String,
    resource_id: String,
    detail: Option<String>,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn list_recent_entries(
        &self,
        organization_id: OrganizationId,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        let capped_limit = query.limit.clamp(1, MAX_PAGE_SIZE) as i64;
        let capped_offset = query.offset.min(MAX_OFFSET) as i64;
        let rows = sqlx::query_as::<_, AuditLogRow>(
            r#"
            SELECT
                id AS event_id,
                actor_id,
                action,
                resource_type,
                resource_id,
                detail,
                created_at
            FROM audit_log_entries
            WHERE organization_id = $1
                AND ($2::TEXT IS NULL OR action = $2)
                AND ($3::UUID IS NULL OR actor_id = $3)
            ORDER BY created_at DESC, id DESC
            LIMIT $4
            OFFSET $5
            "#,
        )
        .bind(organization_id.as_uuid())
        .bind(query.action)
        .bind(query.actor_id.map(|actor_id| actor_id.as_uuid()))
        .bind(capped_limit)
        .bind(capped_offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list audit log entries: {error}"))
        })?;

        Ok(rows
            .into_iter()
            .map(|row| AuditLogEntry {
                event_id: row.event_id,
                actor_id: UserId::from_uuid(row.actor_id),
                action: row.action,
                resource_type: row.resource_type,
                resource_id: row.resource_id,
                detail: row.detail,
                created_at: row.created_at,
            })
            .collect())
    }
}
