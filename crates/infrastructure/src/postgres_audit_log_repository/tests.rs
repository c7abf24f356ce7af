use labelgate_application::{AuditEvent, AuditLogQuery, AuditLogRepository, AuditRepository};
use labelgate_core::{OrganizationId, UserId};
use labelgate_domain::AuditAction;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::PostgresAuditLogRepository;
use crate::{MIGRATOR, PostgresAuditRepository};

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres audit log tests: {error}");
    }

    Some(pool)
}

fn event(organization_id: OrganizationId, actor_id: UserId, action: AuditAction) -> AuditEvent {
    AuditEvent {
        organization_id,
        actor_id,
        action,
        resource_type: "rbac_role".to_owned(),
        resource_id: "reviewer".to_owned(),
        detail: None,
    }
}

#[tokio::test]
async fn entries_are_scoped_to_organization_and_filtered() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let writer = PostgresAuditRepository::new(pool.clone());
    let reader = PostgresAuditLogRepository::new(pool);
    let organization_id = OrganizationId::new();
    let other_organization = OrganizationId::new();
    let actor = UserId::new();
    let other_actor = UserId::new();

    for audit_event in [
        event(organization_id, actor, AuditAction::RoleCreated),
        event(organization_id, other_actor, AuditAction::RoleAssigned),
        event(organization_id, actor, AuditAction::RoleAssigned),
        event(other_organization, actor, AuditAction::RoleAssigned),
    ] {
        assert!(writer.append_event(audit_event).await.is_ok());
    }

    let everything = reader
        .list_recent_entries(organization_id, AuditLogQuery::default())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(everything.len(), 3);

    let assigned_by_actor = reader
        .list_recent_entries(
            organization_id,
            AuditLogQuery {
                action: Some(AuditAction::RoleAssigned.as_str().to_owned()),
                actor_id: Some(actor),
                ..AuditLogQuery::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(assigned_by_actor.len(), 1);
    assert_eq!(assigned_by_actor[0].actor_id, actor);
}

#[tokio::test]
async fn pagination_skips_newest_entries() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let writer = PostgresAuditRepository::new(pool.clone());
    let reader = PostgresAuditLogRepository::new(pool);
    let organization_id = OrganizationId::new();
    let actor = UserId::new();

    for _ in 0..3 {
        assert!(
            writer
                .append_event(event(organization_id, actor, AuditAction::RoleActivated))
                .await
                .is_ok()
        );
    }

    let page = reader
        .list_recent_entries(
            organization_id,
            AuditLogQuery {
                limit: 2,
                offset: 2,
                ..AuditLogQuery::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(page.len(), 1);
}
