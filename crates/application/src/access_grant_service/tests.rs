use chrono::{Duration, Utc};
use uuid::Uuid;

use labelgate_core::{AppError, OrganizationId, ProjectId, UserIdentity};
use labelgate_domain::{
    AccessLevel, AuditAction, Resource, SettingsAccessLevels, SettingsAccessTemplate,
    SettingsField,
};

use crate::access_grant_ports::{GrantProjectAccessInput, GrantSettingsAccessInput};
use crate::test_support::{Fixture, fixture, project_grant};
use crate::{AdminAllowList, SettingsAccessGrant};

use super::AccessGrantService;

struct Harness {
    fixture: Fixture,
    service: AccessGrantService,
    owner: UserIdentity,
    member: UserIdentity,
    project_id: ProjectId,
}

async fn harness() -> Harness {
    let fixture = fixture(AdminAllowList::default());
    let organization_id = OrganizationId::new();
    let owner = fixture
        .directory
        .add_user("owner@example.com", organization_id, None)
        .await;
    let member = fixture
        .directory
        .add_user("member@example.com", organization_id, None)
        .await;
    let project_id = fixture
        .directory
        .add_project(organization_id, Some(owner.user_id()))
        .await;
    let service = AccessGrantService::new(
        fixture.authorization.clone(),
        fixture.directory.clone(),
        fixture.store.clone(),
        fixture.store.clone(),
    );

    Harness {
        fixture,
        service,
        owner,
        member,
        project_id,
    }
}

fn project_input(
    member: &UserIdentity,
    project_id: ProjectId,
    access_level: AccessLevel,
) -> GrantProjectAccessInput {
    GrantProjectAccessInput {
        user_id: member.user_id(),
        project_id,
        access_level,
        expires_at: None,
    }
}

#[tokio::test]
async fn owner_grants_write_and_member_gains_write_only() {
    let harness = harness().await;

    let granted = harness
        .service
        .grant_project_access(
            &harness.owner,
            project_input(&harness.member, harness.project_id, AccessLevel::Write),
        )
        .await;
    let authorization = &harness.fixture.authorization;
    let resource = Resource::project(harness.project_id);
    let write = authorization
        .authorize(&harness.member, resource, AccessLevel::Write)
        .await;
    let admin = authorization
        .authorize(&harness.member, resource, AccessLevel::Admin)
        .await;

    assert!(granted.is_ok());
    assert!(write.is_allowed());
    assert!(!admin.is_allowed());
    let events = harness.fixture.store.events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::ProjectAccessGranted);
}

#[tokio::test]
async fn granting_requires_admin_level_on_project() {
    let harness = harness().await;

    let result = harness
        .service
        .grant_project_access(
            &harness.member,
            project_input(&harness.member, harness.project_id, AccessLevel::Admin),
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn granting_none_or_past_expiry_is_rejected() {
    let harness = harness().await;
    let mut expired = project_input(&harness.member, harness.project_id, AccessLevel::Read);
    expired.expires_at = Some(Utc::now() - Duration::minutes(5));

    let none = harness
        .service
        .grant_project_access(
            &harness.owner,
            project_input(&harness.member, harness.project_id, AccessLevel::None),
        )
        .await;
    let past = harness
        .service
        .grant_project_access(&harness.owner, expired)
        .await;

    assert!(matches!(none, Err(AppError::Validation(_))));
    assert!(matches!(past, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn unknown_project_is_not_found() {
    let harness = harness().await;

    let result = harness
        .service
        .grant_project_access(
            &harness.owner,
            project_input(&harness.member, ProjectId::new(), AccessLevel::Read),
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn revocation_takes_effect_immediately() {
    let harness = harness().await;
    let service = &harness.service;
    let granted = service
        .grant_project_access(
            &harness.owner,
            project_input(&harness.member, harness.project_id, AccessLevel::Read),
        )
        .await;

    let revoked = service
        .revoke_project_access(&harness.owner, harness.member.user_id(), harness.project_id)
        .await;
    let decision = harness
        .fixture
        .authorization
        .authorize(
            &harness.member,
            Resource::project(harness.project_id),
            AccessLevel::Read,
        )
        .await;
    let again = service
        .revoke_project_access(&harness.owner, harness.member.user_id(), harness.project_id)
        .await;

    assert!(granted.is_ok() && revoked.is_ok());
    assert!(!decision.is_allowed());
    assert!(matches!(again, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn regrant_reuses_the_single_record() {
    let harness = harness().await;
    let service = &harness.service;
    let first = service
        .grant_project_access(
            &harness.owner,
            project_input(&harness.member, harness.project_id, AccessLevel::Read),
        )
        .await;
    let second = service
        .grant_project_access(
            &harness.owner,
            project_input(&harness.member, harness.project_id, AccessLevel::Admin),
        )
        .await;

    let listed = service
        .list_project_access_for_project(&harness.owner, harness.project_id)
        .await;

    assert!(matches!(
        (first, second),
        (Ok(ref first), Ok(ref second)) if first.grant_id == second.grant_id
    ));
    assert!(matches!(listed, Ok(ref grants) if grants.len() == 1
        && grants[0].access_level == AccessLevel::Admin));
}

#[tokio::test]
async fn users_list_their_own_grants_only() {
    let harness = harness().await;
    let service = &harness.service;

    let own = service
        .list_project_access_for_user(&harness.member, harness.member.user_id())
        .await;
    let other = service
        .list_project_access_for_user(&harness.member, harness.owner.user_id())
        .await;

    assert!(own.is_ok());
    assert!(matches!(other, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn template_application_drives_field_decisions() {
    let harness = harness().await;
    let service = &harness.service;

    let applied = service
        .apply_settings_template(
            &harness.owner,
            SettingsAccessTemplate::Annotator,
            harness.member.user_id(),
            harness.project_id,
        )
        .await;
    let annotation = service
        .check_field_access(
            &harness.member,
            harness.project_id,
            SettingsField::Annotation,
            AccessLevel::Write,
        )
        .await;
    let danger_zone = service
        .check_field_access(
            &harness.member,
            harness.project_id,
            SettingsField::DangerZone,
            AccessLevel::Read,
        )
        .await;

    assert!(matches!(applied, Ok(ref grant) if grant.notes == "Applied template: Annotator Access"));
    assert!(matches!(annotation, Ok(check) if check.has_access
        && check.current_level == AccessLevel::Write));
    assert!(matches!(danger_zone, Ok(check) if !check.has_access
        && check.current_level == AccessLevel::None));
}

#[tokio::test]
async fn partial_update_records_old_and_new_levels() {
    let harness = harness().await;
    let service = &harness.service;
    let granted = service
        .grant_settings_access(
            &harness.owner,
            GrantSettingsAccessInput {
                user_id: harness.member.user_id(),
                project_id: harness.project_id,
                levels: SettingsAccessLevels::default(),
                expires_at: None,
                notes: String::new(),
            },
        )
        .await;

    let updated = service
        .update_settings_access(
            &harness.owner,
            harness.member.user_id(),
            harness.project_id,
            vec![(SettingsField::Webhooks, AccessLevel::Write)],
        )
        .await;

    assert!(granted.is_ok());
    assert!(matches!(updated, Ok(ref grant)
        if grant.levels.get(SettingsField::Webhooks) == AccessLevel::Write
            && grant.levels.get(SettingsField::General) == AccessLevel::Read));
    let events = harness.fixture.store.events().await;
    assert_eq!(events[1].action, AuditAction::SettingsAccessUpdated);
    assert_eq!(
        events[1].detail.as_deref(),
        Some("updated settings access webhooks: read -> write")
    );
}

#[tokio::test]
async fn empty_update_is_rejected() {
    let harness = harness().await;

    let result = harness
        .service
        .update_settings_access(
            &harness.owner,
            harness.member.user_id(),
            harness.project_id,
            Vec::new(),
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn my_settings_access_reports_grant_and_levels() {
    let harness = harness().await;
    let service = &harness.service;
    let applied = service
        .apply_settings_template(
            &harness.owner,
            SettingsAccessTemplate::Viewer,
            harness.member.user_id(),
            harness.project_id,
        )
        .await;
    let owner_view = service
        .my_settings_access(&harness.owner, harness.project_id)
        .await;

    let mine = service
        .my_settings_access(&harness.member, harness.project_id)
        .await;

    assert!(applied.is_ok());
    assert!(matches!(owner_view, Ok(ref summary) if summary.grant.is_none()
        && summary.effective_levels == SettingsAccessLevels::uniform(AccessLevel::Admin)));
    assert!(matches!(mine, Ok(ref summary) if summary.grant.is_some()
        && summary.effective_levels == SettingsAccessTemplate::Viewer.levels()));
}

#[tokio::test]
async fn every_template_is_listed() {
    assert_eq!(AccessGrantService::list_settings_templates().len(), 5);
}

#[tokio::test]
async fn admins_list_grants_only_within_their_organization() {
    let harness = harness().await;
    let store = &harness.fixture.store;
    let admin_role = store.seed_role("admin", true).await;
    let local_admin = harness
        .fixture
        .directory
        .add_user("local-admin@example.com", harness.owner.organization_id(), None)
        .await;
    let foreign_admin = harness
        .fixture
        .directory
        .add_user("foreign-admin@example.com", OrganizationId::new(), None)
        .await;
    store.seed_assignment(local_admin.user_id(), &admin_role).await;
    store.seed_assignment(foreign_admin.user_id(), &admin_role).await;
    store
        .put_project_access(project_grant(
            harness.member.user_id(),
            harness.project_id,
            AccessLevel::Read,
        ))
        .await;

    let local = harness
        .service
        .list_project_access_for_user(&local_admin, harness.member.user_id())
        .await;
    let foreign = harness
        .service
        .list_project_access_for_user(&foreign_admin, harness.member.user_id())
        .await;

    assert!(matches!(local, Ok(ref grants) if grants.len() == 1));
    assert!(matches!(foreign, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn expired_project_grants_are_not_listed() {
    let harness = harness().await;
    let mut expired = project_grant(
        harness.member.user_id(),
        harness.project_id,
        AccessLevel::Write,
    );
    expired.expires_at = Some(Utc::now() - Duration::hours(1));
    harness.fixture.store.put_project_access(expired).await;

    let by_project = harness
        .service
        .list_project_access_for_project(&harness.owner, harness.project_id)
        .await;
    let by_user = harness
        .service
        .list_project_access_for_user(&harness.member, harness.member.user_id())
        .await;

    assert!(matches!(by_project, Ok(ref grants) if grants.is_empty()));
    assert!(matches!(by_user, Ok(ref grants) if grants.is_empty()));
}

#[tokio::test]
async fn expired_settings_grant_is_neither_reported_nor_updated() {
    let harness = harness().await;
    harness
        .fixture
        .store
        .put_settings_access(SettingsAccessGrant {
            grant_id: Uuid::new_v4(),
            user_id: harness.member.user_id(),
            project_id: harness.project_id,
            levels: SettingsAccessTemplate::Manager.levels(),
            granted_by: Some(harness.owner.user_id()),
            granted_at: Utc::now() - Duration::days(2),
            expires_at: Some(Utc::now() - Duration::days(1)),
            is_active: true,
            notes: String::new(),
        })
        .await;
    let service = &harness.service;

    let mine = service
        .my_settings_access(&harness.member, harness.project_id)
        .await;
    let listed = service
        .list_settings_access_for_project(&harness.owner, harness.project_id)
        .await;
    let updated = service
        .update_settings_access(
            &harness.owner,
            harness.member.user_id(),
            harness.project_id,
            vec![(SettingsField::Webhooks, AccessLevel::Admin)],
        )
        .await;

    assert!(matches!(mine, Ok(ref summary) if summary.grant.is_none()
        && summary.effective_levels == SettingsAccessLevels::uniform(AccessLevel::None)));
    assert!(matches!(listed, Ok(ref grants) if grants.is_empty()));
    assert!(matches!(updated, Err(AppError::NotFound(_))));
    assert!(harness.fixture.store.events().await.is_empty());
}
