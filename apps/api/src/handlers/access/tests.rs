use std::collections::HashMap;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;

use crate::dto::{
    ApplySettingsTemplateRequest, GrantProjectAccessRequest, GrantSettingsAccessRequest,
    RevokeProjectAccessRequest, UpdateSettingsAccessRequest,
};
use crate::handlers::test_support::Fixture;

use super::settings_access::FieldAccessQuery;
use super::{
    apply_settings_template_handler, check_field_access_handler, grant_project_access_handler,
    grant_settings_access_handler, list_project_access_handler, list_settings_templates_handler,
    my_settings_access_handler, revoke_project_access_handler, update_settings_access_handler,
};

fn levels(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(field, level)| ((*field).to_owned(), (*level).to_owned()))
        .collect()
}

fn field_query(field: &str, level: &str) -> Query<FieldAccessQuery> {
    Query(FieldAccessQuery {
        field: field.to_owned(),
        level: Some(level.to_owned()),
    })
}

#[tokio::test]
async fn owner_grants_and_revokes_project_access() {
    let fixture = Fixture::new(&[]).await;
    let owner = fixture.add_user("owner@example.com", None).await;
    let annotator = fixture.add_user("annotator@example.com", None).await;
    let project_id = fixture.add_project(&owner).await.to_string();

    let granted = grant_project_access_handler(
        State(fixture.state.clone()),
        Extension(owner.clone()),
        Path(project_id.clone()),
        Json(GrantProjectAccessRequest {
            user_id: annotator.user_id().to_string(),
            access_level: "read".to_owned(),
            expires_at: None,
        }),
    )
    .await;
    assert!(matches!(granted, Ok((StatusCode::CREATED, Json(ref grant)))
        if grant.access_level == "read" && grant.is_active));

    let listed = list_project_access_handler(
        State(fixture.state.clone()),
        Extension(annotator.clone()),
        Path(project_id.clone()),
    )
    .await;
    assert!(matches!(listed, Ok(Json(ref grants)) if grants.len() == 1));

    let revoked = revoke_project_access_handler(
        State(fixture.state.clone()),
        Extension(owner),
        Path(project_id.clone()),
        Json(RevokeProjectAccessRequest {
            user_id: annotator.user_id().to_string(),
        }),
    )
    .await;
    assert!(matches!(revoked, Ok(Json(ref grant)) if !grant.is_active));

    let after = list_project_access_handler(
        State(fixture.state.clone()),
        Extension(annotator),
        Path(project_id),
    )
    .await;
    assert!(matches!(after, Err(ref error) if error.status() == StatusCode::FORBIDDEN));
}

#[tokio::test]
async fn grants_need_project_admin_and_valid_levels() {
    let fixture = Fixture::new(&[]).await;
    let owner = fixture.add_user("owner@example.com", None).await;
    let stranger = fixture.add_user("stranger@example.com", None).await;
    let project_id = fixture.add_project(&owner).await.to_string();

    let request = |access_level: &str| {
        Json(GrantProjectAccessRequest {
            user_id: stranger.user_id().to_string(),
            access_level: access_level.to_owned(),
            expires_at: None,
        })
    };

    let by_stranger = grant_project_access_handler(
        State(fixture.state.clone()),
        Extension(stranger.clone()),
        Path(project_id.clone()),
        request("write"),
    )
    .await;
    let bad_level = grant_project_access_handler(
        State(fixture.state.clone()),
        Extension(owner.clone()),
        Path(project_id.clone()),
        request("owner"),
    )
    .await;
    let past_expiry = grant_project_access_handler(
        State(fixture.state.clone()),
        Extension(owner),
        Path(project_id),
        Json(GrantProjectAccessRequest {
            expires_at: Some("2001-01-01T00:00:00Z".to_owned()),
            ..request("read").0
        }),
    )
    .await;

    assert!(matches!(by_stranger, Err(ref error) if error.status() == StatusCode::FORBIDDEN));
    assert!(matches!(bad_level, Err(ref error) if error.status() == StatusCode::BAD_REQUEST));
    assert!(matches!(past_expiry, Err(ref error) if error.status() == StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn settings_grant_drives_field_checks() {
    let fixture = Fixture::new(&[]).await;
    let owner = fixture.add_user("owner@example.com", None).await;
    let annotator = fixture.add_user("annotator@example.com", None).await;
    let project_id = fixture.add_project(&owner).await.to_string();

    let granted = grant_settings_access_handler(
        State(fixture.state.clone()),
        Extension(owner.clone()),
        Path(project_id.clone()),
        Json(GrantSettingsAccessRequest {
            user_id: annotator.user_id().to_string(),
            levels: levels(&[("annotation", "write")]),
            expires_at: None,
            notes: Some("labeling sprint".to_owned()),
        }),
    )
    .await;
    assert!(matches!(granted, Ok((StatusCode::CREATED, Json(ref grant)))
        if grant.levels.annotation == "write"
            && grant.levels.general == "read"
            && grant.levels.danger_zone == "none"));

    let check = |field: &str, level: &str| {
        check_field_access_handler(
            State(fixture.state.clone()),
            Extension(annotator.clone()),
            Path(project_id.clone()),
            field_query(field, level),
        )
    };

    let annotation = check("annotation", "write").await;
    let danger_zone = check("danger_zone", "read").await;
    assert!(matches!(annotation, Ok(Json(ref check)) if check.has_access));
    assert!(matches!(danger_zone, Ok(Json(ref check))
        if !check.has_access && check.current_level == "none"));

    let updated = update_settings_access_handler(
        State(fixture.state.clone()),
        Extension(owner),
        Path((project_id.clone(), annotator.user_id().to_string())),
        Json(UpdateSettingsAccessRequest {
            levels: levels(&[("danger_zone", "read")]),
        }),
    )
    .await;
    assert!(matches!(updated, Ok(Json(ref grant))
        if grant.levels.danger_zone == "read" && grant.levels.annotation == "write"));

    let danger_zone = check("danger_zone", "read").await;
    assert!(matches!(danger_zone, Ok(Json(ref check)) if check.has_access));
}

#[tokio::test]
async fn unknown_settings_field_is_rejected() {
    let fixture = Fixture::new(&[]).await;
    let owner = fixture.add_user("owner@example.com", None).await;
    let project_id = fixture.add_project(&owner).await.to_string();

    let result = check_field_access_handler(
        State(fixture.state.clone()),
        Extension(owner),
        Path(project_id),
        field_query("billing", "read"),
    )
    .await;

    assert!(matches!(result, Err(ref error) if error.status() == StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn templates_are_listed_and_applied() {
    let fixture = Fixture::new(&[]).await;
    let owner = fixture.add_user("owner@example.com", None).await;
    let viewer = fixture.add_user("viewer@example.com", None).await;
    let project_id = fixture.add_project(&owner).await.to_string();

    let Json(templates) = list_settings_templates_handler().await;
    assert_eq!(templates.len(), 5);
    assert!(templates.iter().any(|template| template.name == "manager"
        && template.levels.danger_zone == "read"));

    let applied = apply_settings_template_handler(
        State(fixture.state.clone()),
        Extension(owner.clone()),
        Path(project_id.clone()),
        Json(ApplySettingsTemplateRequest {
            user_id: viewer.user_id().to_string(),
            template: "viewer".to_owned(),
        }),
    )
    .await;
    assert!(matches!(applied, Ok(Json(ref grant))
        if grant.levels.webhooks == "read" && grant.levels.danger_zone == "none"));

    let mine = my_settings_access_handler(
        State(fixture.state.clone()),
        Extension(viewer),
        Path(project_id.clone()),
    )
    .await;
    assert!(matches!(mine, Ok(Json(ref summary))
        if summary.grant.is_some() && summary.effective_levels.general == "read"));

    let owner_view = my_settings_access_handler(
        State(fixture.state.clone()),
        Extension(owner),
        Path(project_id),
    )
    .await;
    assert!(matches!(owner_view, Ok(Json(ref summary))
        if summary.grant.is_none() && summary.effective_levels.danger_zone == "admin"));
}
