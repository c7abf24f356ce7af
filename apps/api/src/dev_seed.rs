use labelgate_application::{
    NewRoleAssignment, ProjectRecord, UpsertProjectAccessInput, UserRecord,
};
use labelgate_core::{AppError, AppResult, OrganizationId, ProjectId, UserId};
use labelgate_domain::{AccessLevel, RoleName};
use labelgate_infrastructure::InMemoryDirectoryRepository;
use tracing::info;

use crate::api_services::RepositorySet;

const DEV_ORGANIZATION_ID: &str = "11111111-1111-1111-1111-111111111111";
const DEV_ADMIN_USER_ID: &str = "a2c8ea5f-4f39-4724-97f5-932f97f54f76";
const DEV_ADMIN_EMAIL: &str = "admin@labelgate.local";
const DEV_ANNOTATOR_USER_ID: &str = "96d11e90-7403-4654-9727-cb1043f8bd31";
const DEV_ANNOTATOR_EMAIL: &str = "annotator@labelgate.local";
const DEV_PROJECT_ID: &str = "5b0f6a52-2a8e-4a5e-9d0c-3f1f1c2d7e10";
const DEV_PROJECT_TITLE: &str = "Street Sign Detection";

/// Populates the in-memory directory with a super admin, an annotator and one project.
pub async fn run(
    directory: &InMemoryDirectoryRepository,
    repositories: &RepositorySet,
) -> AppResult<()> {
    let organization_id = OrganizationId::parse(DEV_ORGANIZATION_ID)?;
    let admin_id = UserId::parse(DEV_ADMIN_USER_ID)?;
    let annotator_id = UserId::parse(DEV_ANNOTATOR_USER_ID)?;
    let project_id = ProjectId::parse(DEV_PROJECT_ID)?;

    directory
        .upsert_user(UserRecord {
            user_id: admin_id,
            email: DEV_ADMIN_EMAIL.to_owned(),
            organization_id,
            is_superuser: false,
            is_staff: false,
            created_by: None,
        })
        .await;
    directory
        .upsert_user(UserRecord {
            user_id: annotator_id,
            email: DEV_ANNOTATOR_EMAIL.to_owned(),
            organization_id,
            is_superuser: false,
            is_staff: false,
            created_by: Some(admin_id),
        })
        .await;
    directory
        .upsert_project(ProjectRecord {
            project_id,
            organization_id,
            title: DEV_PROJECT_TITLE.to_owned(),
            created_by: Some(admin_id),
        })
        .await;

    let assigned = repositories
        .security_admin
        .activate_or_create_assignment(NewRoleAssignment {
            user_id: admin_id,
            role_name: RoleName::new(RoleName::SUPER_ADMIN)?,
            assigned_by: admin_id,
            notes: "development seed".to_owned(),
        })
        .await;
    match assigned {
        Ok(_) | Err(AppError::Conflict(_)) => {}
        Err(error) => return Err(error),
    }

    repositories
        .access_grants
        .upsert_project_access(UpsertProjectAccessInput {
            user_id: annotator_id,
            project_id,
            access_level: AccessLevel::Write,
            granted_by: admin_id,
            expires_at: None,
        })
        .await?;

    info!(
        admin_user_id = %admin_id,
        annotator_user_id = %annotator_id,
        project_id = %project_id,
        "development directory seeded"
    );

    Ok(())
}
