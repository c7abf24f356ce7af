use std::sync::Arc;

use labelgate_application::{AdminAllowList, ProjectRecord, UserRecord};
use labelgate_core::{OrganizationId, ProjectId, UserId, UserIdentity};
use labelgate_infrastructure::InMemoryDirectoryRepository;

use crate::api_services::{RepositorySet, build_app_state};
use crate::seed::seed_system_roles;
use crate::state::AppState;

pub(crate) struct Fixture {
    pub(crate) state: AppState,
    pub(crate) directory: Arc<InMemoryDirectoryRepository>,
    pub(crate) organization_id: OrganizationId,
}

impl Fixture {
    pub(crate) async fn new(super_admin_emails: &[&str]) -> Self {
        let directory = Arc::new(InMemoryDirectoryRepository::new());
        let repositories = RepositorySet::in_memory(directory.clone());
        assert!(
            seed_system_roles(repositories.security_admin.as_ref())
                .await
                .is_ok()
        );

        let empty: [&str; 0] = [];
        let state = build_app_state(
            repositories,
            AdminAllowList::new(super_admin_emails, empty),
            "in_memory",
        );

        Self {
            state,
            directory,
            organization_id: OrganizationId::new(),
        }
    }

    pub(crate) async fn add_user(&self, email: &str, created_by: Option<UserId>) -> UserIdentity {
        let record = UserRecord {
            user_id: UserId::new(),
            email: email.to_owned(),
            organization_id: self.organization_id,
            is_superuser: false,
            is_staff: false,
            created_by,
        };
        let identity = record.identity();
        self.directory.upsert_user(record).await;
        identity
    }

    pub(crate) async fn add_project(&self, owner: &UserIdentity) -> ProjectId {
        let project_id = ProjectId::new();
        self.directory
            .upsert_project(ProjectRecord {
                project_id,
                organization_id: self.organization_id,
                title: format!("Project {project_id}"),
                created_by: Some(owner.user_id()),
            })
            .await;
        project_id
    }
}
