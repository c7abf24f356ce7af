use labelgate_application::{
    AccessGrantService, AdminAllowList, AuthorizationService, SecurityAdminService,
};

use crate::state::AppState;

use super::RepositorySet;

pub fn build_app_state(
    repositories: RepositorySet,
    allow_list: AdminAllowList,
    storage_backend: &'static str,
) -> AppState {
    let authorization_service = AuthorizationService::new(
        repositories.authorization,
        repositories.directory.clone(),
        allow_list,
    );

    let security_admin_service = SecurityAdminService::new(
        authorization_service.clone(),
        repositories.directory.clone(),
        repositories.security_admin,
        repositories.audit_log,
        repositories.audit.clone(),
    );

    let access_grant_service = AccessGrantService::new(
        authorization_service.clone(),
        repositories.directory.clone(),
        repositories.access_grants,
        repositories.audit,
    );

    AppState {
        authorization_service,
        security_admin_service,
        access_grant_service,
        directory: repositories.directory,
        storage_backend,
    }
}
