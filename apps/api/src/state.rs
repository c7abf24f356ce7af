use std::sync::Arc;

use labelgate_application::{
    AccessGrantService, AuthorizationService, DirectoryRepository, SecurityAdminService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub security_admin_service: SecurityAdminService,
    pub access_grant_service: AccessGrantService,
    pub directory: Arc<dyn DirectoryRepository>,
    pub storage_backend: &'static str,
}
