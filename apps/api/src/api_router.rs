use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch, post, put};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/api/authorize",
            post(handlers::authorization::authorize_handler),
        )
        .route(
            "/api/projects",
            get(handlers::authorization::list_projects_handler),
        )
        .route(
            "/api/roles",
            get(handlers::security::list_roles_handler)
                .post(handlers::security::create_role_handler),
        )
        .route(
            "/api/roles/{role_name}/active",
            put(handlers::security::set_role_active_handler),
        )
        .route(
            "/api/roles/{role_name}/permissions",
            get(handlers::security::list_role_permissions_handler)
                .put(handlers::security::set_role_permissions_handler),
        )
        .route(
            "/api/roles/{role_name}/assignments",
            get(handlers::security::list_role_assignments_handler),
        )
        .route(
            "/api/role-assignments",
            post(handlers::security::assign_role_handler),
        )
        .route(
            "/api/role-assignments/revoke",
            post(handlers::security::revoke_role_assignment_handler),
        )
        .route(
            "/api/users/{user_id}/role-assignments",
            get(handlers::security::list_user_role_assignments_handler),
        )
        .route(
            "/api/users/{user_id}/project-access",
            get(handlers::access::list_user_project_access_handler),
        )
        .route(
            "/api/projects/{project_id}/access",
            get(handlers::access::list_project_access_handler)
                .post(handlers::access::grant_project_access_handler),
        )
        .route(
            "/api/projects/{project_id}/access/revoke",
            post(handlers::access::revoke_project_access_handler),
        )
        .route(
            "/api/projects/{project_id}/settings-access",
            get(handlers::access::list_settings_access_handler)
                .post(handlers::access::grant_settings_access_handler),
        )
        .route(
            "/api/projects/{project_id}/settings-access/me",
            get(handlers::access::my_settings_access_handler),
        )
        .route(
            "/api/projects/{project_id}/settings-access/check",
            get(handlers::access::check_field_access_handler),
        )
        .route(
            "/api/projects/{project_id}/settings-access/apply-template",
            post(handlers::access::apply_settings_template_handler),
        )
        .route(
            "/api/projects/{project_id}/settings-access/{user_id}",
            patch(handlers::access::update_settings_access_handler),
        )
        .route(
            "/api/projects/{project_id}/settings-access/{user_id}/revoke",
            post(handlers::access::revoke_settings_access_handler),
        )
        .route(
            "/api/settings-templates",
            get(handlers::access::list_settings_templates_handler),
        )
        .route("/api/me/access", get(handlers::security::my_access_handler))
        .route(
            "/api/me/permissions/check",
            get(handlers::security::check_permission_handler),
        )
        .route(
            "/api/audit-log",
            get(handlers::security::list_audit_log_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_principal,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
