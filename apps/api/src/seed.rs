use labelgate_application::{NewRole, SecurityAdminRepository};
use labelgate_core::{AppError, AppResult};
use labelgate_domain::{PermissionType, RoleName, RolePermission};
use tracing::info;

struct SystemRole {
    name: &'static str,
    display_name: &'static str,
    description: &'static str,
    permissions: &'static [(&'static str, PermissionType)],
}

const SYSTEM_ROLES: &[SystemRole] = &[
    SystemRole {
        name: RoleName::SUPER_ADMIN,
        display_name: "Super Administrator",
        description: "Unrestricted access across every organization",
        permissions: &[
            ("can_manage_organizations", PermissionType::Admin),
            ("can_assign_roles", PermissionType::Admin),
            ("can_access_admin", PermissionType::Admin),
        ],
    },
    SystemRole {
        name: RoleName::ADMIN,
        display_name: "Administrator",
        description: "Full system access with all permissions",
        permissions: &[
            ("can_create_projects", PermissionType::Write),
            ("can_delete_projects", PermissionType::Delete),
            ("can_manage_users", PermissionType::Admin),
            ("can_assign_roles", PermissionType::Admin),
            ("can_access_admin", PermissionType::Admin),
            ("can_view_all_data", PermissionType::Read),
            ("can_export_data", PermissionType::Read),
            ("can_import_data", PermissionType::Write),
            ("can_access_api", PermissionType::Read),
        ],
    },
    SystemRole {
        name: "manager",
        display_name: "Manager",
        description: "Project management and user coordination",
        permissions: &[
            ("can_create_projects", PermissionType::Write),
            ("can_view_all_data", PermissionType::Read),
            ("can_export_data", PermissionType::Read),
            ("can_import_data", PermissionType::Write),
            ("can_access_api", PermissionType::Read),
        ],
    },
    SystemRole {
        name: "annotator",
        display_name: "Annotator",
        description: "Can create annotations and work on projects",
        permissions: &[
            ("can_access_api", PermissionType::Read),
            ("can_create_annotations", PermissionType::Write),
            ("can_edit_annotations", PermissionType::Write),
            ("can_delete_own_annotations", PermissionType::Delete),
        ],
    },
    SystemRole {
        name: "viewer",
        display_name: "Viewer",
        description: "Read-only access to view projects and data",
        permissions: &[
            ("can_view_projects", PermissionType::Read),
            ("can_view_annotations", PermissionType::Read),
        ],
    },
    SystemRole {
        name: "guest",
        display_name: "Guest",
        description: "Limited access for temporary users",
        permissions: &[("can_view_limited_projects", PermissionType::Read)],
    },
];

/// Creates the built-in roles that do not exist yet and returns how many were created.
pub async fn seed_system_roles(repository: &dyn SecurityAdminRepository) -> AppResult<usize> {
    let mut created = 0;

    for role in SYSTEM_ROLES {
        let name = RoleName::new(role.name)?;
        if repository.find_role(&name).await?.is_some() {
            continue;
        }

        match repository
            .create_role(NewRole {
                name: name.clone(),
                display_name: role.display_name.to_owned(),
                description: role.description.to_owned(),
                is_system: true,
                created_by: None,
            })
            .await
        {
            Ok(_) => {}
            // Another instance seeded the same role concurrently.
            Err(AppError::Conflict(_)) => continue,
            Err(error) => return Err(error),
        }

        let permissions = role
            .permissions
            .iter()
            .map(|(permission_name, permission_type)| {
                RolePermission::new(*permission_name, *permission_type, "", true)
            })
            .collect::<AppResult<Vec<_>>>()?;
        repository
            .replace_role_permissions(&name, permissions)
            .await?;
        created += 1;
    }

    info!(created, "system roles seeded");
    Ok(created)
}
