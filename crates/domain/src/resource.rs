use labelgate_core::ProjectId;
use serde::{Deserialize, Serialize};

use crate::SettingsField;

/// Resource an authorization decision is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resource {
    /// A whole project.
    Project {
        /// Project identifier.
        project_id: ProjectId,
    },
    /// One settings section of a project.
    ProjectSettings {
        /// Project identifier.
        project_id: ProjectId,
        /// Guarded settings section.
        field: SettingsField,
    },
}

impl Resource {
    /// Creates a whole-project resource.
    #[must_use]
    pub fn project(project_id: ProjectId) -> Self {
        Self::Project { project_id }
    }

    /// Creates a project settings section resource.
    #[must_use]
    pub fn project_settings(project_id: ProjectId, field: SettingsField) -> Self {
        Self::ProjectSettings { project_id, field }
    }

    /// Returns the project the resource belongs to.
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        match self {
            Self::Project { project_id } | Self::ProjectSettings { project_id, .. } => *project_id,
        }
    }

    /// Returns the settings section, when the resource is field scoped.
    #[must_use]
    pub fn settings_field(&self) -> Option<SettingsField> {
        match self {
            Self::Project { .. } => None,
            Self::ProjectSettings { field, .. } => Some(*field),
        }
    }

    /// Returns a stable label used in logs and audit details.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Project { project_id } => format!("project:{project_id}"),
            Self::ProjectSettings { project_id, field } => {
                format!("project:{project_id}/settings:{}", field.as_str())
            }
        }
    }
}
