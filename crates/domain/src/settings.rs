use std::str::FromStr;

use labelgate_core::AppError;
use serde::{Deserialize, Serialize};

use crate::AccessLevel;

/// Project settings section guarded by its own access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsField {
    /// General project settings.
    General,
    /// Labeling interface configuration.
    LabelingInterface,
    /// Annotation settings.
    Annotation,
    /// Model settings.
    Model,
    /// Predictions settings.
    Predictions,
    /// Cloud storage connections.
    CloudStorage,
    /// Webhook configuration.
    Webhooks,
    /// Destructive project operations.
    DangerZone,
}

impl SettingsField {
    /// Returns a stable storage value for this field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::LabelingInterface => "labeling_interface",
            Self::Annotation => "annotation",
            Self::Model => "model",
            Self::Predictions => "predictions",
            Self::CloudStorage => "cloud_storage",
            Self::Webhooks => "webhooks",
            Self::DangerZone => "danger_zone",
        }
    }

    /// Returns every settings field in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[SettingsField] = &[
            SettingsField::General,
            SettingsField::LabelingInterface,
            SettingsField::Annotation,
            SettingsField::Model,
            SettingsField::Predictions,
            SettingsField::CloudStorage,
            SettingsField::Webhooks,
            SettingsField::DangerZone,
        ];

        ALL
    }

    /// Returns the level a fresh grant carries for this field.
    #[must_use]
    pub fn default_level(&self) -> AccessLevel {
        match self {
            Self::DangerZone => AccessLevel::None,
            _ => AccessLevel::Read,
        }
    }

    /// Parses a transport value into a settings field.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for SettingsField {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown settings field '{value}'")))
    }
}

/// Per-field access levels held by one project settings grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettingsAccessLevels {
    /// Level for [`SettingsField::General`].
    pub general: AccessLevel,
    /// Level for [`SettingsField::LabelingInterface`].
    pub labeling_interface: AccessLevel,
    /// Level for [`SettingsField::Annotation`].
    pub annotation: AccessLevel,
    /// Level for [`SettingsField::Model`].
    pub model: AccessLevel,
    /// Level for [`SettingsField::Predictions`].
    pub predictions: AccessLevel,
    /// Level for [`SettingsField::CloudStorage`].
    pub cloud_storage: AccessLevel,
    /// Level for [`SettingsField::Webhooks`].
    pub webhooks: AccessLevel,
    /// Level for [`SettingsField::DangerZone`].
    pub danger_zone: AccessLevel,
}

impl SettingsAccessLevels {
    /// Returns levels with every field set to `level`.
    #[must_use]
    pub fn uniform(level: AccessLevel) -> Self {
        Self {
            general: level,
            labeling_interface: level,
            annotation: level,
            model: level,
            predictions: level,
            cloud_storage: level,
            webhooks: level,
            danger_zone: level,
        }
    }

    /// Returns the level for one field.
    #[must_use]
    pub fn get(&self, field: SettingsField) -> AccessLevel {
        match field {
            SettingsField::General => self.general,
            SettingsField::LabelingInterface => self.labeling_interface,
            SettingsField::Annotation => self.annotation,
            SettingsField::Model => self.model,
            SettingsField::Predictions => self.predictions,
            SettingsField::CloudStorage => self.cloud_storage,
            SettingsField::Webhooks => self.webhooks,
            SettingsField::DangerZone => self.danger_zone,
        }
    }

    /// Sets the level for one field.
    pub fn set(&mut self, field: SettingsField, level: AccessLevel) {
        let slot = match field {
            SettingsField::General => &mut self.general,
            SettingsField::LabelingInterface => &mut self.labeling_interface,
            SettingsField::Annotation => &mut self.annotation,
            SettingsField::Model => &mut self.model,
            SettingsField::Predictions => &mut self.predictions,
            SettingsField::CloudStorage => &mut self.cloud_storage,
            SettingsField::Webhooks => &mut self.webhooks,
            SettingsField::DangerZone => &mut self.danger_zone,
        };
        *slot = level;
    }

    /// Returns a copy with one field replaced.
    #[must_use]
    pub fn with(mut self, field: SettingsField, level: AccessLevel) -> Self {
        self.set(field, level);
        self
    }

    /// Iterates over `(field, level)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (SettingsField, AccessLevel)> + '_ {
        SettingsField::all()
            .iter()
            .map(move |field| (*field, self.get(*field)))
    }

    /// Renders levels as `field=level` pairs for audit details.
    #[must_use]
    pub fn describe(&self) -> String {
        self.iter()
            .map(|(field, level)| format!("{}={}", field.as_str(), level.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for SettingsAccessLevels {
    fn default() -> Self {
        let mut levels = Self::uniform(AccessLevel::None);
        for field in SettingsField::all() {
            levels.set(*field, field.default_level());
        }
        levels
    }
}

/// Built-in preset of settings access levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsAccessTemplate {
    /// View most settings, edit annotation settings.
    Annotator,
    /// Edit everything except the danger zone.
    Manager,
    /// Read-only access outside the danger zone.
    Viewer,
    /// Full access to every section.
    Admin,
    /// Minimal access for temporary collaborators.
    Guest,
}

impl SettingsAccessTemplate {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Annotator => "annotator",
            Self::Manager => "manager",
            Self::Viewer => "viewer",
            Self::Admin => "admin",
            Self::Guest => "guest",
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Annotator => "Annotator Access",
            Self::Manager => "Manager Access",
            Self::Viewer => "Viewer Access",
            Self::Admin => "Admin Access",
            Self::Guest => "Guest Access",
        }
    }

    /// Returns the description shown to administrators.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Annotator => {
                "Standard access for annotators: can view most settings with limited write access"
            }
            Self::Manager => "Manager access: can modify most settings except the danger zone",
            Self::Viewer => "Read-only access for viewing project settings",
            Self::Admin => "Full administrative access to all project settings",
            Self::Guest => "Limited access for temporary or guest users",
        }
    }

    /// Returns the preset levels.
    #[must_use]
    pub fn levels(&self) -> SettingsAccessLevels {
        match self {
            Self::Annotator => SettingsAccessLevels {
                general: AccessLevel::Read,
                labeling_interface: AccessLevel::Read,
                annotation: AccessLevel::Write,
                model: AccessLevel::Read,
                predictions: AccessLevel::Read,
                cloud_storage: AccessLevel::Read,
                webhooks: AccessLevel::None,
                danger_zone: AccessLevel::None,
            },
            Self::Manager => SettingsAccessLevels::uniform(AccessLevel::Write)
                .with(SettingsField::DangerZone, AccessLevel::Read),
            Self::Viewer => SettingsAccessLevels::uniform(AccessLevel::Read)
                .with(SettingsField::DangerZone, AccessLevel::None),
            Self::Admin => SettingsAccessLevels::uniform(AccessLevel::Admin),
            Self::Guest => SettingsAccessLevels {
                general: AccessLevel::Read,
                labeling_interface: AccessLevel::Read,
                annotation: AccessLevel::Read,
                model: AccessLevel::None,
                predictions: AccessLevel::None,
                cloud_storage: AccessLevel::None,
                webhooks: AccessLevel::None,
                danger_zone: AccessLevel::None,
            },
        }
    }

    /// Returns every built-in template.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[SettingsAccessTemplate] = &[
            SettingsAccessTemplate::Annotator,
            SettingsAccessTemplate::Manager,
            SettingsAccessTemplate::Viewer,
            SettingsAccessTemplate::Admin,
            SettingsAccessTemplate::Guest,
        ];

        ALL
    }
}

impl FromStr for SettingsAccessTemplate {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|template| template.as_str() == value)
            .ok_or_else(|| {
                AppError::Validation(format!("unknown settings access template '{value}'"))
            })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{AccessLevel, SettingsAccessLevels, SettingsAccessTemplate, SettingsField};

    #[test]
    fn default_levels_lock_danger_zone() {
        let levels = SettingsAccessLevels::default();
        assert_eq!(levels.get(SettingsField::General), AccessLevel::Read);
        assert_eq!(levels.get(SettingsField::DangerZone), AccessLevel::None);
    }

    #[test]
    fn set_only_touches_one_field() {
        let levels =
            SettingsAccessLevels::default().with(SettingsField::Webhooks, AccessLevel::Admin);
        assert_eq!(levels.get(SettingsField::Webhooks), AccessLevel::Admin);
        assert_eq!(levels.get(SettingsField::Model), AccessLevel::Read);
    }

    #[test]
    fn manager_template_reads_danger_zone() {
        let levels = SettingsAccessTemplate::Manager.levels();
        assert_eq!(levels.get(SettingsField::DangerZone), AccessLevel::Read);
        assert_eq!(levels.get(SettingsField::CloudStorage), AccessLevel::Write);
    }

    #[test]
    fn field_names_parse() {
        assert!(matches!(
            SettingsField::from_str("cloud_storage"),
            Ok(SettingsField::CloudStorage)
        ));
        assert!(SettingsField::from_str("billing").is_err());
    }

    #[test]
    fn describe_lists_every_field() {
        let description = SettingsAccessLevels::uniform(AccessLevel::Write).describe();
        assert_eq!(description.split(',').count(), SettingsField::all().len());
        assert!(description.starts_with("general=write"));
    }
}
