use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use labelgate_application::AccessGrantService;
use labelgate_core::{ProjectId, UserId, UserIdentity};
use labelgate_domain::{AccessLevel, SettingsField};

use crate::dto::{
    ApplySettingsTemplateRequest, FieldAccessCheckResponse, GrantProjectAccessRequest,
    GrantSettingsAccessRequest, MySettingsAccessResponse, ProjectAccessResponse,
    RevokeProjectAccessRequest, SettingsAccessResponse, SettingsTemplateResponse,
    UpdateSettingsAccessRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod project_access;
mod settings_access;

#[cfg(test)]
mod tests;

pub use project_access::{
    grant_project_access_handler, list_project_access_handler, list_user_project_access_handler,
    revoke_project_access_handler,
};
pub use settings_access::{
    apply_settings_template_handler, check_field_access_handler, grant_settings_access_handler,
    list_settings_access_handler, list_settings_templates_handler, my_settings_access_handler,
    revoke_settings_access_handler, update_settings_access_handler,
};
