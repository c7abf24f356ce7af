//! Labelgate API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dev_seed;
mod dto;
mod error;
mod handlers;
mod middleware;
mod seed;
mod state;

use std::sync::Arc;

use labelgate_core::AppError;
use labelgate_infrastructure::InMemoryDirectoryRepository;
use tracing::{info, warn};

use crate::api_config::{ApiConfig, init_tracing};
use crate::api_services::RepositorySet;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let repositories = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = api_services::connect_and_migrate(database_url).await?;
            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }

            let repositories = RepositorySet::postgres(&pool);
            seed::seed_system_roles(repositories.security_admin.as_ref()).await?;
            repositories
        }
        None => {
            warn!("DATABASE_URL is not set, using in-memory storage");
            let directory = Arc::new(InMemoryDirectoryRepository::new());
            let repositories = RepositorySet::in_memory(directory.clone());
            seed::seed_system_roles(repositories.security_admin.as_ref()).await?;
            dev_seed::run(directory.as_ref(), &repositories).await?;
            repositories
        }
    };

    let app_state = api_services::build_app_state(
        repositories,
        config.admin_allow_list(),
        config.storage_backend(),
    );
    let app = api_router::build_router(app_state);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, storage = config.storage_backend(), "labelgate-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
