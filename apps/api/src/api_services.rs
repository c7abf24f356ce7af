mod database;
mod repositories;
mod state_builder;

pub use database::connect_and_migrate;
pub use repositories::RepositorySet;
pub use state_builder::build_app_state;
