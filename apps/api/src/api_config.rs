use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use labelgate_application::AdminAllowList;
use labelgate_core::AppError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: Option<String>,
    pub api_host: String,
    pub api_port: u16,
    pub super_admin_emails: Vec<String>,
    pub admin_emails: Vec<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());
        if migrate_only && database_url.is_none() {
            return Err(AppError::Validation(
                "DATABASE_URL is required to run migrations".to_owned(),
            ));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = match env::var("API_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            Err(_) => 3001,
        };

        Ok(Self {
            migrate_only,
            database_url,
            api_host,
            api_port,
            super_admin_emails: email_list("LABELGATE_SUPER_ADMIN_EMAILS"),
            admin_emails: email_list("LABELGATE_ADMIN_EMAILS"),
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }

    pub fn admin_allow_list(&self) -> AdminAllowList {
        AdminAllowList::new(&self.super_admin_emails, &self.admin_emails)
    }

    pub fn storage_backend(&self) -> &'static str {
        if self.database_url.is_some() {
            "postgres"
        } else {
            "in_memory"
        }
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn email_list(name: &str) -> Vec<String> {
    env::var(name)
        .map(|value| parse_email_list(value.as_str()))
        .unwrap_or_default()
}

fn parse_email_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_owned)
        .collect()
}
