use std::time::Duration;

use crate::error::Result;
pub use clap::Parser;
use flick_types::{config::BackendConfig, general::Environment};

#[derive(Debug, Clone, clap::Parser)]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 4000,
        env = "FLICK_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "FLICK_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long = "env",
        value_enum,
        default_value_t = Environment::Development,
        env = "FLICK_ENV",
        help = "Environment reported by health check"
    )]
    pub environment: Environment,

    #[command(flatten)]
    pub backend: BackendConfig,

    #[arg(
        long,
        env = "FLICK_QUERY_TIMEOUT",
        default_value = "3s",
        help = "Deadline for a single database operation in human friendly format (e.g. 500ms, 3s)",
        value_parser = humantime::parse_duration
    )]
    pub query_timeout: Duration,

    #[arg(long, env = "FLICK_NO_CORS", help = "Disable CORS")]
    pub no_cors: bool,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn database_url(&self) -> String {
        self.backend.database_url()
    }
}

impl From<&ServerConfig> for flick_app::state::AppConfig {
    fn from(config: &ServerConfig) -> Self {
        flick_app::state::AppConfig {
            environment: config.environment,
            query_timeout: config.query_timeout,
        }
    }
}
