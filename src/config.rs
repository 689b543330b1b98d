use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use crate::db::PoolSettings;
use crate::utils::RetryConfig;

/// Service configuration, read from flags or the matching environment
/// variables.
#[derive(Parser, Debug, Clone)]
#[command(name = "order-fulfillment")]
#[command(about = "Customers, orders and priced deliveries over HTTP")]
pub struct AppConfig {
    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    pub bind_addr: SocketAddr,

    /// Postgres connection string. Without one the service keeps its data in memory.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Upper bound on pooled database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    /// Seconds to wait for a free pooled connection
    #[arg(long, env = "DATABASE_ACQUIRE_TIMEOUT_SECS", default_value_t = 30)]
    pub acquire_timeout_secs: u64,

    /// Attempts made to reach the database at startup
    #[arg(long, env = "DATABASE_CONNECT_ATTEMPTS", default_value_t = 5)]
    pub connect_attempts: u32,

    /// Do not apply embedded migrations on startup
    #[arg(long, env = "SKIP_MIGRATIONS")]
    pub skip_migrations: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info,order_fulfillment=debug")]
    pub log_filter: String,
}

impl AppConfig {
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
            ..PoolSettings::default()
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::default().with_max_attempts(self.connect_attempts)
    }
}
