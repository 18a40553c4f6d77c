//! Configuration schema definitions.
//!
//! The complete set of options the service recognizes, together with the
//! environment keys they are sourced from.

use std::path::PathBuf;

/// Environment key names recognized by the service.
pub mod keys {
    pub const DB_HOST: &str = "DB_HOST";
    pub const DB_PORT: &str = "DB_PORT";
    pub const DB_USER: &str = "DB_USER";
    pub const DB_PASS: &str = "DB_PASS";
    pub const DB_SCHEMA: &str = "DB_SCHEMA";
    pub const DB_POOL_SIZE: &str = "DB_POOL_SIZE";
    pub const SERVICE_ENV: &str = "SERVICE_ENV";
    pub const SERVICE_NAME: &str = "SERVICE_NAME";
    pub const SERVICE_ADDRESS: &str = "SERVICE_ADDRESS";
    pub const PORT: &str = "PORT";
    pub const SERVICE_REGISTRY_HOST: &str = "SERVICE_REGISTRY_HOST";
    pub const SERVICE_REGISTRY_PORT: &str = "SERVICE_REGISTRY_PORT";
    pub const RECORDS_PER_PAGE: &str = "RECORDS_PER_PAGE";

    // Optional keys.
    pub const REGISTRY_ANNOUNCE_FATAL: &str = "REGISTRY_ANNOUNCE_FATAL";
    pub const LOG_DIR: &str = "LOG_DIR";
}

/// Keys that must be present before bootstrap may proceed, in the order
/// they are reported when missing.
pub const REQUIRED_KEYS: [&str; 13] = [
    keys::DB_HOST,
    keys::DB_PORT,
    keys::DB_USER,
    keys::DB_PASS,
    keys::DB_SCHEMA,
    keys::DB_POOL_SIZE,
    keys::SERVICE_ENV,
    keys::SERVICE_NAME,
    keys::SERVICE_ADDRESS,
    keys::PORT,
    keys::SERVICE_REGISTRY_HOST,
    keys::SERVICE_REGISTRY_PORT,
    keys::RECORDS_PER_PAGE,
];

/// Validated configuration snapshot.
///
/// Built once by [`validate_environment`](crate::config::validate_environment)
/// and immutable for the rest of the process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Document store host.
    pub db_host: String,

    /// Document store port.
    pub db_port: u16,

    /// Document store user. Empty means unauthenticated access.
    pub db_user: String,

    /// Document store password.
    pub db_pass: String,

    /// Database name holding the resource collection.
    pub db_schema: String,

    /// Upper bound on the store connection pool.
    pub db_pool_size: u32,

    /// Environment name (`development`, `production`, ...).
    pub environment: String,

    /// Service identifier, used for the logger binding and the registry
    /// announcement path.
    pub service_name: String,

    /// Externally reachable address announced to the registry.
    pub service_address: String,

    /// HTTP listen port.
    pub port: u16,

    /// Service registry host.
    pub registry_host: String,

    /// Service registry port.
    pub registry_port: u16,

    /// Default page size for list requests.
    pub records_per_page: i64,

    /// When true, a failed registry announcement aborts bootstrap instead
    /// of being logged and skipped.
    pub registry_announce_fatal: bool,

    /// Directory receiving the rotating log files.
    pub log_dir: PathBuf,
}

impl ServiceConfig {
    /// URL of the resource collection as seen by clients. Used as the
    /// `source.pointer` of every error envelope.
    pub fn collection_url(&self) -> String {
        format!("http://{}:{}/automoviles", self.service_address, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
