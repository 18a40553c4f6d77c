//! Environment validation.
//!
//! # Responsibilities
//! - Check every required key for presence before anything else runs
//! - Parse numeric options into their typed form
//! - Produce the immutable [`ServiceConfig`] snapshot
//!
//! # Design Decisions
//! - Reports the first missing key, in fixed declaration order
//! - Pure function over an environment snapshot; no process-global reads

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::{keys, ServiceConfig, REQUIRED_KEYS};

/// Error type for configuration validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required key is absent from the environment.
    #[error("service misconfiguration, missing environment variable: {0}")]
    MissingVariable(&'static str),

    /// A key is present but its value does not parse.
    #[error("service misconfiguration, invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Validate an environment snapshot and produce the typed configuration.
///
/// Presence of every required key is checked before any value is parsed,
/// so no partial configuration is ever observable.
pub fn validate_environment(env: &HashMap<String, String>) -> Result<ServiceConfig, ConfigError> {
    for key in REQUIRED_KEYS {
        if !env.contains_key(key) {
            return Err(ConfigError::MissingVariable(key));
        }
    }

    Ok(ServiceConfig {
        db_host: raw(env, keys::DB_HOST),
        db_port: parsed(env, keys::DB_PORT)?,
        db_user: raw(env, keys::DB_USER),
        db_pass: raw(env, keys::DB_PASS),
        db_schema: raw(env, keys::DB_SCHEMA),
        db_pool_size: parsed(env, keys::DB_POOL_SIZE)?,
        environment: raw(env, keys::SERVICE_ENV),
        service_name: raw(env, keys::SERVICE_NAME),
        service_address: raw(env, keys::SERVICE_ADDRESS),
        port: parsed(env, keys::PORT)?,
        registry_host: raw(env, keys::SERVICE_REGISTRY_HOST),
        registry_port: parsed(env, keys::SERVICE_REGISTRY_PORT)?,
        records_per_page: parsed(env, keys::RECORDS_PER_PAGE)?,
        registry_announce_fatal: optional_parsed(env, keys::REGISTRY_ANNOUNCE_FATAL)?
            .unwrap_or(false),
        log_dir: env
            .get(keys::LOG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("logs")),
    })
}

fn raw(env: &HashMap<String, String>, key: &'static str) -> String {
    // Presence was established by the loop above.
    env.get(key).cloned().unwrap_or_default()
}

fn parsed<T: FromStr>(env: &HashMap<String, String>, key: &'static str) -> Result<T, ConfigError> {
    let value = env.get(key).ok_or(ConfigError::MissingVariable(key))?;
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.clone(),
    })
}

fn optional_parsed<T: FromStr>(
    env: &HashMap<String, String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match env.get(key) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key,
                value: value.clone(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_env() -> HashMap<String, String> {
        [
            (keys::DB_HOST, "localhost"),
            (keys::DB_PORT, "27017"),
            (keys::DB_USER, ""),
            (keys::DB_PASS, ""),
            (keys::DB_SCHEMA, "automoviles"),
            (keys::DB_POOL_SIZE, "5"),
            (keys::SERVICE_ENV, "development"),
            (keys::SERVICE_NAME, "automovil-service"),
            (keys::SERVICE_ADDRESS, "127.0.0.1"),
            (keys::PORT, "3000"),
            (keys::SERVICE_REGISTRY_HOST, "localhost"),
            (keys::SERVICE_REGISTRY_PORT, "8080"),
            (keys::RECORDS_PER_PAGE, "20"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn full_environment_validates() {
        let config = validate_environment(&full_env()).expect("valid environment");
        assert_eq!(config.db_host, "localhost");
        assert_eq!(config.db_port, 27017);
        assert_eq!(config.db_pool_size, 5);
        assert_eq!(config.port, 3000);
        assert_eq!(config.records_per_page, 20);
        assert!(!config.registry_announce_fatal);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn each_missing_key_is_reported_by_name() {
        for key in REQUIRED_KEYS {
            let mut env = full_env();
            env.remove(key);
            assert_eq!(
                validate_environment(&env),
                Err(ConfigError::MissingVariable(key)),
                "expected {key} to be reported as missing"
            );
        }
    }

    #[test]
    fn first_missing_key_wins() {
        let mut env = full_env();
        env.remove(keys::DB_PORT);
        env.remove(keys::PORT);
        assert_eq!(
            validate_environment(&env),
            Err(ConfigError::MissingVariable(keys::DB_PORT))
        );
    }

    #[test]
    fn malformed_port_is_rejected() {
        let mut env = full_env();
        env.insert(keys::PORT.to_string(), "not-a-port".to_string());
        assert_eq!(
            validate_environment(&env),
            Err(ConfigError::InvalidValue {
                key: keys::PORT,
                value: "not-a-port".to_string()
            })
        );
    }

    #[test]
    fn announce_toggle_parses() {
        let mut env = full_env();
        env.insert(keys::REGISTRY_ANNOUNCE_FATAL.to_string(), "true".to_string());
        let config = validate_environment(&env).unwrap();
        assert!(config.registry_announce_fatal);
    }

    #[test]
    fn collection_url_points_at_the_resource() {
        let config = validate_environment(&full_env()).unwrap();
        assert_eq!(config.collection_url(), "http://127.0.0.1:3000/automoviles");
    }
}
