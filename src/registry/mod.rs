//! Service-registry announcement.
//!
//! # Responsibilities
//! - One outbound call announcing (name, address, port) to the registry
//! - Bounded timeout so an unreachable registry cannot hang bootstrap
//!
//! # Design Decisions
//! - The HTTP outcome is checked; whether a failure aborts bootstrap is
//!   the orchestrator's call, driven by `REGISTRY_ANNOUNCE_FATAL`

use std::time::Duration;

use thiserror::Error;

use crate::config::ServiceConfig;

const ANNOUNCE_TIMEOUT: Duration = Duration::from_secs(5);

/// Error type for registry announcement.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("registry rejected announcement with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// The announcement path the registry expects.
pub fn announce_url(config: &ServiceConfig) -> String {
    format!(
        "http://{}:{}/serviceRegister/{}/{}/{}",
        config.registry_host,
        config.registry_port,
        config.service_name,
        config.service_address,
        config.port
    )
}

/// Announce this service to the registry. Returns the registry's response
/// body so the caller can log it.
pub async fn announce(config: &ServiceConfig) -> Result<String, RegistryError> {
    let client = reqwest::Client::builder()
        .timeout(ANNOUNCE_TIMEOUT)
        .build()?;

    let response = client.get(announce_url(config)).send().await?;
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if !status.is_success() {
        return Err(RegistryError::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}
