//! Document store connection establishment.
//!
//! # Responsibilities
//! - Build client options from the validated configuration
//! - Bound the pool size and the server-selection wait
//! - Confirm the connection with a ping before bootstrap advances
//!
//! # Design Decisions
//! - A connection attempt that has not been confirmed is still pending,
//!   never success: the ping round-trip is the confirmation
//! - Credentials are attached only when a user is configured; an empty
//!   user means unauthenticated access

use std::time::Duration;

use bson::doc;
use mongodb::options::{ClientOptions, Credential, ServerAddress};
use mongodb::{Client, Database};

use crate::config::ServiceConfig;
use crate::store::StoreError;

/// Upper bound on server selection. Without it an unreachable store would
/// park bootstrap indefinitely.
const SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Open and confirm a connection to the document store.
pub async fn connect(config: &ServiceConfig) -> Result<Database, StoreError> {
    let mut options = ClientOptions::default();
    options.hosts = vec![ServerAddress::Tcp {
        host: config.db_host.clone(),
        port: Some(config.db_port),
    }];
    options.app_name = Some(config.service_name.clone());
    options.max_pool_size = Some(config.db_pool_size);
    options.server_selection_timeout = Some(SELECTION_TIMEOUT);

    if !config.db_user.is_empty() {
        options.credential = Some(
            Credential::builder()
                .username(config.db_user.clone())
                .password(config.db_pass.clone())
                .build(),
        );
    }

    let client = Client::with_options(options)?;
    let database = client.database(&config.db_schema);

    // The driver connects lazily; round-trip a ping so an unreachable or
    // unauthenticated store fails here instead of on the first request.
    database.run_command(doc! { "ping": 1 }).await?;

    Ok(database)
}
