//! Bootstrap fail-fast behavior for the store: a failed connection aborts
//! the pipeline and no observable effect of any later step occurs.

use std::collections::HashMap;

use automovil_service::lifecycle::{self, BootstrapStage, StepFailure};

const LISTEN_PORT: &str = "39473";

fn env_for_test(log_dir: &str) -> HashMap<String, String> {
    [
        // Nothing listens on port 1; the connector's bounded selection
        // timeout turns this into a prompt failure.
        ("DB_HOST", "127.0.0.1"),
        ("DB_PORT", "1"),
        ("DB_USER", ""),
        ("DB_PASS", ""),
        ("DB_SCHEMA", "automoviles"),
        ("DB_POOL_SIZE", "5"),
        ("SERVICE_ENV", "production"),
        ("SERVICE_NAME", "automovil-service"),
        ("SERVICE_ADDRESS", "127.0.0.1"),
        ("PORT", LISTEN_PORT),
        ("SERVICE_REGISTRY_HOST", "127.0.0.1"),
        ("SERVICE_REGISTRY_PORT", "1"),
        ("RECORDS_PER_PAGE", "20"),
        ("LOG_DIR", log_dir),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[tokio::test]
async fn store_connect_failure_leaves_no_listener_bound() {
    let logs = tempfile::tempdir().unwrap();
    let env = env_for_test(logs.path().to_str().unwrap());

    let err = lifecycle::run("automovil-service".to_string(), env)
        .await
        .expect_err("bootstrap must fail");

    assert_eq!(err.stage, BootstrapStage::Connected);
    assert!(matches!(err.source, StepFailure::StoreConnection(_)));

    // The pipeline aborted before the server-build and listen steps, so
    // the configured port must not be accepting connections.
    assert!(
        tokio::net::TcpStream::connect(format!("127.0.0.1:{LISTEN_PORT}"))
            .await
            .is_err()
    );
}
