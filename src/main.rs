use std::collections::HashMap;
use std::path::Path;

use automovil_service::lifecycle;

/// Default service identifier when the environment carries none; the
/// validation step still fails the bootstrap if `SERVICE_NAME` is absent.
const DEFAULT_NAME: &str = "automovil-service";

#[tokio::main]
async fn main() {
    // Environment files live under envs/, one per deployment environment.
    // Values already present in the real environment win.
    let environment =
        std::env::var("SERVICE_ENV").unwrap_or_else(|_| "development".to_string());
    let _ = dotenvy::from_path(Path::new("envs").join(format!(".env.{environment}")));

    println!("bootstrapping service using environment: '{environment}'");

    let env: HashMap<String, String> = std::env::vars().collect();
    let name = env
        .get("SERVICE_NAME")
        .cloned()
        .unwrap_or_else(|| DEFAULT_NAME.to_string());

    if let Err(err) = lifecycle::run(name, env).await {
        // The logger may not exist yet (validation failures), so the
        // failure also goes to stderr.
        eprintln!("error during service bootstrap: {err}");
        std::process::exit(1);
    }
}
