//! Startup orchestration.
//!
//! # Responsibilities
//! - Drive the bootstrap pipeline through its fixed stage order
//! - Short-circuit on the first failure, tagged with the stage it hit
//! - Bind the listener last so traffic arrives only when the service is
//!   complete
//!
//! # Design Decisions
//! - Fail fast: any step failure is fatal and nothing after it runs
//! - The context is exclusively owned by the orchestrator and handed to
//!   one step at a time; no step observes a later step's state
//! - On failure, partially constructed resources (open store connection,
//!   built-but-unmounted pipeline) are released when the context drops

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::{self, ConfigError, ServiceConfig};
use crate::http::{self, AppState};
use crate::lifecycle::signals;
use crate::observability::{self, LoggerInitError};
use crate::registry::{self, RegistryError};
use crate::store::{self, Automoviles, MongoAutomoviles, StoreError};

/// Stages of the bootstrap state machine, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStage {
    Created,
    Validated,
    Logged,
    Connected,
    ServerBuilt,
    RoutesRegistered,
    ErrorHandlersRegistered,
    Registered,
    Listening,
}

impl BootstrapStage {
    /// The ordered pipeline the orchestrator drives. `Created` is the
    /// initial state, not a step.
    pub const PIPELINE: [BootstrapStage; 8] = [
        BootstrapStage::Validated,
        BootstrapStage::Logged,
        BootstrapStage::Connected,
        BootstrapStage::ServerBuilt,
        BootstrapStage::RoutesRegistered,
        BootstrapStage::ErrorHandlersRegistered,
        BootstrapStage::Registered,
        BootstrapStage::Listening,
    ];
}

/// A step failure, before the orchestrator tags it with its stage.
#[derive(Debug, Error)]
pub enum StepFailure {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    Logger(#[from] LoggerInitError),

    #[error("store connection failed: {0}")]
    StoreConnection(#[from] StoreError),

    #[error("registry announcement failed: {0}")]
    RegistryAnnounce(#[from] RegistryError),

    #[error("server start failed: {0}")]
    ServerStart(#[from] std::io::Error),
}

/// Terminal failure outcome of the bootstrap pipeline.
#[derive(Debug, Error)]
#[error("bootstrap failed at {stage:?}: {source}")]
pub struct BootstrapError {
    pub stage: BootstrapStage,
    #[source]
    pub source: StepFailure,
}

/// Service-wide state threaded through the bootstrap pipeline.
///
/// Created once per process; each successful step fills in more of it.
/// Holds process-lifetime resources (logger guard, store handle), so it
/// lives until exit.
pub struct ServiceContext {
    name: String,
    env: HashMap<String, String>,
    stage: BootstrapStage,
    requests: Arc<AtomicU64>,
    started_at: Instant,
    config: Option<ServiceConfig>,
    log_guard: Option<WorkerGuard>,
    automoviles: Option<Arc<dyn Automoviles>>,
    state: Option<AppState>,
    router: Option<Router<AppState>>,
}

impl ServiceContext {
    pub fn new(name: String, env: HashMap<String, String>) -> Self {
        Self {
            name,
            env,
            stage: BootstrapStage::Created,
            requests: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
            config: None,
            log_guard: None,
            automoviles: None,
            state: None,
            router: None,
        }
    }

    pub fn stage(&self) -> BootstrapStage {
        self.stage
    }

    fn config(&self) -> &ServiceConfig {
        self.config
            .as_ref()
            .expect("configuration is validated before any later step runs")
    }

    async fn advance(&mut self, stage: BootstrapStage) -> Result<(), StepFailure> {
        match stage {
            BootstrapStage::Created => Ok(()),
            BootstrapStage::Validated => self.validate(),
            BootstrapStage::Logged => self.init_logger(),
            BootstrapStage::Connected => self.connect_store().await,
            BootstrapStage::ServerBuilt => self.build_server(),
            BootstrapStage::RoutesRegistered => self.register_routes(),
            BootstrapStage::ErrorHandlersRegistered => self.register_error_handlers(),
            BootstrapStage::Registered => self.announce().await,
            BootstrapStage::Listening => self.listen().await,
        }
    }

    /// Step 1: no later step may run with missing configuration.
    fn validate(&mut self) -> Result<(), StepFailure> {
        self.config = Some(config::validate_environment(&self.env)?);
        Ok(())
    }

    /// Step 2: everything after this logs its own success and failure.
    fn init_logger(&mut self) -> Result<(), StepFailure> {
        self.log_guard = Some(observability::init(self.config())?);
        tracing::info!(service = %self.name, "logger initialized");
        Ok(())
    }

    /// Step 3: the service never accepts traffic without a confirmed
    /// store connection.
    async fn connect_store(&mut self) -> Result<(), StepFailure> {
        let database = store::connect(self.config()).await?;
        self.automoviles = Some(Arc::new(MongoAutomoviles::new(&database)));
        tracing::info!(
            service = %self.name,
            host = %self.config().db_host,
            schema = %self.config().db_schema,
            "store connection initialized"
        );
        Ok(())
    }

    /// Step 4: the base pipeline with the status endpoint. The middleware
    /// chain is attached in [`http::server::finalize`] once the route set
    /// is complete.
    fn build_server(&mut self) -> Result<(), StepFailure> {
        let automoviles = self
            .automoviles
            .clone()
            .expect("store connected before the server is built");
        self.state = Some(AppState::new(
            self.config(),
            automoviles,
            self.requests.clone(),
            self.started_at,
        ));
        self.router = Some(http::server::build());
        tracing::info!(service = %self.name, "HTTP pipeline configured");
        Ok(())
    }

    /// Step 5: resource routes join the pipeline.
    fn register_routes(&mut self) -> Result<(), StepFailure> {
        let router = self
            .router
            .take()
            .expect("pipeline built before routes are registered");
        self.router = Some(router.merge(http::automoviles::routes()));
        tracing::info!(service = %self.name, "resource routes configured");
        Ok(())
    }

    /// Step 6: the catch-all goes on last or it would shadow the routes.
    fn register_error_handlers(&mut self) -> Result<(), StepFailure> {
        let router = self
            .router
            .take()
            .expect("routes registered before the error handlers");
        self.router = Some(router.fallback(http::error::resource_not_available));
        tracing::info!(service = %self.name, "error handling routes registered");
        Ok(())
    }

    /// Step 7: announce to the service registry. Fatal only when the
    /// deployment opts in via `REGISTRY_ANNOUNCE_FATAL`.
    async fn announce(&mut self) -> Result<(), StepFailure> {
        match registry::announce(self.config()).await {
            Ok(body) => {
                tracing::info!(
                    service = %self.name,
                    response = %body,
                    "service registered with service registry"
                );
                Ok(())
            }
            Err(err) if !self.config().registry_announce_fatal => {
                tracing::warn!(
                    service = %self.name,
                    error = %err,
                    "registry announcement failed, continuing unregistered"
                );
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Step 8: bind and serve. Terminal success state.
    async fn listen(&mut self) -> Result<(), StepFailure> {
        let port = self.config().port;
        let state = self
            .state
            .take()
            .expect("application state assembled before listening");
        let router = self
            .router
            .take()
            .expect("pipeline completed before listening");

        let app = http::server::finalize(router, state);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(StepFailure::ServerStart)?;

        tracing::info!(service = %self.name, address = %addr, "up and running");

        axum::serve(listener, app)
            .with_graceful_shutdown(signals::shutdown_signal())
            .await
            .map_err(StepFailure::ServerStart)?;

        tracing::info!(service = %self.name, "server stopped");
        Ok(())
    }
}

/// Run the bootstrap pipeline to completion.
///
/// Steps execute strictly in [`BootstrapStage::PIPELINE`] order; the
/// first failure aborts everything after it and is returned tagged with
/// the stage it occurred at. Returns `Ok` only after the server has
/// stopped serving.
pub async fn run(name: String, env: HashMap<String, String>) -> Result<(), BootstrapError> {
    let mut context = ServiceContext::new(name, env);

    for stage in BootstrapStage::PIPELINE {
        if let Err(source) = context.advance(stage).await {
            tracing::error!(stage = ?stage, error = %source, "error during service bootstrap");
            return Err(BootstrapError { stage, source });
        }
        context.stage = stage;
    }

    Ok(())
}
