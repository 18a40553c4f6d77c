//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate config → Logger → Store connect → Build pipeline
//!     → Resource routes → Error handlers → Registry announce → Listen
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → graceful shutdown of the serve loop
//! ```
//!
//! # Design Decisions
//! - Strictly ordered startup; any step failure aborts everything after it
//! - The listener binds last: traffic only once the service is complete

pub mod signals;
pub mod startup;

pub use startup::{run, BootstrapError, BootstrapStage, ServiceContext, StepFailure};
