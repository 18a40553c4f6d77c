//! Service configuration subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (+ envs/.env.<SERVICE_ENV>)
//!     → validation.rs (presence + parse checks)
//!     → ServiceConfig (typed, immutable snapshot)
//!     → threaded through the bootstrap pipeline
//! ```
//!
//! # Design Decisions
//! - Config is validated exhaustively up front; later code never consults
//!   the raw environment
//! - Keys are checked in a fixed declaration order so the reported missing
//!   key is deterministic

pub mod schema;
pub mod validation;

pub use schema::{keys, ServiceConfig, REQUIRED_KEYS};
pub use validation::{validate_environment, ConfigError};
