//! Observability subsystem: the process-wide structured logger.

pub mod logging;

pub use logging::{init, LoggerInitError};
