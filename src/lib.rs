//! Automovil microservice.
//!
//! A small HTTP service exposing CRUD operations on a vehicle collection,
//! backed by a MongoDB document store and self-registering with an
//! external service registry at startup.
//!
//! # Architecture Overview
//!
//! ```text
//!   environment ──▶ config ──▶ lifecycle::startup (ordered pipeline)
//!                                  │
//!        ┌─────────────┬───────────┼──────────────┬─────────────┐
//!        ▼             ▼           ▼              ▼             ▼
//!  observability     store     http::server   http routes   registry
//!  (logger)        (Mongo)    (middleware +   (/automoviles  (announce)
//!                              /status)        CRUD)
//!                                  │
//!                                  ▼
//!                             bind + serve
//! ```
//!
//! Bootstrap is strictly ordered and fail-fast: configuration validation,
//! logger, store connection, HTTP pipeline, resource routes, error
//! handlers, registry announcement, listen. A failure at any step aborts
//! every later step and the listener is never bound.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod store;

pub use config::ServiceConfig;
pub use http::AppState;
pub use lifecycle::{BootstrapError, BootstrapStage};
