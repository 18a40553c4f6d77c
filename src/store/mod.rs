//! Document store subsystem.
//!
//! # Data Flow
//! ```text
//! bootstrap
//!     → connector.rs (client options, ping-confirmed connection)
//!     → mongo.rs (collection-backed Automoviles implementation)
//!     → shared via Arc<dyn Automoviles> with the route handlers
//! ```
//!
//! # Design Decisions
//! - The data-access collaborator is a trait so route handlers never know
//!   which store backs them; tests substitute an in-memory implementation
//! - The collaborator is stateless: one instance, shared by reference,
//!   no per-request mutable state

pub mod connector;
pub mod mongo;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use connector::connect;
pub use mongo::MongoAutomoviles;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store rejected the document (schema/validation failure).
    #[error("store validation failed: {0}")]
    Validation(String),

    /// The store itself failed (unreachable, auth, timeout, ...).
    #[error("store operation failed: {0}")]
    Backend(#[from] mongodb::error::Error),
}

/// A vehicle record as exposed over the API.
///
/// Timestamp fields are optional so a field-projected read stays
/// representable; on a full read they are always present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Automovil {
    /// Store-assigned identifier, hex-encoded.
    #[serde(rename = "_id")]
    pub record_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Numeric business identifier, distinct from the record identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opcionales: Vec<String>,
}

/// Client-supplied fields for a new record.
///
/// The record identifier and both timestamps are always server-assigned;
/// unknown members (including client-supplied timestamps) are dropped at
/// deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAutomovil {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub opcionales: Option<Vec<String>>,
}

/// Client-supplied fields for a partial update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutomovilPatch {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub opcionales: Option<Vec<String>>,
}

impl AutomovilPatch {
    /// True when the body carried no recognized member at all.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none() && self.opcionales.is_none()
    }
}

/// Parameters for a list read.
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Field names to project; `None` fetches complete records.
    pub fields: Option<Vec<String>>,

    /// Maximum number of records to return.
    pub limit: i64,
}

/// Outcome of a partial update.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Outcome of a delete, reported verbatim to the caller.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}

/// The resource's data-access collaborator.
///
/// One implementation is constructed at bootstrap and shared by reference
/// with every route handler.
#[async_trait]
pub trait Automoviles: Send + Sync {
    async fn find_all(&self, query: ListQuery) -> Result<Vec<Automovil>, StoreError>;

    async fn find_one(&self, id: ObjectId) -> Result<Option<Automovil>, StoreError>;

    async fn create(&self, new: NewAutomovil) -> Result<Automovil, StoreError>;

    /// Apply a partial update. Creation timestamps are never written;
    /// the update timestamp is stamped fresh by the implementation.
    async fn patch(&self, id: ObjectId, patch: AutomovilPatch) -> Result<UpdateOutcome, StoreError>;

    async fn delete(&self, id: ObjectId) -> Result<DeleteOutcome, StoreError>;
}
