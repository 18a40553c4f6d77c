//! Shared utilities for integration testing.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use automovil_service::http;
use automovil_service::store::{
    Automovil, Automoviles, AutomovilPatch, DeleteOutcome, ListQuery, NewAutomovil, StoreError,
    UpdateOutcome,
};
use automovil_service::{AppState, ServiceConfig};
use axum::Router;
use bson::oid::ObjectId;
use chrono::Utc;

/// In-memory stand-in for the Mongo-backed collaborator.
///
/// `touched` flips on every call, so tests can assert a request was
/// rejected before the store was consulted. `failing` makes every call
/// error the way an unreachable backend would.
#[derive(Default)]
pub struct InMemoryAutomoviles {
    records: Mutex<Vec<Automovil>>,
    pub touched: AtomicBool,
    pub failing: AtomicBool,
}

impl InMemoryAutomoviles {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn was_touched(&self) -> bool {
        self.touched.load(Ordering::SeqCst)
    }

    fn guard(&self) -> Result<(), StoreError> {
        self.touched.store(true, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(mongodb::error::Error::custom(
                "injected backend failure",
            )));
        }
        Ok(())
    }
}

fn project(mut record: Automovil, fields: &[String]) -> Automovil {
    let keep = |name: &str| fields.iter().any(|f| f == name);
    if !keep("created_at") {
        record.created_at = None;
    }
    if !keep("updated_at") {
        record.updated_at = None;
    }
    if !keep("id") {
        record.id = None;
    }
    if !keep("name") {
        record.name = None;
    }
    if !keep("opcionales") {
        record.opcionales = Vec::new();
    }
    record
}

#[async_trait]
impl Automoviles for InMemoryAutomoviles {
    async fn find_all(&self, query: ListQuery) -> Result<Vec<Automovil>, StoreError> {
        self.guard()?;
        let records = self.records.lock().unwrap();
        let mut out: Vec<Automovil> = records
            .iter()
            .take(query.limit.max(0) as usize)
            .cloned()
            .collect();
        if let Some(fields) = &query.fields {
            out = out.into_iter().map(|r| project(r, fields)).collect();
        }
        Ok(out)
    }

    async fn find_one(&self, id: ObjectId) -> Result<Option<Automovil>, StoreError> {
        self.guard()?;
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.record_id == id.to_hex()).cloned())
    }

    async fn create(&self, new: NewAutomovil) -> Result<Automovil, StoreError> {
        self.guard()?;
        let now = Utc::now();
        let record = Automovil {
            record_id: ObjectId::new().to_hex(),
            created_at: Some(now),
            updated_at: Some(now),
            id: new.id,
            name: new.name,
            opcionales: new.opcionales.unwrap_or_default(),
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn patch(
        &self,
        id: ObjectId,
        patch: AutomovilPatch,
    ) -> Result<UpdateOutcome, StoreError> {
        self.guard()?;
        let mut records = self.records.lock().unwrap();
        let Some(record) = records.iter_mut().find(|r| r.record_id == id.to_hex()) else {
            return Ok(UpdateOutcome {
                matched_count: 0,
                modified_count: 0,
            });
        };
        if let Some(id) = patch.id {
            record.id = Some(id);
        }
        if let Some(name) = patch.name {
            record.name = Some(name);
        }
        if let Some(opcionales) = patch.opcionales {
            record.opcionales = opcionales;
        }
        record.updated_at = Some(Utc::now());
        Ok(UpdateOutcome {
            matched_count: 1,
            modified_count: 1,
        })
    }

    async fn delete(&self, id: ObjectId) -> Result<DeleteOutcome, StoreError> {
        self.guard()?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.record_id != id.to_hex());
        Ok(DeleteOutcome {
            deleted_count: (before - records.len()) as u64,
        })
    }
}

pub fn test_config() -> ServiceConfig {
    ServiceConfig {
        db_host: "localhost".to_string(),
        db_port: 27017,
        db_user: String::new(),
        db_pass: String::new(),
        db_schema: "automoviles".to_string(),
        db_pool_size: 5,
        environment: "test".to_string(),
        service_name: "automovil-service".to_string(),
        service_address: "127.0.0.1".to_string(),
        port: 3000,
        registry_host: "localhost".to_string(),
        registry_port: 8080,
        records_per_page: 20,
        registry_announce_fatal: false,
        log_dir: PathBuf::from("logs"),
    }
}

/// Assemble the complete serving pipeline the way the bootstrap steps do:
/// base router, resource routes, fallback, then state + middleware.
pub fn test_app(store: Arc<dyn Automoviles>) -> Router {
    let state = AppState::new(
        &test_config(),
        store,
        Arc::new(AtomicU64::new(0)),
        Instant::now(),
    );
    let router = http::server::build()
        .merge(http::automoviles::routes())
        .fallback(http::error::resource_not_available);
    http::server::finalize(router, state)
}
