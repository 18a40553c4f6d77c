//! Collection-backed implementation of the resource collaborator.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::store::{
    Automovil, Automoviles, AutomovilPatch, DeleteOutcome, ListQuery, NewAutomovil, StoreError,
    UpdateOutcome,
};

const COLLECTION: &str = "automoviles";

/// Stored shape of a vehicle record.
///
/// Kept separate from [`Automovil`] so the store identifier and timestamps
/// use the driver's native types while the API keeps hex strings and
/// RFC 3339.
#[derive(Debug, Serialize, Deserialize)]
struct AutomovilDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    oid: Option<ObjectId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<bson::DateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<bson::DateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    opcionales: Vec<String>,
}

impl From<AutomovilDocument> for Automovil {
    fn from(doc: AutomovilDocument) -> Self {
        Automovil {
            record_id: doc.oid.map(|oid| oid.to_hex()).unwrap_or_default(),
            created_at: doc.created_at.map(bson::DateTime::to_chrono),
            updated_at: doc.updated_at.map(bson::DateTime::to_chrono),
            id: doc.id,
            name: doc.name,
            opcionales: doc.opcionales,
        }
    }
}

/// Mongo-backed [`Automoviles`] collaborator.
///
/// Holds only the collection handle; safe to share by reference across
/// concurrent requests.
pub struct MongoAutomoviles {
    collection: Collection<AutomovilDocument>,
}

impl MongoAutomoviles {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }
}

fn projection(fields: &[String]) -> Document {
    let mut doc = Document::new();
    for field in fields {
        doc.insert(field, 1);
    }
    doc
}

#[async_trait]
impl Automoviles for MongoAutomoviles {
    async fn find_all(&self, query: ListQuery) -> Result<Vec<Automovil>, StoreError> {
        let mut options = FindOptions::default();
        options.limit = Some(query.limit);
        options.projection = query.fields.as_deref().map(projection);

        let mut cursor = self.collection.find(doc! {}).with_options(options).await?;
        let mut records = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            records.push(document.into());
        }
        Ok(records)
    }

    async fn find_one(&self, id: ObjectId) -> Result<Option<Automovil>, StoreError> {
        let found = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(found.map(Into::into))
    }

    async fn create(&self, new: NewAutomovil) -> Result<Automovil, StoreError> {
        let now = bson::DateTime::from_chrono(Utc::now());
        let document = AutomovilDocument {
            oid: Some(ObjectId::new()),
            created_at: Some(now),
            updated_at: Some(now),
            id: new.id,
            name: new.name,
            opcionales: new.opcionales.unwrap_or_default(),
        };
        self.collection.insert_one(&document).await?;
        Ok(document.into())
    }

    async fn patch(
        &self,
        id: ObjectId,
        patch: AutomovilPatch,
    ) -> Result<UpdateOutcome, StoreError> {
        // Only recognized members reach the update; creation timestamps in
        // particular are never client-writable.
        let mut set = doc! {
            "updated_at": bson::DateTime::from_chrono(Utc::now()),
        };
        if let Some(id) = patch.id {
            set.insert("id", id);
        }
        if let Some(name) = patch.name {
            set.insert("name", name);
        }
        if let Some(opcionales) = patch.opcionales {
            set.insert("opcionales", opcionales);
        }

        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?;
        Ok(UpdateOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn delete(&self, id: ObjectId) -> Result<DeleteOutcome, StoreError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(DeleteOutcome {
            deleted_count: result.deleted_count,
        })
    }
}
