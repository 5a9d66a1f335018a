//! Collection-oriented document storage.
//!
//! Every component receives a [`Store`] handle at construction time. Two
//! backends implement [`DocumentStore`]: [`memory::MemoryStore`] for tests and
//! local runs, and [`postgres::PgStore`] which keeps documents as JSONB rows.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Collection names used by the services.
pub mod collections {
    pub const USERS: &str = "users";
    pub const RESTAURANTS: &str = "restaurants";
    pub const MENU_ITEMS: &str = "menu_items";
    pub const CARTS: &str = "carts";
    pub const ORDERS: &str = "orders";
    pub const AUDIT_LOGS: &str = "audit_logs";
}

pub type Document = Map<String, Value>;

pub type Store = Arc<dyn DocumentStore>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("value is not a document: {0}")]
    NotADocument(String),

    /// A write hit a unique index, e.g. a second user with the same email.
    #[error("duplicate key in {0}")]
    Duplicate(String),
}

/// Top-level field equality filter. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Document);

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }

    pub fn as_document(&self) -> &Document {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched: u64,
    pub upserted: bool,
}

/// A single write inside a [`DocumentStore::commit`] batch.
#[derive(Debug, Clone)]
pub enum WriteOp {
    Insert {
        collection: String,
        document: Document,
    },
    Update {
        collection: String,
        filter: Filter,
        set: Document,
        upsert: bool,
    },
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, collection: &str, filter: &Filter)
    -> Result<Option<Document>, StoreError>;

    /// Matching documents in insertion order.
    async fn find_many(&self, collection: &str, filter: &Filter)
    -> Result<Vec<Document>, StoreError>;

    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError>;

    async fn insert_many(&self, collection: &str, documents: Vec<Document>)
    -> Result<(), StoreError>;

    /// Overwrites the fields in `set` on the first matching document. With
    /// `upsert`, a miss inserts the filter fields merged with `set`.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateResult, StoreError>;

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    /// Applies every write or none of them.
    async fn commit(&self, ops: Vec<WriteOp>) -> Result<(), StoreError>;

    async fn close(&self);
}

pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::NotADocument(other.to_string())),
    }
}

/// Single-field update document, e.g. `{"items": [...]}`.
pub fn set_field<T: Serialize>(field: &str, value: &T) -> Result<Document, StoreError> {
    let mut document = Document::new();
    document.insert(field.to_string(), serde_json::to_value(value)?);
    Ok(document)
}

pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

pub async fn fetch_one<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    filter: &Filter,
) -> Result<Option<T>, StoreError> {
    store
        .find_one(collection, filter)
        .await?
        .map(from_document)
        .transpose()
}

pub async fn fetch_many<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    filter: &Filter,
) -> Result<Vec<T>, StoreError> {
    store
        .find_many(collection, filter)
        .await?
        .into_iter()
        .map(from_document)
        .collect()
}

fn merge_upsert(filter: &Filter, set: Document) -> Document {
    let mut document = filter.as_document().clone();
    document.extend(set);
    document
}
