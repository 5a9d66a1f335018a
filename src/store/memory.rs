use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Document, DocumentStore, Filter, StoreError, UpdateResult, WriteOp, merge_upsert};

type Collections = HashMap<String, Vec<Document>>;

/// In-process document store.
///
/// Intended for tests and local runs; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn insert(collections: &mut Collections, collection: &str, document: Document) {
    collections
        .entry(collection.to_string())
        .or_default()
        .push(document);
}

fn update(
    collections: &mut Collections,
    collection: &str,
    filter: &Filter,
    set: Document,
    upsert: bool,
) -> UpdateResult {
    let documents = collections.entry(collection.to_string()).or_default();
    if let Some(document) = documents.iter_mut().find(|doc| filter.matches(doc)) {
        document.extend(set);
        return UpdateResult {
            matched: 1,
            upserted: false,
        };
    }
    if upsert {
        documents.push(merge_upsert(filter, set));
    }
    UpdateResult {
        matched: 0,
        upserted: upsert,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        insert(&mut collections, collection, document);
        Ok(())
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        for document in documents {
            insert(&mut collections, collection, document);
        }
        Ok(())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateResult, StoreError> {
        let mut collections = self.collections.write().await;
        Ok(update(&mut collections, collection, filter, set, upsert))
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).count() as u64)
            .unwrap_or(0))
    }

    async fn commit(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        // One write guard for the whole batch, so readers see all or nothing.
        let mut collections = self.collections.write().await;
        for op in ops {
            match op {
                WriteOp::Insert {
                    collection,
                    document,
                } => insert(&mut collections, &collection, document),
                WriteOp::Update {
                    collection,
                    filter,
                    set,
                    upsert,
                } => {
                    update(&mut collections, &collection, &filter, set, upsert);
                }
            }
        }
        Ok(())
    }

    async fn close(&self) {}
}
