use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    dto::catalog::SeedOutcome,
    error::{AppError, AppResult},
    models::{MenuItem, Restaurant},
    store::{DocumentStore, Filter, Store, StoreError, collections, to_document},
};

const CATALOG_JSON: &str = include_str!("../../data/catalog.json");

#[derive(Debug, Deserialize)]
pub struct SeedCatalog {
    pub restaurants: Vec<Restaurant>,
    pub menu_items: Vec<MenuItem>,
}

pub fn bundled_catalog() -> AppResult<SeedCatalog> {
    serde_json::from_str(CATALOG_JSON)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("bundled catalog is invalid: {e}")))
}

/// Seeds the bundled catalog on demand. Calls are serialized so concurrent
/// requests cannot both observe an empty catalog.
#[derive(Clone)]
pub struct CatalogSeeder {
    store: Store,
    lock: Arc<Mutex<()>>,
}

impl CatalogSeeder {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn seed(&self) -> AppResult<SeedOutcome> {
        let _guard = self.lock.lock().await;
        seed_catalog(self.store.as_ref()).await
    }
}

/// Inserts the bundled catalog unless restaurants already exist.
pub async fn seed_catalog(store: &dyn DocumentStore) -> AppResult<SeedOutcome> {
    seed_with(store, bundled_catalog()?).await
}

pub async fn seed_with(store: &dyn DocumentStore, catalog: SeedCatalog) -> AppResult<SeedOutcome> {
    let existing = store.count(collections::RESTAURANTS, &Filter::all()).await?;
    if existing > 0 {
        tracing::debug!(existing, "catalog already seeded");
        return Ok(SeedOutcome {
            seeded: false,
            restaurants: existing,
            menu_items: store.count(collections::MENU_ITEMS, &Filter::all()).await?,
        });
    }

    let restaurants = catalog
        .restaurants
        .iter()
        .map(to_document)
        .collect::<Result<Vec<_>, StoreError>>()?;
    let menu_items = catalog
        .menu_items
        .iter()
        .map(to_document)
        .collect::<Result<Vec<_>, StoreError>>()?;
    let outcome = SeedOutcome {
        seeded: true,
        restaurants: restaurants.len() as u64,
        menu_items: menu_items.len() as u64,
    };

    store
        .insert_many(collections::RESTAURANTS, restaurants)
        .await?;
    store.insert_many(collections::MENU_ITEMS, menu_items).await?;
    tracing::info!(
        restaurants = outcome.restaurants,
        menu_items = outcome.menu_items,
        "catalog seeded"
    );
    Ok(outcome)
}
