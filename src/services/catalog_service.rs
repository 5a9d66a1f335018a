use crate::{
    error::{AppError, AppResult},
    models::{MenuItem, Restaurant},
    store::{Filter, Store, collections, fetch_many, fetch_one},
};

/// Read-only access to restaurants and their menus.
#[derive(Clone)]
pub struct CatalogReader {
    store: Store,
}

impl CatalogReader {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// `search` is a case-insensitive substring of name or description;
    /// `cuisine` must match exactly. Blank values are ignored.
    pub async fn list_restaurants(
        &self,
        search: Option<&str>,
        cuisine: Option<&str>,
    ) -> AppResult<Vec<Restaurant>> {
        let mut filter = Filter::all();
        if let Some(cuisine) = cuisine.filter(|c| !c.is_empty()) {
            filter = filter.eq("cuisine_type", cuisine);
        }

        let restaurants: Vec<Restaurant> =
            fetch_many(self.store.as_ref(), collections::RESTAURANTS, &filter).await?;

        let Some(needle) = search.filter(|s| !s.is_empty()).map(str::to_lowercase) else {
            return Ok(restaurants);
        };
        Ok(restaurants
            .into_iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle)
                    || r.description.to_lowercase().contains(&needle)
            })
            .collect())
    }

    pub async fn get_restaurant(&self, id: &str) -> AppResult<Restaurant> {
        self.find_restaurant(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn find_restaurant(&self, id: &str) -> AppResult<Option<Restaurant>> {
        Ok(fetch_one(
            self.store.as_ref(),
            collections::RESTAURANTS,
            &Filter::all().eq("id", id),
        )
        .await?)
    }

    pub async fn list_menu(
        &self,
        restaurant_id: &str,
        category: Option<&str>,
    ) -> AppResult<Vec<MenuItem>> {
        let mut filter = Filter::all().eq("restaurant_id", restaurant_id);
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            filter = filter.eq("category", category);
        }
        Ok(fetch_many(self.store.as_ref(), collections::MENU_ITEMS, &filter).await?)
    }

    pub async fn get_menu_item(&self, id: &str) -> AppResult<Option<MenuItem>> {
        Ok(fetch_one(
            self.store.as_ref(),
            collections::MENU_ITEMS,
            &Filter::all().eq("id", id),
        )
        .await?)
    }
}
