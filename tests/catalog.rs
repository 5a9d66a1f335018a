mod common;

use food_ordering_api::{
    error::AppError,
    services::seed_service::{bundled_catalog, seed_catalog},
    store::{Filter, collections},
};

#[tokio::test]
async fn bundled_catalog_parses() -> anyhow::Result<()> {
    let catalog = bundled_catalog()?;
    assert_eq!(catalog.restaurants.len(), 6);
    assert_eq!(catalog.menu_items.len(), 19);
    assert!(catalog.menu_items.iter().all(|item| {
        catalog
            .restaurants
            .iter()
            .any(|r| r.id == item.restaurant_id)
    }));
    Ok(())
}

#[tokio::test]
async fn seeding_twice_is_a_no_op() -> anyhow::Result<()> {
    let state = common::memory_state();

    let first = seed_catalog(state.store.as_ref()).await?;
    assert!(first.seeded);
    assert_eq!(first.restaurants, 6);

    let second = seed_catalog(state.store.as_ref()).await?;
    assert!(!second.seeded);
    assert_eq!(second.restaurants, 6);
    assert_eq!(second.menu_items, 19);

    let menu_items = state.store.count(collections::MENU_ITEMS, &Filter::all()).await?;
    assert_eq!(menu_items, 19);
    Ok(())
}

#[tokio::test]
async fn search_matches_name_or_description_ignoring_case() -> anyhow::Result<()> {
    let state = common::memory_state();
    seed_catalog(state.store.as_ref()).await?;

    let by_name = state.catalog.list_restaurants(Some("PIZZA"), None).await?;
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Pizza Paradise");

    let mut by_description: Vec<String> = state
        .catalog
        .list_restaurants(Some("authentic"), None)
        .await?
        .into_iter()
        .map(|r| r.id)
        .collect();
    by_description.sort();
    assert_eq!(by_description, vec!["rest2", "rest4"]);

    let everything = state.catalog.list_restaurants(Some(""), None).await?;
    assert_eq!(everything.len(), 6);
    Ok(())
}

#[tokio::test]
async fn cuisine_filter_is_exact_and_combines_with_search() -> anyhow::Result<()> {
    let state = common::memory_state();
    seed_catalog(state.store.as_ref()).await?;

    let italian = state.catalog.list_restaurants(None, Some("Italian")).await?;
    assert_eq!(italian.len(), 1);
    assert_eq!(italian[0].id, "rest2");

    let lowercase = state.catalog.list_restaurants(None, Some("italian")).await?;
    assert!(lowercase.is_empty());

    let both = state
        .catalog
        .list_restaurants(Some("sushi"), Some("Italian"))
        .await?;
    assert!(both.is_empty());
    Ok(())
}

#[tokio::test]
async fn menu_lists_by_restaurant_and_category() -> anyhow::Result<()> {
    let state = common::memory_state();
    seed_catalog(state.store.as_ref()).await?;

    let menu = state.catalog.list_menu("rest2", None).await?;
    assert_eq!(menu.len(), 3);
    assert!(menu.iter().all(|item| item.restaurant_id == "rest2"));

    let pizzas = state.catalog.list_menu("rest2", Some("Pizza")).await?;
    assert_eq!(pizzas.len(), 2);

    let none = state.catalog.list_menu("rest-unknown", None).await?;
    assert!(none.is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_restaurant_is_not_found() -> anyhow::Result<()> {
    let state = common::memory_state();
    seed_catalog(state.store.as_ref()).await?;

    let restaurant = state.catalog.get_restaurant("rest1").await?;
    assert_eq!(restaurant.name, "The Burger House");

    let err = state.catalog.get_restaurant("nope").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_seeding_inserts_catalog_once() -> anyhow::Result<()> {
    let state = common::memory_state();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let seeder = state.seeder.clone();
            tokio::spawn(async move { seeder.seed().await })
        })
        .collect();

    let mut seeded = 0;
    for handle in handles {
        if handle.await??.seeded {
            seeded += 1;
        }
    }
    assert_eq!(seeded, 1);
    assert_eq!(
        state.store.count(collections::RESTAURANTS, &Filter::all()).await?,
        6
    );
    Ok(())
}
