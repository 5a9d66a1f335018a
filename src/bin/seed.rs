use food_ordering_api::{
    config::AppConfig, db::open_store, services::seed_service::seed_catalog,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let store = open_store(&config).await?;
    let outcome = seed_catalog(store.as_ref()).await;
    store.close().await;
    let outcome = outcome?;

    if outcome.seeded {
        println!(
            "Seeded {} restaurants and {} menu items",
            outcome.restaurants, outcome.menu_items
        );
    } else {
        println!(
            "Catalog already seeded ({} restaurants, {} menu items)",
            outcome.restaurants, outcome.menu_items
        );
    }
    Ok(())
}
