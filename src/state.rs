use crate::{
    services::{
        account_service::AccountManager, cart_service::CartManager,
        catalog_service::CatalogReader, identity_service::IdentityService, locks::UserLocks,
        order_service::OrderBuilder, seed_service::CatalogSeeder,
    },
    store::Store,
};

/// Components wired around one explicitly opened store handle.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub identity: IdentityService,
    pub accounts: AccountManager,
    pub catalog: CatalogReader,
    pub carts: CartManager,
    pub orders: OrderBuilder,
    pub seeder: CatalogSeeder,
}

impl AppState {
    pub fn new(store: Store, identity: IdentityService) -> Self {
        let locks = UserLocks::new();
        let catalog = CatalogReader::new(store.clone());
        Self {
            accounts: AccountManager::new(store.clone(), identity.clone()),
            carts: CartManager::new(store.clone(), catalog.clone(), locks.clone()),
            orders: OrderBuilder::new(store.clone(), catalog.clone(), locks),
            seeder: CatalogSeeder::new(store.clone()),
            catalog,
            identity,
            store,
        }
    }
}
