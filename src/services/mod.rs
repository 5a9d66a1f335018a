pub mod account_service;
pub mod cart_service;
pub mod catalog_service;
pub mod identity_service;
pub mod locks;
pub mod order_service;
pub mod seed_service;
