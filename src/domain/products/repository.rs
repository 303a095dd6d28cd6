//! Products Repository

use std::sync::Arc;

use crate::{
    domain::products::models::Product,
    storage::{KeyValueStore, PRODUCTS_KEY, StorageError, load_collection, save_collection},
};

#[derive(Debug, Clone)]
pub(crate) struct ProductsRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ProductsRepository {
    #[must_use]
    pub(crate) fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub(crate) fn all_products(&self) -> Result<Vec<Product>, StorageError> {
        load_collection(self.store.as_ref(), PRODUCTS_KEY)
    }

    pub(crate) fn save_products(&self, products: &[Product]) -> Result<(), StorageError> {
        save_collection(self.store.as_ref(), PRODUCTS_KEY, products)
    }

    pub(crate) fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(PRODUCTS_KEY)
    }

    pub(crate) fn raw_counter(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.store.get(key)
    }
}
