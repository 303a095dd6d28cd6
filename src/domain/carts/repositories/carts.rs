//! Carts Repository

use std::sync::Arc;

use crate::{
    domain::carts::models::Cart,
    storage::{CARTS_KEY, KeyValueStore, StorageError, load_collection, save_collection},
};

#[derive(Debug, Clone)]
pub(crate) struct CartsRepository {
    store: Arc<dyn KeyValueStore>,
}

impl CartsRepository {
    #[must_use]
    pub(crate) fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub(crate) fn all_carts(&self) -> Result<Vec<Cart>, StorageError> {
        load_collection(self.store.as_ref(), CARTS_KEY)
    }

    pub(crate) fn save_carts(&self, carts: &[Cart]) -> Result<(), StorageError> {
        save_collection(self.store.as_ref(), CARTS_KEY, carts)
    }

    pub(crate) fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(CARTS_KEY)
    }
}
