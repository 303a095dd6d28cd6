//! Cart Items Repository

use std::sync::Arc;

use crate::{
    domain::carts::models::{CartId, CartItem},
    storage::{CART_ITEMS_KEY, KeyValueStore, StorageError, load_collection, save_collection},
};

#[derive(Debug, Clone)]
pub(crate) struct CartItemsRepository {
    store: Arc<dyn KeyValueStore>,
}

impl CartItemsRepository {
    #[must_use]
    pub(crate) fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub(crate) fn all_items(&self) -> Result<Vec<CartItem>, StorageError> {
        load_collection(self.store.as_ref(), CART_ITEMS_KEY)
    }

    pub(crate) fn save_items(&self, items: &[CartItem]) -> Result<(), StorageError> {
        save_collection(self.store.as_ref(), CART_ITEMS_KEY, items)
    }

    pub(crate) fn get_cart_items(&self, cart: CartId) -> Result<Vec<CartItem>, StorageError> {
        let mut items = self.all_items()?;
        items.retain(|item| item.cart_id == cart);

        Ok(items)
    }

    pub(crate) fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(CART_ITEMS_KEY)
    }

    pub(crate) fn raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.store.get(key)
    }
}
