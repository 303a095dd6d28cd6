//! Persisted id counters.

use std::sync::Arc;

use tracing::debug;

use crate::{
    domain::{
        carts::models::{CartId, CartItemId},
        products::models::ProductId,
    },
    storage::{
        CART_ID_COUNTER_KEY, CART_ITEM_ID_COUNTER_KEY, KeyValueStore, PRODUCT_ID_COUNTER_KEY,
        StorageError,
    },
};

/// Allocates monotonically increasing ids from counters kept in a
/// [`KeyValueStore`].
///
/// Each allocation is a plain read-increment-write of the stored counter, so
/// two writers sharing a store can hand out the same id.
#[derive(Debug, Clone)]
pub struct IdSequencer {
    store: Arc<dyn KeyValueStore>,
}

impl IdSequencer {
    /// Sequencer over the counters in `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Allocate the next cart id.
    ///
    /// # Errors
    ///
    /// Returns an error when the counter cannot be read or written, or has
    /// reached `u64::MAX`.
    pub fn next_cart_id(&self) -> Result<CartId, StorageError> {
        self.next(CART_ID_COUNTER_KEY).map(CartId::new)
    }

    /// Allocate the next cart item id.
    ///
    /// # Errors
    ///
    /// Returns an error when the counter cannot be read or written, or has
    /// reached `u64::MAX`.
    pub fn next_cart_item_id(&self) -> Result<CartItemId, StorageError> {
        self.next(CART_ITEM_ID_COUNTER_KEY).map(CartItemId::new)
    }

    /// Allocate the next product id.
    ///
    /// # Errors
    ///
    /// Returns an error when the counter cannot be read or written, or has
    /// reached `u64::MAX`.
    pub fn next_product_id(&self) -> Result<ProductId, StorageError> {
        self.next(PRODUCT_ID_COUNTER_KEY).map(ProductId::new)
    }

    /// Overwrite the product counter.
    ///
    /// # Errors
    ///
    /// Returns an error when the counter cannot be written.
    pub fn set_product_counter(&self, value: u64) -> Result<(), StorageError> {
        self.store.set(PRODUCT_ID_COUNTER_KEY, &value.to_string())
    }

    /// Drop both cart counters so the next ids start again from 1.
    ///
    /// # Errors
    ///
    /// Returns an error when a counter cannot be removed.
    pub fn reset_cart_counters(&self) -> Result<(), StorageError> {
        self.store.remove(CART_ID_COUNTER_KEY)?;
        self.store.remove(CART_ITEM_ID_COUNTER_KEY)
    }

    /// Drop the product counter.
    ///
    /// # Errors
    ///
    /// Returns an error when the counter cannot be removed.
    pub fn reset_product_counter(&self) -> Result<(), StorageError> {
        self.store.remove(PRODUCT_ID_COUNTER_KEY)
    }

    fn next(&self, key: &str) -> Result<u64, StorageError> {
        let current = self
            .store
            .get(key)?
            .as_deref()
            .map_or(0, parse_counter);

        let next = current
            .checked_add(1)
            .ok_or_else(|| StorageError::CounterExhausted {
                key: key.to_string(),
            })?;

        self.store.set(key, &next.to_string())?;

        debug!(counter = key, id = next, "allocated id");

        Ok(next)
    }
}

/// Unreadable counters count as zero.
fn parse_counter(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::storage::MemoryStore;

    use super::*;

    fn sequencer() -> (Arc<MemoryStore>, IdSequencer) {
        let store = Arc::new(MemoryStore::new());

        (store.clone(), IdSequencer::new(store))
    }

    #[test]
    fn starts_at_one_when_counter_absent() -> TestResult {
        let (_, sequencer) = sequencer();

        assert_eq!(sequencer.next_cart_id()?, CartId::new(1));
        assert_eq!(sequencer.next_cart_item_id()?, CartItemId::new(1));

        Ok(())
    }

    #[test]
    fn continues_from_stored_counter() -> TestResult {
        let (store, sequencer) = sequencer();
        store.set(CART_ID_COUNTER_KEY, "41")?;

        let ids = (0..5)
            .map(|_| sequencer.next_cart_id().map(CartId::get))
            .collect::<Result<Vec<_>, _>>()?;

        assert_eq!(ids, vec![42, 43, 44, 45, 46]);
        assert_eq!(store.get(CART_ID_COUNTER_KEY)?.as_deref(), Some("46"));

        Ok(())
    }

    #[test]
    fn corrupted_counter_reads_as_zero() -> TestResult {
        let (store, sequencer) = sequencer();
        store.set(CART_ITEM_ID_COUNTER_KEY, "not-a-number")?;

        assert_eq!(sequencer.next_cart_item_id()?, CartItemId::new(1));

        Ok(())
    }

    #[test]
    fn counters_are_independent() -> TestResult {
        let (_, sequencer) = sequencer();

        sequencer.next_cart_id()?;
        sequencer.next_cart_id()?;

        assert_eq!(sequencer.next_cart_item_id()?, CartItemId::new(1));
        assert_eq!(sequencer.next_product_id()?, ProductId::new(1));

        Ok(())
    }

    #[test]
    fn reset_restarts_cart_counters() -> TestResult {
        let (_, sequencer) = sequencer();

        sequencer.next_cart_id()?;
        sequencer.next_cart_item_id()?;
        sequencer.reset_cart_counters()?;

        assert_eq!(sequencer.next_cart_id()?, CartId::new(1));
        assert_eq!(sequencer.next_cart_item_id()?, CartItemId::new(1));

        Ok(())
    }

    #[test]
    fn exhausted_counter_fails_instead_of_repeating() -> TestResult {
        let (store, sequencer) = sequencer();
        store.set(CART_ID_COUNTER_KEY, &(u64::MAX - 1).to_string())?;

        assert_eq!(sequencer.next_cart_id()?, CartId::new(u64::MAX));

        let result = sequencer.next_cart_id();

        assert!(
            matches!(result, Err(StorageError::CounterExhausted { ref key }) if key == CART_ID_COUNTER_KEY),
            "unexpected result: {result:?}"
        );
        assert_eq!(
            store.get(CART_ID_COUNTER_KEY)?,
            Some(u64::MAX.to_string()),
            "counter is left untouched"
        );

        Ok(())
    }
}
