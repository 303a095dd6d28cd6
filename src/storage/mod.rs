//! Key-value persistence substrate.
//!
//! Collections are stored as whole JSON arrays under fixed keys and are always
//! read and written in full. There is no partial or indexed write.

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding every cart record.
pub const CARTS_KEY: &str = "vallmere_carts";

/// Key holding every cart item record.
pub const CART_ITEMS_KEY: &str = "vallmere_cart_items";

/// Key holding the last allocated cart id.
pub const CART_ID_COUNTER_KEY: &str = "vallmere_cart_id_counter";

/// Key holding the last allocated cart item id.
pub const CART_ITEM_ID_COUNTER_KEY: &str = "vallmere_cart_item_id_counter";

/// Key holding the local product catalog.
pub const PRODUCTS_KEY: &str = "vallmere_products";

/// Key holding the last allocated product id.
pub const PRODUCT_ID_COUNTER_KEY: &str = "vallmere_product_id_counter";

/// Storage error variants.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A stored value could not be decoded into the expected record shape.
    #[error("stored value for `{key}` is unreadable")]
    Corrupt {
        /// Key whose value failed to decode.
        key: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for storage.
    #[error("failed to encode value for `{key}`")]
    Encode {
        /// Key being written.
        key: String,
        /// Encoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The backing medium failed.
    #[error("storage I/O failed for `{key}`")]
    Io {
        /// Key (or location) being accessed.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An id counter has no value left to allocate.
    #[error("id counter `{key}` is exhausted")]
    CounterExhausted {
        /// Counter key.
        key: String,
    },

    /// The backend cannot be used at all.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// String key-value storage with whole-value overwrite semantics.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Absent keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Load the JSON array stored under `key`, or an empty collection when absent.
///
/// # Errors
///
/// Returns [`StorageError::Corrupt`] when the stored value does not decode
/// into `Vec<T>`, or a backend error when the read fails.
pub fn load_collection<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };

    serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
        key: key.to_string(),
        source,
    })
}

/// Overwrite the collection stored under `key`.
///
/// # Errors
///
/// Returns an error when encoding or the backend write fails.
pub fn save_collection<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    records: &[T],
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(records).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;

    store.set(key, &raw)
}
