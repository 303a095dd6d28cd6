//! App Context

use std::{path::Path, sync::Arc};

use thiserror::Error;
use tokio::sync::watch;

use crate::{
    domain::{
        carts::{CartsService, LocalCartsService},
        products::LocalProductsService,
        session::{CartSession, Notifier, models::User},
    },
    storage::{FileStore, KeyValueStore, MemoryStore, StorageError},
};

/// Errors raised while building an [`AppContext`].
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The data store could not be opened.
    #[error("failed to open data store")]
    Storage(#[source] StorageError),
}

/// Services sharing one key-value store.
#[derive(Clone)]
pub struct AppContext {
    /// Store shared by every service.
    pub store: Arc<dyn KeyValueStore>,
    /// Local product catalog, also the carts' product lookup.
    pub products: Arc<LocalProductsService>,
    /// Cart engine.
    pub carts: Arc<dyn CartsService>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("store", &self.store)
            .field("products", &self.products)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context over an existing store.
    #[must_use]
    pub fn from_store(store: Arc<dyn KeyValueStore>) -> Self {
        let products = Arc::new(LocalProductsService::new(store.clone()));
        let carts = Arc::new(LocalCartsService::new(store.clone(), products.clone()));

        Self {
            store,
            products,
            carts,
        }
    }

    /// Build application context over a process-local store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    /// Build application context from a data directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the data directory cannot be created.
    pub fn from_data_dir(dir: &Path) -> Result<Self, AppInitError> {
        let store = FileStore::open(dir).map_err(AppInitError::Storage)?;

        Ok(Self::from_store(Arc::new(store)))
    }

    /// Cart session following the given auth signal.
    #[must_use]
    pub fn cart_session(
        &self,
        auth: watch::Receiver<Option<User>>,
        notifier: Arc<dyn Notifier>,
    ) -> CartSession {
        CartSession::new(self.carts.clone(), auth, notifier)
    }
}
