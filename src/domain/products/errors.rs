//! Products service errors.

use thiserror::Error;

use crate::{domain::products::models::ProductId, storage::StorageError};

/// Errors raised by the product catalog.
#[derive(Debug, Error)]
pub enum ProductsServiceError {
    /// No product with this id is stored.
    #[error("Product with ID {0} not found")]
    NotFound(ProductId),

    /// Price is negative or not a finite number.
    #[error("invalid price value: {0}")]
    InvalidPrice(f64),

    /// The catalog could not be read or written.
    #[error("storage error")]
    Storage(#[from] StorageError),
}
