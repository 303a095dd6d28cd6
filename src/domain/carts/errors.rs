//! Carts service errors.

use thiserror::Error;

use crate::{
    domain::{
        carts::models::{CartId, CartItemId},
        products::models::ProductId,
    },
    storage::StorageError,
};

/// Cart engine error variants.
#[derive(Debug, Error)]
pub enum CartsServiceError {
    /// No cart has the given id.
    #[error("Cart with ID {0} not found")]
    CartNotFound(CartId),

    /// The cart holds no item with the given id.
    #[error("Cart item with ID {item} not found in cart {cart}")]
    CartItemNotFound {
        /// Cart that was searched.
        cart: CartId,
        /// Item that was not found.
        item: CartItemId,
    },

    /// Product lookup returned nothing or failed.
    #[error("Product with ID {0} not found")]
    ProductNotFound(ProductId),

    /// Requested (or merged) quantity is above the product's stock.
    #[error(
        "Not enough stock. Available: {available}{}",
        .requested.map_or_else(String::new, |requested| format!(", requested: {requested}"))
    )]
    InsufficientStock {
        /// Current stock of the product.
        available: u32,
        /// Merged quantity, when adding to an existing line.
        requested: Option<u32>,
    },

    /// Quantity below one.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    /// Underlying storage error.
    #[error("storage error")]
    Storage(#[from] StorageError),
}
