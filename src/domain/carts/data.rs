//! Cart Data

use crate::domain::products::models::ProductId;

/// Request to put `quantity` units of a product into a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddCartItem {
    /// Product to add.
    pub product_id: ProductId,
    /// Units to add; at least one.
    pub quantity: u32,
}
