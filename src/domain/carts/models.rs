//! Cart Models

use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        products::models::{Product, ProductId},
        session::models::UserId,
    },
    ids::TypedId,
};

/// Cart Id
pub type CartId = TypedId<Cart>;

/// Cart Item Id
pub type CartItemId = TypedId<CartItem>;

/// Cart Model
///
/// Items are persisted separately and attached on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Sequenced cart id.
    pub cart_id: CartId,
    /// Owning user.
    pub user_id: UserId,
    /// Items attached on read; empty in the stored record.
    #[serde(default)]
    pub items: Vec<CartItem>,
}

/// `CartItem` Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Sequenced item id.
    pub cart_item_id: CartItemId,
    /// Cart this line belongs to.
    pub cart_id: CartId,
    /// Product on this line.
    pub product_id: ProductId,
    /// Units on this line; at least one.
    pub quantity: u32,
    /// Product as observed at the last write of this item.
    pub product: Product,
}

impl CartItem {
    /// `quantity × price` for this line.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.product.price
    }
}

/// Cart totals derived from its items.
///
/// `total` is accumulated in `f64` without rounding, so repeated fractional
/// prices can carry binary floating-point error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotal {
    /// Sum of item quantities.
    pub item_count: u64,
    /// Sum of `quantity × price`.
    pub total: f64,
}

impl CartTotal {
    /// Totals over the given items.
    #[must_use]
    pub fn from_items(items: &[CartItem]) -> Self {
        items.iter().fold(Self::default(), |acc, item| Self {
            item_count: acc.item_count + u64::from(item.quantity),
            total: acc.total + item.line_total(),
        })
    }
}
