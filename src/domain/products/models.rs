//! Product Models

use serde::{Deserialize, Serialize};

use crate::ids::TypedId;

/// Product Id
pub type ProductId = TypedId<Product>;

/// Catalog product, as stored and as snapshotted into cart items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Sequenced product id.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: f64,
    /// Units available.
    pub stock: u32,
    /// Numeric category.
    pub category_id: u64,
    /// Category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Primary image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Gallery images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carousel_url: Option<Vec<String>>,
}

impl Product {
    /// Whether any units are available.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
