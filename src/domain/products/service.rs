//! Products service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    domain::products::{
        data::{NewProduct, ProductUpdate, sample_products, validate_price},
        errors::ProductsServiceError,
        models::{Product, ProductId},
        repository::ProductsRepository,
    },
    sequencer::IdSequencer,
    storage::{KeyValueStore, PRODUCT_ID_COUNTER_KEY, StorageError},
};

/// Resolves products by id for the cart engine.
#[automock]
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Retrieve the current state of a single product.
    ///
    /// # Errors
    ///
    /// Returns [`ProductsServiceError::NotFound`] for unknown ids, or an
    /// error when the catalog cannot be read.
    async fn get_product(&self, product: ProductId) -> Result<Product, ProductsServiceError>;
}

/// Product catalog kept in the same key-value store as the carts.
#[derive(Debug, Clone)]
pub struct LocalProductsService {
    repository: ProductsRepository,
    sequencer: IdSequencer,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductExport {
    products: Vec<Product>,
    product_id_counter: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductImport {
    products: Vec<Product>,
    #[serde(default)]
    product_id_counter: Option<Value>,
}

impl LocalProductsService {
    /// Catalog over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            repository: ProductsRepository::new(store.clone()),
            sequencer: IdSequencer::new(store),
        }
    }

    /// Seed the sample catalog when no products are stored.
    ///
    /// Returns whether anything was written.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be read or written.
    pub fn initialize_sample_products(&self) -> Result<bool, ProductsServiceError> {
        if !self.repository.all_products()?.is_empty() {
            return Ok(false);
        }

        let samples = sample_products();
        let last_id = samples.iter().map(|p| p.id.get()).max().unwrap_or(0);

        self.repository.save_products(&samples)?;
        self.sequencer.set_product_counter(last_id)?;

        info!(count = samples.len(), "seeded sample products");

        Ok(true)
    }

    /// Every stored product.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be read.
    pub fn all_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        Ok(self.repository.all_products()?)
    }

    /// Find a product by id.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be read.
    pub fn get_product_by_id(
        &self,
        id: ProductId,
    ) -> Result<Option<Product>, ProductsServiceError> {
        Ok(self
            .repository
            .all_products()?
            .into_iter()
            .find(|product| product.id == id))
    }

    /// Store a new product under a freshly sequenced id.
    ///
    /// # Errors
    ///
    /// Returns [`ProductsServiceError::InvalidPrice`] for a negative or
    /// non-finite price, or an error when the catalog or counter cannot be
    /// written.
    pub fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        validate_price(product.price)?;

        let mut products = self.repository.all_products()?;
        let id = self.sequencer.next_product_id()?;
        let created = product.into_product(id);

        products.push(created.clone());
        self.repository.save_products(&products)?;

        info!(product_id = %id, "created product");

        Ok(created)
    }

    /// Apply a partial update. Returns `None` when the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ProductsServiceError::InvalidPrice`] for a negative or
    /// non-finite price, or an error when the catalog cannot be read or
    /// written.
    pub fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Option<Product>, ProductsServiceError> {
        if let Some(price) = update.price {
            validate_price(price)?;
        }

        let mut products = self.repository.all_products()?;

        let Some(product) = products.iter_mut().find(|product| product.id == id) else {
            return Ok(None);
        };

        update.apply(product);
        let updated = product.clone();

        self.repository.save_products(&products)?;

        info!(product_id = %id, "updated product");

        Ok(Some(updated))
    }

    /// Delete a product. Returns `false` when it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be read or written.
    pub fn delete_product(&self, id: ProductId) -> Result<bool, ProductsServiceError> {
        let products = self.repository.all_products()?;
        let before = products.len();

        let remaining: Vec<Product> = products
            .into_iter()
            .filter(|product| product.id != id)
            .collect();

        if remaining.len() == before {
            return Ok(false);
        }

        self.repository.save_products(&remaining)?;

        info!(product_id = %id, "deleted product");

        Ok(true)
    }

    /// Set the stock level of a product. Returns `false` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be read or written.
    pub fn update_product_stock(
        &self,
        id: ProductId,
        stock: u32,
    ) -> Result<bool, ProductsServiceError> {
        let updated = self.update_product(
            id,
            ProductUpdate {
                stock: Some(stock),
                ..ProductUpdate::default()
            },
        )?;

        Ok(updated.is_some())
    }

    /// Case-insensitive substring match over name, description and category.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be read.
    pub fn search_products(&self, query: &str) -> Result<Vec<Product>, ProductsServiceError> {
        let query = query.to_lowercase();
        let contains = |field: Option<&str>| {
            field.is_some_and(|value| value.to_lowercase().contains(&query))
        };

        Ok(self
            .repository
            .all_products()?
            .into_iter()
            .filter(|product| {
                contains(Some(product.name.as_str()))
                    || contains(product.description.as_deref())
                    || contains(product.category.as_deref())
            })
            .collect())
    }

    /// Products whose category equals `category`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be read.
    pub fn products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, ProductsServiceError> {
        let category = category.to_lowercase();

        Ok(self
            .repository
            .all_products()?
            .into_iter()
            .filter(|product| {
                product
                    .category
                    .as_deref()
                    .is_some_and(|value| value.to_lowercase() == category)
            })
            .collect())
    }

    /// Products priced within `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be read.
    pub fn products_in_price_range(
        &self,
        min: f64,
        max: f64,
    ) -> Result<Vec<Product>, ProductsServiceError> {
        Ok(self
            .repository
            .all_products()?
            .into_iter()
            .filter(|product| product.price >= min && product.price <= max)
            .collect())
    }

    /// Products with at least one unit of stock.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be read.
    pub fn products_in_stock(&self) -> Result<Vec<Product>, ProductsServiceError> {
        Ok(self
            .repository
            .all_products()?
            .into_iter()
            .filter(Product::in_stock)
            .collect())
    }

    /// Remove the catalog and its counter.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be written.
    pub fn clear_all_products(&self) -> Result<(), ProductsServiceError> {
        self.repository.clear()?;
        self.sequencer.reset_product_counter()?;

        Ok(())
    }

    /// Pretty-printed JSON dump of the catalog and its raw counter.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be read or encoded.
    pub fn export_product_data(&self) -> Result<String, ProductsServiceError> {
        let export = ProductExport {
            products: self.repository.all_products()?,
            product_id_counter: self.repository.raw_counter(PRODUCT_ID_COUNTER_KEY)?,
        };

        serde_json::to_string_pretty(&export).map_err(|source| {
            StorageError::Encode {
                key: "product export".to_string(),
                source,
            }
            .into()
        })
    }

    /// Replace the catalog from an exported dump.
    ///
    /// Returns `false`, leaving the catalog untouched, when `json` is not a
    /// valid dump.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be written.
    pub fn import_product_data(&self, json: &str) -> Result<bool, ProductsServiceError> {
        let import: ProductImport = match serde_json::from_str(json) {
            Ok(import) => import,
            Err(error) => {
                warn!(%error, "rejected product import");

                return Ok(false);
            }
        };

        if let Some(invalid) = import
            .products
            .iter()
            .find(|product| validate_price(product.price).is_err())
        {
            warn!(product_id = %invalid.id, price = invalid.price, "rejected product import");

            return Ok(false);
        }

        self.repository.save_products(&import.products)?;

        let counter = import.product_id_counter.and_then(|value| match value {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        });

        if let Some(counter) = counter {
            self.sequencer.set_product_counter(counter)?;
        }

        info!(count = import.products.len(), "imported products");

        Ok(true)
    }
}

#[async_trait]
impl ProductLookup for LocalProductsService {
    async fn get_product(&self, product: ProductId) -> Result<Product, ProductsServiceError> {
        debug!(product_id = %product, "looking up product");

        self.get_product_by_id(product)?
            .ok_or(ProductsServiceError::NotFound(product))
    }
}
