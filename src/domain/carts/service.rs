//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        carts::{
            data::AddCartItem,
            errors::CartsServiceError,
            models::{Cart, CartId, CartItem, CartItemId, CartTotal},
            repositories::{CartItemsRepository, CartsRepository},
        },
        products::{
            ProductLookup,
            models::{Product, ProductId},
        },
        session::models::UserId,
    },
    sequencer::IdSequencer,
    storage::{CART_ID_COUNTER_KEY, CART_ITEM_ID_COUNTER_KEY, KeyValueStore, StorageError},
};

/// Cart engine backed by whole-collection reads and writes of a
/// [`KeyValueStore`].
///
/// Every mutation reads the full collection, changes it in memory and writes
/// it back. Two overlapping mutations can therefore overwrite each other.
#[derive(Clone)]
pub struct LocalCartsService {
    carts_repository: CartsRepository,
    items_repository: CartItemsRepository,
    sequencer: IdSequencer,
    products: Arc<dyn ProductLookup>,
}

impl std::fmt::Debug for LocalCartsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalCartsService")
            .field("carts_repository", &self.carts_repository)
            .field("items_repository", &self.items_repository)
            .field("sequencer", &self.sequencer)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartExport {
    carts: Vec<Cart>,
    cart_items: Vec<CartItem>,
    cart_id_counter: Option<String>,
    cart_item_id_counter: Option<String>,
}

impl LocalCartsService {
    /// Engine over `store`, resolving products through `products`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, products: Arc<dyn ProductLookup>) -> Self {
        Self {
            carts_repository: CartsRepository::new(store.clone()),
            items_repository: CartItemsRepository::new(store.clone()),
            sequencer: IdSequencer::new(store),
            products,
        }
    }

    /// Any lookup failure is reported as the product being unknown.
    async fn resolve_product(&self, product: ProductId) -> Result<Product, CartsServiceError> {
        self.products.get_product(product).await.map_err(|error| {
            warn!(product_id = %product, %error, "product lookup failed");

            CartsServiceError::ProductNotFound(product)
        })
    }

    fn with_items(&self, mut cart: Cart) -> Result<Cart, StorageError> {
        cart.items = self.items_repository.get_cart_items(cart.cart_id)?;

        Ok(cart)
    }
}

#[async_trait]
impl CartsService for LocalCartsService {
    fn create_cart(&self, user: UserId) -> Result<Cart, CartsServiceError> {
        let mut carts = self.carts_repository.all_carts()?;
        let cart_id = self.sequencer.next_cart_id()?;

        let cart = Cart {
            cart_id,
            user_id: user,
            items: Vec::new(),
        };

        carts.push(cart.clone());
        self.carts_repository.save_carts(&carts)?;

        info!(cart_id = %cart_id, user_id = %user, "created cart");

        Ok(cart)
    }

    fn find_cart_by_user_id(&self, user: UserId) -> Result<Option<Cart>, CartsServiceError> {
        let cart = self
            .carts_repository
            .all_carts()?
            .into_iter()
            .find(|cart| cart.user_id == user);

        debug!(user_id = %user, found = cart.is_some(), "looked up cart by user");

        Ok(cart.map(|cart| self.with_items(cart)).transpose()?)
    }

    fn get_or_create_cart(&self, user: UserId) -> Result<Cart, CartsServiceError> {
        match self.find_cart_by_user_id(user)? {
            Some(cart) => Ok(cart),
            None => self.create_cart(user),
        }
    }

    fn find_cart_by_id(&self, cart: CartId) -> Result<Option<Cart>, CartsServiceError> {
        let found = self
            .carts_repository
            .all_carts()?
            .into_iter()
            .find(|candidate| candidate.cart_id == cart);

        Ok(found.map(|cart| self.with_items(cart)).transpose()?)
    }

    async fn add_item(
        &self,
        cart: CartId,
        item: AddCartItem,
    ) -> Result<CartItem, CartsServiceError> {
        if item.quantity < 1 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        if self.find_cart_by_id(cart)?.is_none() {
            return Err(CartsServiceError::CartNotFound(cart));
        }

        let product = self.resolve_product(item.product_id).await?;

        if item.quantity > product.stock {
            warn!(
                cart_id = %cart,
                product_id = %item.product_id,
                quantity = item.quantity,
                available = product.stock,
                "rejected add: not enough stock"
            );

            return Err(CartsServiceError::InsufficientStock {
                available: product.stock,
                requested: None,
            });
        }

        let mut items = self.items_repository.all_items()?;

        if let Some(existing) = items
            .iter_mut()
            .find(|existing| existing.cart_id == cart && existing.product_id == item.product_id)
        {
            let total = existing.quantity.saturating_add(item.quantity);

            if total > product.stock {
                warn!(
                    cart_id = %cart,
                    product_id = %item.product_id,
                    quantity = total,
                    available = product.stock,
                    "rejected merge: not enough stock"
                );

                return Err(CartsServiceError::InsufficientStock {
                    available: product.stock,
                    requested: Some(total),
                });
            }

            existing.quantity = total;
            let merged = existing.clone();

            self.items_repository.save_items(&items)?;

            info!(
                cart_id = %cart,
                item_id = %merged.cart_item_id,
                quantity = total,
                "merged item into existing line"
            );

            return Ok(merged);
        }

        let cart_item_id = self.sequencer.next_cart_item_id()?;

        let created = CartItem {
            cart_item_id,
            cart_id: cart,
            product_id: item.product_id,
            quantity: item.quantity,
            product,
        };

        items.push(created.clone());
        self.items_repository.save_items(&items)?;

        info!(
            cart_id = %cart,
            item_id = %cart_item_id,
            product_id = %item.product_id,
            quantity = item.quantity,
            "added item to cart"
        );

        Ok(created)
    }

    async fn add_item_by_user_id(
        &self,
        user: UserId,
        item: AddCartItem,
    ) -> Result<CartItem, CartsServiceError> {
        let cart = self.get_or_create_cart(user)?;

        self.add_item(cart.cart_id, item).await
    }

    async fn update_item_quantity(
        &self,
        cart: CartId,
        item: CartItemId,
        quantity: u32,
    ) -> Result<CartItem, CartsServiceError> {
        if quantity < 1 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut items = self.items_repository.all_items()?;

        let Some(existing) = items
            .iter_mut()
            .find(|existing| existing.cart_id == cart && existing.cart_item_id == item)
        else {
            return Err(CartsServiceError::CartItemNotFound { cart, item });
        };

        let product = self.resolve_product(existing.product_id).await?;

        if quantity > product.stock {
            warn!(
                cart_id = %cart,
                item_id = %item,
                quantity,
                available = product.stock,
                "rejected quantity update: not enough stock"
            );

            return Err(CartsServiceError::InsufficientStock {
                available: product.stock,
                requested: None,
            });
        }

        existing.quantity = quantity;
        existing.product = product;
        let updated = existing.clone();

        self.items_repository.save_items(&items)?;

        info!(cart_id = %cart, item_id = %item, quantity, "updated item quantity");

        Ok(updated)
    }

    fn remove_item(&self, cart: CartId, item: CartItemId) -> Result<(), CartsServiceError> {
        let items = self.items_repository.all_items()?;
        let before = items.len();

        let remaining: Vec<CartItem> = items
            .into_iter()
            .filter(|existing| !(existing.cart_id == cart && existing.cart_item_id == item))
            .collect();

        if remaining.len() == before {
            return Err(CartsServiceError::CartItemNotFound { cart, item });
        }

        self.items_repository.save_items(&remaining)?;

        info!(cart_id = %cart, item_id = %item, "removed item from cart");

        Ok(())
    }

    fn clear_cart(&self, cart: CartId) -> Result<(), CartsServiceError> {
        let mut items = self.items_repository.all_items()?;
        items.retain(|item| item.cart_id != cart);

        self.items_repository.save_items(&items)?;

        info!(cart_id = %cart, "cleared cart");

        Ok(())
    }

    fn remove_cart(&self, cart: CartId) -> Result<(), CartsServiceError> {
        let carts = self.carts_repository.all_carts()?;
        let before = carts.len();

        let remaining: Vec<Cart> = carts
            .into_iter()
            .filter(|existing| existing.cart_id != cart)
            .collect();

        if remaining.len() == before {
            return Err(CartsServiceError::CartNotFound(cart));
        }

        self.clear_cart(cart)?;
        self.carts_repository.save_carts(&remaining)?;

        info!(cart_id = %cart, "removed cart");

        Ok(())
    }

    fn get_cart_total(&self, cart: CartId) -> Result<CartTotal, CartsServiceError> {
        let total = self
            .find_cart_by_id(cart)?
            .map_or_else(CartTotal::default, |cart| CartTotal::from_items(&cart.items));

        Ok(total)
    }

    fn clear_all_cart_data(&self) -> Result<(), CartsServiceError> {
        self.carts_repository.clear()?;
        self.items_repository.clear()?;
        self.sequencer.reset_cart_counters()?;

        info!("cleared all cart data");

        Ok(())
    }

    fn export_cart_data(&self) -> Result<String, CartsServiceError> {
        let export = CartExport {
            carts: self.carts_repository.all_carts()?,
            cart_items: self.items_repository.all_items()?,
            cart_id_counter: self.items_repository.raw(CART_ID_COUNTER_KEY)?,
            cart_item_id_counter: self.items_repository.raw(CART_ITEM_ID_COUNTER_KEY)?,
        };

        serde_json::to_string_pretty(&export).map_err(|source| {
            StorageError::Encode {
                key: "cart export".to_string(),
                source,
            }
            .into()
        })
    }
}

/// Cart engine operations.
#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Creates a new empty cart for the user.
    ///
    /// Does not check whether the user already has one.
    ///
    /// # Errors
    ///
    /// Returns an error when the carts or the counter cannot be written.
    fn create_cart(&self, user: UserId) -> Result<Cart, CartsServiceError>;

    /// First cart belonging to the user, with its items loaded.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be read.
    fn find_cart_by_user_id(&self, user: UserId) -> Result<Option<Cart>, CartsServiceError>;

    /// The user's cart, creating one when none exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be read or written.
    fn get_or_create_cart(&self, user: UserId) -> Result<Cart, CartsServiceError>;

    /// Retrieve a single cart with its items loaded.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be read.
    fn find_cart_by_id(&self, cart: CartId) -> Result<Option<Cart>, CartsServiceError>;

    /// Add units of a product to the cart, merging with an existing line for
    /// the same product.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::InvalidQuantity`] for zero units,
    /// [`CartsServiceError::CartNotFound`], [`CartsServiceError::ProductNotFound`],
    /// [`CartsServiceError::InsufficientStock`] when the new or merged
    /// quantity exceeds stock, or a storage error.
    async fn add_item(
        &self,
        cart: CartId,
        item: AddCartItem,
    ) -> Result<CartItem, CartsServiceError>;

    /// Add an item to the user's cart, creating the cart when needed.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`CartsService::add_item`].
    async fn add_item_by_user_id(
        &self,
        user: UserId,
        item: AddCartItem,
    ) -> Result<CartItem, CartsServiceError>;

    /// Set the quantity of an item, re-checking stock and refreshing its
    /// product snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::InvalidQuantity`] for zero,
    /// [`CartsServiceError::CartItemNotFound`], [`CartsServiceError::ProductNotFound`],
    /// [`CartsServiceError::InsufficientStock`], or a storage error.
    async fn update_item_quantity(
        &self,
        cart: CartId,
        item: CartItemId,
        quantity: u32,
    ) -> Result<CartItem, CartsServiceError>;

    /// Removes a single item from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::CartItemNotFound`] when the cart holds no
    /// such item, or a storage error.
    fn remove_item(&self, cart: CartId, item: CartItemId) -> Result<(), CartsServiceError>;

    /// Removes every item of the cart. The cart itself is not checked.
    ///
    /// # Errors
    ///
    /// Returns an error when the items cannot be read or written.
    fn clear_cart(&self, cart: CartId) -> Result<(), CartsServiceError>;

    /// Deletes a cart together with its items.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::CartNotFound`] for unknown carts, or a
    /// storage error.
    fn remove_cart(&self, cart: CartId) -> Result<(), CartsServiceError>;

    /// Item count and amount of the cart; zero for unknown carts.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be read.
    fn get_cart_total(&self, cart: CartId) -> Result<CartTotal, CartsServiceError>;

    /// Drops every cart, item and cart counter.
    ///
    /// # Errors
    ///
    /// Returns an error when a key cannot be removed.
    fn clear_all_cart_data(&self) -> Result<(), CartsServiceError>;

    /// Pretty-printed JSON dump of carts, items and counters.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be read.
    fn export_cart_data(&self) -> Result<String, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::{MockProductLookup, ProductsServiceError},
        storage::{CART_ITEMS_KEY, MemoryStore},
        test::{TestContext, helpers::add},
    };

    use super::*;

    #[tokio::test]
    async fn create_cart_assigns_sequential_ids() -> TestResult {
        let ctx = TestContext::new()?;

        let first = ctx.carts.create_cart(UserId::new(1))?;
        let second = ctx.carts.create_cart(UserId::new(2))?;

        assert_eq!(first.cart_id, CartId::new(1));
        assert_eq!(first.user_id, UserId::new(1));
        assert!(first.items.is_empty());
        assert_eq!(second.cart_id, CartId::new(2));
        assert_eq!(second.user_id, UserId::new(2));

        Ok(())
    }

    #[tokio::test]
    async fn create_cart_twice_for_same_user_keeps_first_as_authoritative() -> TestResult {
        let ctx = TestContext::new()?;

        let first = ctx.carts.create_cart(UserId::new(1))?;
        let second = ctx.carts.create_cart(UserId::new(1))?;

        assert_ne!(first.cart_id, second.cart_id);

        let found = ctx.carts.find_cart_by_user_id(UserId::new(1))?;

        assert_eq!(found.map(|cart| cart.cart_id), Some(first.cart_id));

        Ok(())
    }

    #[tokio::test]
    async fn get_or_create_reuses_existing_cart() -> TestResult {
        let ctx = TestContext::new()?;

        let created = ctx.carts.get_or_create_cart(UserId::new(5))?;
        let reused = ctx.carts.get_or_create_cart(UserId::new(5))?;

        assert_eq!(created.cart_id, reused.cart_id);

        Ok(())
    }

    #[tokio::test]
    async fn find_cart_by_unknown_user_returns_none() -> TestResult {
        let ctx = TestContext::new()?;

        assert!(ctx.carts.find_cart_by_user_id(UserId::new(9))?.is_none());
        assert!(ctx.carts.find_cart_by_id(CartId::new(9))?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn adding_item_snapshots_product() -> TestResult {
        let ctx = TestContext::new()?;
        let cart = ctx.carts.create_cart(UserId::new(1))?;

        let item = add(&ctx, cart.cart_id, 1, 2).await?;

        assert_eq!(item.cart_item_id, CartItemId::new(1));
        assert_eq!(item.quantity, 2);
        assert_eq!(item.product.name, "Classic Black T-Shirt");

        let total = ctx.carts.get_cart_total(cart.cart_id)?;

        assert_eq!(total.item_count, 2);
        assert!((total.total - 59.98).abs() < 1e-9, "got {}", total.total);

        Ok(())
    }

    #[tokio::test]
    async fn adding_same_product_twice_merges_quantities() -> TestResult {
        let ctx = TestContext::new()?;
        let cart = ctx.carts.create_cart(UserId::new(1))?;

        let first = add(&ctx, cart.cart_id, 1, 2).await?;
        let merged = add(&ctx, cart.cart_id, 1, 3).await?;

        assert_eq!(first.cart_item_id, merged.cart_item_id);
        assert_eq!(merged.quantity, 5);

        let loaded = ctx.carts.find_cart_by_id(cart.cart_id)?;

        assert_eq!(loaded.map(|cart| cart.items.len()), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn merge_beyond_stock_reports_requested_total() -> TestResult {
        let ctx = TestContext::new()?;
        let cart = ctx.carts.create_cart(UserId::new(1))?;

        add(&ctx, cart.cart_id, 1, 5).await?;
        let result = add(&ctx, cart.cart_id, 1, 8).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::InsufficientStock {
                    available: 10,
                    requested: Some(13)
                })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        let loaded = ctx.carts.find_cart_by_id(cart.cart_id)?;

        assert_eq!(
            loaded.and_then(|cart| cart.items.first().map(|item| item.quantity)),
            Some(5),
            "failed merge must not change the stored quantity"
        );

        Ok(())
    }

    #[tokio::test]
    async fn adding_more_than_stock_is_rejected() -> TestResult {
        let ctx = TestContext::new()?;
        let cart = ctx.carts.create_cart(UserId::new(1))?;

        let result = add(&ctx, cart.cart_id, 1, 11).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::InsufficientStock {
                    available: 10,
                    requested: None
                })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn adding_zero_quantity_is_rejected() -> TestResult {
        let ctx = TestContext::new()?;
        let cart = ctx.carts.create_cart(UserId::new(1))?;

        let result = add(&ctx, cart.cart_id, 1, 0).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn adding_to_unknown_cart_returns_cart_not_found() -> TestResult {
        let ctx = TestContext::new()?;

        let result = add(&ctx, CartId::new(77), 1, 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::CartNotFound(id)) if id == CartId::new(77)),
            "expected CartNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn adding_unknown_product_returns_product_not_found() -> TestResult {
        let ctx = TestContext::new()?;
        let cart = ctx.carts.create_cart(UserId::new(1))?;

        let result = add(&ctx, cart.cart_id, 404, 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound(id)) if id == ProductId::new(404)),
            "expected ProductNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn failing_lookup_is_reported_as_product_not_found() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let mut lookup = MockProductLookup::new();

        lookup.expect_get_product().returning(|_| {
            Err(ProductsServiceError::Storage(StorageError::Unavailable(
                "offline".to_string(),
            )))
        });

        let carts = LocalCartsService::new(store, Arc::new(lookup));
        let cart = carts.create_cart(UserId::new(1))?;

        let result = carts
            .add_item(
                cart.cart_id,
                AddCartItem {
                    product_id: ProductId::new(1),
                    quantity: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound(_))),
            "expected ProductNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_by_user_creates_cart_lazily() -> TestResult {
        let ctx = TestContext::new()?;

        let item = ctx
            .carts
            .add_item_by_user_id(
                UserId::new(3),
                AddCartItem {
                    product_id: ProductId::new(2),
                    quantity: 1,
                },
            )
            .await?;

        let cart = ctx.carts.find_cart_by_user_id(UserId::new(3))?;

        assert_eq!(cart.as_ref().map(|cart| cart.cart_id), Some(item.cart_id));
        assert_eq!(cart.map(|cart| cart.items), Some(vec![item]));

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_validates_input_and_item() -> TestResult {
        let ctx = TestContext::new()?;
        let cart = ctx.carts.create_cart(UserId::new(1))?;
        let item = add(&ctx, cart.cart_id, 1, 1).await?;

        let zero = ctx
            .carts
            .update_item_quantity(cart.cart_id, item.cart_item_id, 0)
            .await;
        let missing = ctx
            .carts
            .update_item_quantity(cart.cart_id, CartItemId::new(999), 2)
            .await;

        assert!(
            matches!(zero, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {zero:?}"
        );
        assert!(
            matches!(missing, Err(CartsServiceError::CartItemNotFound { item, .. }) if item == CartItemId::new(999)),
            "expected CartItemNotFound, got {missing:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_item_of_other_cart_is_not_found() -> TestResult {
        let ctx = TestContext::new()?;
        let cart_a = ctx.carts.create_cart(UserId::new(1))?;
        let cart_b = ctx.carts.create_cart(UserId::new(2))?;
        let item = add(&ctx, cart_a.cart_id, 1, 1).await?;

        let result = ctx
            .carts
            .update_item_quantity(cart_b.cart_id, item.cart_item_id, 2)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::CartItemNotFound { .. })),
            "expected CartItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_refreshes_product_snapshot() -> TestResult {
        let ctx = TestContext::new()?;
        let cart = ctx.carts.create_cart(UserId::new(1))?;
        let item = add(&ctx, cart.cart_id, 1, 1).await?;

        ctx.set_price(1, 35.0)?;

        let updated = ctx
            .carts
            .update_item_quantity(cart.cart_id, item.cart_item_id, 3)
            .await?;

        assert_eq!(updated.quantity, 3);
        assert!((updated.product.price - 35.0).abs() < f64::EPSILON);

        let total = ctx.carts.get_cart_total(cart.cart_id)?;

        assert!((total.total - 105.0).abs() < 1e-9, "got {}", total.total);

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_beyond_current_stock_is_rejected() -> TestResult {
        let ctx = TestContext::new()?;
        let cart = ctx.carts.create_cart(UserId::new(1))?;
        let item = add(&ctx, cart.cart_id, 1, 4).await?;

        ctx.products.update_product_stock(ProductId::new(1), 3)?;

        let result = ctx
            .carts
            .update_item_quantity(cart.cart_id, item.cart_item_id, 4)
            .await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::InsufficientStock {
                    available: 3,
                    requested: None
                })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_of_deleted_product_fails() -> TestResult {
        let ctx = TestContext::new()?;
        let cart = ctx.carts.create_cart(UserId::new(1))?;
        let item = add(&ctx, cart.cart_id, 2, 1).await?;

        ctx.products.delete_product(ProductId::new(2))?;

        let result = ctx
            .carts
            .update_item_quantity(cart.cart_id, item.cart_item_id, 2)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound(_))),
            "expected ProductNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn removing_item_twice_returns_not_found() -> TestResult {
        let ctx = TestContext::new()?;
        let cart = ctx.carts.create_cart(UserId::new(1))?;
        let item = add(&ctx, cart.cart_id, 1, 1).await?;

        ctx.carts.remove_item(cart.cart_id, item.cart_item_id)?;

        let loaded = ctx.carts.find_cart_by_id(cart.cart_id)?;

        assert_eq!(loaded.map(|cart| cart.items.len()), Some(0));

        let result = ctx.carts.remove_item(cart.cart_id, item.cart_item_id);

        assert!(
            matches!(result, Err(CartsServiceError::CartItemNotFound { .. })),
            "expected CartItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn clearing_empty_or_unknown_cart_is_not_an_error() -> TestResult {
        let ctx = TestContext::new()?;
        let cart = ctx.carts.create_cart(UserId::new(1))?;

        ctx.carts.clear_cart(cart.cart_id)?;
        ctx.carts.clear_cart(CartId::new(500))?;

        Ok(())
    }

    #[tokio::test]
    async fn remove_cart_cascades_to_items() -> TestResult {
        let ctx = TestContext::new()?;
        let cart = ctx.carts.create_cart(UserId::new(1))?;
        add(&ctx, cart.cart_id, 1, 1).await?;
        add(&ctx, cart.cart_id, 2, 1).await?;

        ctx.carts.remove_cart(cart.cart_id)?;

        assert!(ctx.carts.find_cart_by_id(cart.cart_id)?.is_none());

        let orphaned = ctx.all_items()?.iter().any(|item| item.cart_id == cart.cart_id);

        assert!(!orphaned, "no item of a removed cart may remain");

        let result = ctx.carts.remove_cart(cart.cart_id);

        assert!(
            matches!(result, Err(CartsServiceError::CartNotFound(_))),
            "expected CartNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn total_of_unknown_cart_is_zero() -> TestResult {
        let ctx = TestContext::new()?;

        assert_eq!(ctx.carts.get_cart_total(CartId::new(1))?, CartTotal::default());

        Ok(())
    }

    #[tokio::test]
    async fn corrupt_items_surface_as_storage_error() -> TestResult {
        let ctx = TestContext::new()?;
        let cart = ctx.carts.create_cart(UserId::new(1))?;

        ctx.store.set(CART_ITEMS_KEY, "{not json")?;

        let result = ctx.carts.find_cart_by_id(cart.cart_id);

        assert!(
            matches!(
                result,
                Err(CartsServiceError::Storage(StorageError::Corrupt { .. }))
            ),
            "expected Storage(Corrupt), got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn export_and_clear_all_cart_data() -> TestResult {
        let ctx = TestContext::new()?;
        let cart = ctx.carts.create_cart(UserId::new(1))?;
        add(&ctx, cart.cart_id, 1, 1).await?;

        let dump: serde_json::Value = serde_json::from_str(&ctx.carts.export_cart_data()?)?;

        assert_eq!(dump["cartIdCounter"], "1");
        assert_eq!(dump["cartItems"][0]["productId"], 1);

        ctx.carts.clear_all_cart_data()?;

        let dump: serde_json::Value = serde_json::from_str(&ctx.carts.export_cart_data()?)?;

        assert_eq!(dump["carts"], serde_json::json!([]));
        assert!(dump["cartIdCounter"].is_null());
        assert_eq!(ctx.carts.create_cart(UserId::new(1))?.cart_id, CartId::new(1));

        Ok(())
    }
}
