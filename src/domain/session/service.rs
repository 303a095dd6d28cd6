//! Cart session service.

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, error, warn};

use crate::domain::{
    carts::{
        CartsService, CartsServiceError,
        data::AddCartItem,
        models::{CartId, CartItem, CartItemId, CartTotal},
    },
    products::models::Product,
    session::{
        errors::CartSessionError,
        models::{CartState, User, UserId},
        notifications::{
            ADD_FAILED, AUTHENTICATION_REQUIRED, CART_ERROR, CART_UPDATED, CLEAR_FAILED, CLEARED,
            LOAD_FAILED, LOGIN_REQUIRED, Notifier, REMOVE_FAILED, REMOVED, UPDATE_FAILED, UPDATED,
        },
    },
};

/// Cart of the signed-in user, published as [`CartState`] snapshots.
///
/// Every successful mutation re-reads the whole cart from the engine instead
/// of patching local state; only [`CartSession::clear_cart`] updates locally.
/// `loading` goes `false → true → false` once per public call, and the final
/// transition is published together with the refreshed items.
pub struct CartSession {
    carts: Arc<dyn CartsService>,
    auth: watch::Receiver<Option<User>>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<CartState>,
}

impl std::fmt::Debug for CartSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartSession")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl CartSession {
    /// Anonymous session following `auth`; call [`CartSession::watch_auth`]
    /// or [`CartSession::load_cart`] to pick up the signed-in user.
    #[must_use]
    pub fn new(
        carts: Arc<dyn CartsService>,
        auth: watch::Receiver<Option<User>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(CartState::default());

        Self {
            carts,
            auth,
            notifier,
            state,
        }
    }

    /// Receive every published state snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// Items of the current snapshot.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.state.borrow().items.clone()
    }

    /// Whether an operation is in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Sum of item quantities in the current snapshot.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.state.borrow().total_items()
    }

    /// Sum of `quantity × price` in the current snapshot.
    #[must_use]
    pub fn total_amount(&self) -> f64 {
        self.state.borrow().total_amount()
    }

    /// Cart id of the session, once a cart exists.
    #[must_use]
    pub fn current_cart_id(&self) -> Option<CartId> {
        self.state.borrow().cart_id
    }

    /// Follow the auth signal until its sender is dropped.
    ///
    /// The current value is applied immediately.
    pub fn watch_auth(self: Arc<Self>) -> JoinHandle<()> {
        let mut auth = self.auth.clone();

        tokio::spawn(async move {
            loop {
                let user = auth.borrow_and_update().clone();
                self.handle_auth_change(user.as_ref());

                if auth.changed().await.is_err() {
                    debug!("auth signal closed");
                    break;
                }
            }
        })
    }

    /// Login loads the user's cart; logout forgets it.
    pub fn handle_auth_change(&self, user: Option<&User>) {
        if user.is_some() {
            self.load_cart();
        } else {
            self.state.send_modify(CartState::reset);
        }
    }

    /// Re-read the user's cart from the engine.
    pub fn refresh_cart(&self) {
        self.load_cart();
    }

    /// Load the signed-in user's cart. Does nothing without a user id.
    ///
    /// A missing cart is not created here; it appears on the first add.
    pub fn load_cart(&self) {
        if self.current_user_id().is_none() {
            return;
        }

        self.set_loading();
        self.refresh_state();
    }

    /// Add `quantity` units of `product` to the user's cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartSessionError::NotAuthenticated`] without a signed-in
    /// user, or the engine's error.
    pub async fn add_to_cart(
        &self,
        product: &Product,
        quantity: u32,
    ) -> Result<CartItem, CartSessionError> {
        let Some(user) = self.current_user_id() else {
            self.notifier.error(LOGIN_REQUIRED, AUTHENTICATION_REQUIRED);

            return Err(CartSessionError::NotAuthenticated);
        };

        self.set_loading();

        let result = self
            .carts
            .add_item_by_user_id(
                user,
                AddCartItem {
                    product_id: product.id,
                    quantity,
                },
            )
            .await;

        match result {
            Ok(item) => {
                self.refresh_state();
                self.notifier
                    .success(&format!("{} added to cart!", product.name), CART_UPDATED);

                Ok(item)
            }
            Err(failure) => Err(self.fail(failure, ADD_FAILED)),
        }
    }

    /// Set the quantity of an item. A quantity of zero removes the item.
    ///
    /// # Errors
    ///
    /// Returns [`CartSessionError::NoCartAvailable`] before a cart exists, or
    /// the engine's error.
    pub async fn update_quantity(
        &self,
        item: CartItemId,
        quantity: u32,
    ) -> Result<(), CartSessionError> {
        let cart = self.require_cart()?;

        if quantity < 1 {
            return self.remove_from_cart(item);
        }

        self.set_loading();

        match self.carts.update_item_quantity(cart, item, quantity).await {
            Ok(_) => {
                self.refresh_state();
                self.notifier.success(UPDATED, CART_UPDATED);

                Ok(())
            }
            Err(failure) => Err(self.fail(failure, UPDATE_FAILED)),
        }
    }

    /// Remove one item from the session's cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartSessionError::NoCartAvailable`] before a cart exists, or
    /// the engine's error.
    pub fn remove_from_cart(&self, item: CartItemId) -> Result<(), CartSessionError> {
        let cart = self.require_cart()?;

        self.set_loading();

        match self.carts.remove_item(cart, item) {
            Ok(()) => {
                self.refresh_state();
                self.notifier.success(REMOVED, CART_UPDATED);

                Ok(())
            }
            Err(failure) => Err(self.fail(failure, REMOVE_FAILED)),
        }
    }

    /// Empty the session's cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartSessionError::NoCartAvailable`] before a cart exists, or
    /// the engine's error.
    pub fn clear_cart(&self) -> Result<(), CartSessionError> {
        let cart = self.require_cart()?;

        self.set_loading();

        match self.carts.clear_cart(cart) {
            Ok(()) => {
                self.state.send_modify(|state| {
                    state.items.clear();
                    state.loading = false;
                });
                self.notifier.success(CLEARED, CART_UPDATED);

                Ok(())
            }
            Err(failure) => Err(self.fail(failure, CLEAR_FAILED)),
        }
    }

    /// Engine totals for the session's cart; zero before a cart exists.
    ///
    /// # Errors
    ///
    /// Returns the engine's error when the cart cannot be read.
    pub fn get_cart_total(&self) -> Result<CartTotal, CartSessionError> {
        let Some(cart) = self.current_cart_id() else {
            return Ok(CartTotal::default());
        };

        Ok(self.carts.get_cart_total(cart)?)
    }

    fn current_user_id(&self) -> Option<UserId> {
        self.auth.borrow().as_ref().and_then(|user| user.user_id)
    }

    fn require_cart(&self) -> Result<CartId, CartSessionError> {
        self.current_cart_id()
            .ok_or(CartSessionError::NoCartAvailable)
    }

    fn set_loading(&self) {
        self.state.send_modify(|state| state.loading = true);
    }

    /// Publish the engine's view of the user's cart and clear `loading`.
    fn refresh_state(&self) {
        let Some(user) = self.current_user_id() else {
            self.state.send_modify(|state| state.loading = false);

            return;
        };

        match self.carts.find_cart_by_user_id(user) {
            Ok(cart) => {
                debug!(
                    user_id = %user,
                    cart_id = ?cart.as_ref().map(|cart| cart.cart_id),
                    "loaded cart"
                );

                self.state.send_modify(|state| {
                    state.apply(cart);
                    state.loading = false;
                });
            }
            Err(failure) => {
                error!(user_id = %user, error = %failure, "failed to load cart");

                self.state.send_modify(|state| state.loading = false);
                self.notifier.error(LOAD_FAILED, CART_ERROR);
            }
        }
    }

    fn fail(&self, failure: CartsServiceError, fallback: &str) -> CartSessionError {
        warn!(error = %failure, "cart operation rejected");

        self.state.send_modify(|state| state.loading = false);

        let message = match &failure {
            CartsServiceError::Storage(_) => fallback.to_string(),
            other => other.to_string(),
        };

        self.notifier.error(&message, CART_ERROR);

        CartSessionError::Cart(failure)
    }
}
