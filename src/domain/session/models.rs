//! Session Models

use crate::{
    domain::carts::models::{Cart, CartId, CartItem, CartTotal},
    ids::TypedId,
};

/// User Id
pub type UserId = TypedId<User>;

/// Signed-in user as published by the auth collaborator.
///
/// Only `user_id` is read by the cart session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Account id; absent for users the cart cannot be tied to.
    pub user_id: Option<UserId>,
    /// Sign-in email.
    pub email: String,
}

impl User {
    /// Signed-in user with an id.
    #[must_use]
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            email: email.into(),
        }
    }
}

/// Snapshot of a session's cart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    /// Items of the last successful read.
    pub items: Vec<CartItem>,
    /// Cart of the signed-in user, once one exists.
    pub cart_id: Option<CartId>,
    /// An operation is in flight.
    pub loading: bool,
}

impl CartState {
    /// Sum of item quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        CartTotal::from_items(&self.items).item_count
    }

    /// Sum of `quantity × price` over the items.
    #[must_use]
    pub fn total_amount(&self) -> f64 {
        CartTotal::from_items(&self.items).total
    }

    pub(crate) fn apply(&mut self, cart: Option<Cart>) {
        if let Some(cart) = cart {
            self.cart_id = Some(cart.cart_id);
            self.items = cart.items;
        } else {
            self.cart_id = None;
            self.items.clear();
        }
    }

    pub(crate) fn reset(&mut self) {
        self.items.clear();
        self.cart_id = None;
    }
}
