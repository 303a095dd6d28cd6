//! User-facing notifications.

use mockall::automock;
use tracing::{info, warn};

pub(crate) const CART_UPDATED: &str = "Cart Updated";
pub(crate) const CART_ERROR: &str = "Cart Error";
pub(crate) const AUTHENTICATION_REQUIRED: &str = "Authentication Required";

pub(crate) const LOGIN_REQUIRED: &str = "Please log in to add items to cart";
pub(crate) const LOAD_FAILED: &str = "Error loading cart";
pub(crate) const UPDATED: &str = "Cart updated successfully";
pub(crate) const REMOVED: &str = "Item removed from cart";
pub(crate) const CLEARED: &str = "Cart cleared successfully";

pub(crate) const ADD_FAILED: &str = "Failed to add item to cart";
pub(crate) const UPDATE_FAILED: &str = "Failed to update cart";
pub(crate) const REMOVE_FAILED: &str = "Failed to remove item from cart";
pub(crate) const CLEAR_FAILED: &str = "Failed to clear cart";

/// Toast-style notification sink.
#[automock]
pub trait Notifier: Send + Sync {
    /// Report a successful operation.
    fn success(&self, message: &str, title: &str);

    /// Report a failed operation.
    fn error(&self, message: &str, title: &str);
}

/// Emits notifications as log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str, title: &str) {
        info!(title, "{message}");
    }

    fn error(&self, message: &str, title: &str) {
        warn!(title, "{message}");
    }
}
