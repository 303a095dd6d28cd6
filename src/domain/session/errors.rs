//! Cart session errors.

use thiserror::Error;

use crate::domain::carts::CartsServiceError;

/// Cart session error variants.
#[derive(Debug, Error)]
pub enum CartSessionError {
    /// No signed-in user with an id.
    #[error("User not logged in")]
    NotAuthenticated,

    /// The session has not loaded or created a cart yet.
    #[error("No cart available")]
    NoCartAvailable,

    /// The cart engine rejected the operation.
    #[error(transparent)]
    Cart(#[from] CartsServiceError),
}
