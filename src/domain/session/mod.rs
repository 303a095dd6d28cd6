//! Session-scoped cart state for UI consumers.

pub mod errors;
pub mod models;
pub mod notifications;
pub mod service;

pub use errors::CartSessionError;
pub use notifications::{MockNotifier, Notifier, TracingNotifier};
pub use service::CartSession;
