//! Vallmere Cart
//!
//! Cart and product persistence for the Vallmere storefront: a whole-collection
//! key-value store, persisted id counters, an invariant-enforcing cart engine
//! and a session-scoped cart facade.

pub mod config;
pub mod context;
pub mod domain;
pub mod ids;
pub mod observability;
pub mod sequencer;
pub mod storage;

#[cfg(test)]
mod test;
