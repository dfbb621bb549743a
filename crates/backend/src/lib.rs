//! Storefront REST client.
//!
//! The assistant pipeline consumes five read-only backend endpoints:
//! two public (products, categories) and three requiring authentication
//! (profile, orders, balance). All of them are best-effort from the
//! pipeline's perspective: callers turn any [`BackendError`] into an
//! absent snapshot field rather than a user-visible failure.

pub mod client;

use async_trait::async_trait;
use crumb_core::domain::{Balance, Category, Order, Product, Session, UserProfile};
use crumb_core::errors::BackendError;

pub use client::HttpBackend;

/// The boundary to the storefront REST API.
///
/// A trait so the pipeline can be exercised with in-memory fakes; the
/// production implementation is [`HttpBackend`].
#[async_trait]
pub trait StorefrontBackend: Send + Sync {
    async fn products(&self) -> Result<Vec<Product>, BackendError>;
    async fn categories(&self) -> Result<Vec<Category>, BackendError>;
    async fn profile(&self, session: &Session) -> Result<UserProfile, BackendError>;
    async fn orders(&self, session: &Session) -> Result<Vec<Order>, BackendError>;
    async fn balance(&self, session: &Session) -> Result<Balance, BackendError>;
}
