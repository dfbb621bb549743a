//! Context aggregation: one role-scoped snapshot per request.
//!
//! Public sources (products, categories) are always attempted; personal
//! sources (profile, orders, balance) only for authenticated sessions.
//! All attempted fetches run concurrently and each failure is isolated:
//! the source is logged and left absent from the snapshot, it never
//! aborts siblings or the overall call.

use crumb_backend::StorefrontBackend;
use crumb_core::domain::{ContextSnapshot, Session};
use crumb_core::errors::BackendError;
use tracing::warn;

/// Builds the snapshot for one request. Returns once every attempted
/// fetch has settled; partial results are expected, a pending fetch is
/// not.
pub async fn build_context<B>(backend: &B, session: &Session) -> ContextSnapshot
where
    B: StorefrontBackend + ?Sized,
{
    if session.is_authenticated {
        let (products, categories, profile, orders, balance) = tokio::join!(
            backend.products(),
            backend.categories(),
            backend.profile(session),
            backend.orders(session),
            backend.balance(session),
        );

        ContextSnapshot {
            products: settled("products", products),
            categories: settled("categories", categories),
            profile: settled("profile", profile),
            orders: settled("orders", orders),
            balance: settled("balance", balance),
        }
    } else {
        let (products, categories) = tokio::join!(backend.products(), backend.categories());

        ContextSnapshot {
            products: settled("products", products),
            categories: settled("categories", categories),
            ..ContextSnapshot::default()
        }
    }
}

/// Settle-and-collect: success keeps the value, failure records the
/// source as absent. The single place where "degrade gracefully" is
/// enforced for backend sources.
fn settled<T>(source: &'static str, result: Result<T, BackendError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(
                event_name = "assistant.context.source_failed",
                source,
                error = %error,
                "backend source unavailable, continuing with partial context"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use crumb_backend::StorefrontBackend;
    use crumb_core::domain::{Balance, Category, Order, Product, Session, UserProfile};
    use crumb_core::errors::BackendError;
    use rust_decimal::Decimal;

    use super::build_context;

    /// In-memory backend that counts per-endpoint calls and can be told
    /// to fail individual sources.
    #[derive(Default)]
    struct FakeBackend {
        fail_orders: bool,
        fail_products: bool,
        personal_calls: AtomicUsize,
    }

    #[async_trait]
    impl StorefrontBackend for FakeBackend {
        async fn products(&self) -> Result<Vec<Product>, BackendError> {
            if self.fail_products {
                return Err(BackendError::Api { endpoint: "/products", status_code: 502 });
            }
            Ok(vec![Product {
                id: "rye-1".to_string(),
                name: "Rye Loaf".to_string(),
                price: Decimal::new(450, 2),
            }])
        }

        async fn categories(&self) -> Result<Vec<Category>, BackendError> {
            Ok(vec![Category { id: "c1".to_string(), name: "Breads".to_string() }])
        }

        async fn profile(&self, _session: &Session) -> Result<UserProfile, BackendError> {
            self.personal_calls.fetch_add(1, Ordering::SeqCst);
            Ok(UserProfile { id: "u1".to_string(), name: "Maya".to_string(), email: None })
        }

        async fn orders(&self, _session: &Session) -> Result<Vec<Order>, BackendError> {
            self.personal_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_orders {
                return Err(BackendError::Transport {
                    endpoint: "/user/orders",
                    message: "connection reset".to_string(),
                });
            }
            Ok(vec![Order {
                id: "ord-9".to_string(),
                total: Decimal::new(1275, 2),
                created_at: None,
            }])
        }

        async fn balance(&self, _session: &Session) -> Result<Balance, BackendError> {
            self.personal_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Balance { amount: Decimal::new(2000, 2), currency: "USD".to_string() })
        }
    }

    #[tokio::test]
    async fn anonymous_snapshot_never_contains_personal_fields() {
        let backend = FakeBackend::default();
        let snapshot = build_context(&backend, &Session::anonymous()).await;

        assert!(snapshot.products.is_some());
        assert!(snapshot.categories.is_some());
        assert!(snapshot.profile.is_none());
        assert!(snapshot.orders.is_none());
        assert!(snapshot.balance.is_none());
        // Personal endpoints were never even attempted.
        assert_eq!(backend.personal_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn authenticated_snapshot_carries_all_five_sources() {
        let backend = FakeBackend::default();
        let snapshot = build_context(&backend, &Session::authenticated("tok")).await;

        assert!(snapshot.products.is_some());
        assert!(snapshot.categories.is_some());
        assert!(snapshot.profile.is_some());
        assert_eq!(snapshot.orders.as_ref().map(Vec::len), Some(1));
        assert!(snapshot.balance.is_some());
    }

    #[tokio::test]
    async fn failing_orders_fetch_degrades_without_aborting_siblings() {
        let backend = FakeBackend { fail_orders: true, ..FakeBackend::default() };
        let snapshot = build_context(&backend, &Session::authenticated("tok")).await;

        assert!(snapshot.orders.is_none(), "failed source must be absent, not empty");
        assert!(snapshot.products.is_some());
        assert!(snapshot.categories.is_some());
        assert!(snapshot.profile.is_some());
        assert!(snapshot.balance.is_some());
    }

    #[tokio::test]
    async fn failing_public_source_does_not_block_personal_sources() {
        let backend = FakeBackend { fail_products: true, ..FakeBackend::default() };
        let snapshot = build_context(&backend, &Session::authenticated("tok")).await;

        assert!(snapshot.products.is_none());
        assert!(snapshot.orders.is_some());
    }
}
