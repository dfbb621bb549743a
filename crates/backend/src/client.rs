use std::time::Duration;

use async_trait::async_trait;
use crumb_core::config::BackendConfig;
use crumb_core::domain::{Balance, Category, Order, Product, Session, UserProfile};
use crumb_core::errors::BackendError;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::StorefrontBackend;

const PRODUCTS_ENDPOINT: &str = "/products";
const CATEGORIES_ENDPOINT: &str = "/categories";
const PROFILE_ENDPOINT: &str = "/user/profile";
const ORDERS_ENDPOINT: &str = "/user/orders";
const BALANCE_ENDPOINT: &str = "/user/balance";

/// reqwest-backed implementation of [`StorefrontBackend`].
pub struct HttpBackend {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
            client: reqwest::Client::new(),
        }
    }

    fn bearer<'a>(
        session: &'a Session,
        endpoint: &'static str,
    ) -> Result<&'a SecretString, BackendError> {
        session
            .auth_token
            .as_ref()
            .filter(|_| session.is_authenticated)
            .ok_or(BackendError::MissingAuth { endpoint })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        token: Option<&SecretString>,
    ) -> Result<T, BackendError> {
        let url = format!("{}{endpoint}", self.base_url);
        debug!(event_name = "backend.request", endpoint, "fetching backend source");

        let mut request = self.client.get(&url).timeout(self.timeout);
        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|err| BackendError::Transport { endpoint, message: err.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Api { endpoint, status_code: status.as_u16() });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| BackendError::Decode { endpoint, message: err.to_string() })
    }
}

#[async_trait]
impl StorefrontBackend for HttpBackend {
    async fn products(&self) -> Result<Vec<Product>, BackendError> {
        self.get_json(PRODUCTS_ENDPOINT, None).await
    }

    async fn categories(&self) -> Result<Vec<Category>, BackendError> {
        self.get_json(CATEGORIES_ENDPOINT, None).await
    }

    async fn profile(&self, session: &Session) -> Result<UserProfile, BackendError> {
        let token = Self::bearer(session, PROFILE_ENDPOINT)?;
        self.get_json(PROFILE_ENDPOINT, Some(token)).await
    }

    async fn orders(&self, session: &Session) -> Result<Vec<Order>, BackendError> {
        let token = Self::bearer(session, ORDERS_ENDPOINT)?;
        self.get_json(ORDERS_ENDPOINT, Some(token)).await
    }

    async fn balance(&self, session: &Session) -> Result<Balance, BackendError> {
        let token = Self::bearer(session, BALANCE_ENDPOINT)?;
        self.get_json(BALANCE_ENDPOINT, Some(token)).await
    }
}
