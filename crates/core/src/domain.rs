//! Value types shared across the assistant pipeline.
//!
//! These are minimal projections of what the storefront backend returns:
//! just the fields the deterministic rules and the prompt builder need.
//! Records the pipeline never inspects stay close to their wire shape.

use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// The caller's authentication state, passed explicitly per call.
///
/// Owned by the UI layer; the pipeline reads it and never mutates it.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub is_authenticated: bool,
    pub auth_token: Option<SecretString>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: impl Into<String>) -> Self {
        Self { is_authenticated: true, auth_token: Some(token.into().into()) }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub total: Decimal,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// The role-scoped backend data available for answering one request.
///
/// Every field is optional: `None` means the source was not attempted or
/// its fetch failed, which is "unknown" and must never be presented as
/// "empty". `Some(vec![])` is a genuine empty result. Personal fields are
/// only populated for authenticated sessions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContextSnapshot {
    pub products: Option<Vec<Product>>,
    pub categories: Option<Vec<Category>>,
    pub profile: Option<UserProfile>,
    pub orders: Option<Vec<Order>>,
    pub balance: Option<Balance>,
}

impl ContextSnapshot {
    /// True when any personal (authenticated-only) field is present.
    pub fn has_personal_data(&self) -> bool {
        self.profile.is_some() || self.orders.is_some() || self.balance.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the conversation transcript. The transcript itself is
/// owned by the UI; the pipeline only ever sees the latest user text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

/// The pipeline's sole output contract. A failed result still carries a
/// human-readable message, never a raw error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub success: bool,
    pub message: String,
}

impl PipelineResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}
