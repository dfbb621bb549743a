//! Local resolution: deterministic answers straight from the snapshot.
//!
//! A strictly ordered list of (predicate, formatter) rules over the
//! lowercased message text. The first rule whose predicate holds and
//! whose formatter produces a reply wins; if none does, the caller falls
//! through to the generative stage. Evaluation order matters:
//! domain-public rules come before personal ones, and the login gate is
//! checked before any personal rule can answer.

use crumb_core::domain::{ContextSnapshot, Session};
use tracing::debug;

/// Shown when an unauthenticated user asks for orders/account/balance.
pub const LOGIN_PROMPT_REPLY: &str =
    "Please sign in first - then I can look up your orders, balance, and account details.";

/// Shown when an authenticated user with no order history asks about it.
pub const NO_ORDERS_REPLY: &str =
    "You don't have any orders yet. Once you place your first order, I can track it here.";

/// Shown when a personal rule matches but its backend source could not be
/// fetched this call. Absence is unknown, not zero; we say so instead of
/// guessing or handing the question to the generative model.
pub const PERSONAL_DATA_UNAVAILABLE_REPLY: &str =
    "I couldn't reach your account data just now. Please try again in a moment.";

/// How many products the catalog summary enumerates.
const MAX_LISTED_PRODUCTS: usize = 5;

struct Rule {
    name: &'static str,
    applies: fn(&RuleInput<'_>) -> bool,
    render: fn(&RuleInput<'_>) -> Option<String>,
}

struct RuleInput<'a> {
    /// Lowercased message text.
    text: &'a str,
    snapshot: &'a ContextSnapshot,
    session: &'a Session,
}

impl RuleInput<'_> {
    fn mentions(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|keyword| self.text.contains(keyword))
    }

    fn asks_for_personal_data(&self) -> bool {
        self.mentions(&["order", "purchase", "bought", "account", "balance", "profile"])
    }
}

/// Order is significant and must be preserved.
static RULES: &[Rule] = &[
    Rule { name: "catalog_summary", applies: wants_catalog, render: render_catalog_summary },
    Rule { name: "category_listing", applies: wants_categories, render: render_category_listing },
    Rule { name: "login_gate", applies: personal_while_anonymous, render: render_login_prompt },
    Rule { name: "order_history", applies: wants_orders, render: render_order_history },
    Rule { name: "account_greeting", applies: wants_account, render: render_account_greeting },
];

pub fn resolve_locally(
    text: &str,
    snapshot: &ContextSnapshot,
    session: &Session,
) -> Option<String> {
    let lowered = text.to_lowercase();
    let input = RuleInput { text: &lowered, snapshot, session };

    for rule in RULES {
        if !(rule.applies)(&input) {
            continue;
        }
        if let Some(reply) = (rule.render)(&input) {
            debug!(event_name = "assistant.rules.matched", rule = rule.name, "local rule answered");
            return Some(reply);
        }
    }

    None
}

// --- Predicates ---

fn wants_catalog(input: &RuleInput<'_>) -> bool {
    input.mentions(&["product", "catalog", "menu", "assortment", "sell", "bread", "pastr"])
}

fn wants_categories(input: &RuleInput<'_>) -> bool {
    input.mentions(&["categor", "types", "kinds"])
}

fn personal_while_anonymous(input: &RuleInput<'_>) -> bool {
    !input.session.is_authenticated && input.asks_for_personal_data()
}

fn wants_orders(input: &RuleInput<'_>) -> bool {
    input.session.is_authenticated && input.mentions(&["order", "purchase", "bought"])
}

fn wants_account(input: &RuleInput<'_>) -> bool {
    input.session.is_authenticated && input.mentions(&["balance", "account", "profile"])
}

// --- Formatters ---

fn render_catalog_summary(input: &RuleInput<'_>) -> Option<String> {
    // None means the products fetch failed: unknown, not empty. Fall
    // through so a later stage can still try.
    let products = input.snapshot.products.as_ref()?;
    if products.is_empty() {
        return Some(
            "We don't have any products listed right now - please check back soon.".to_string(),
        );
    }

    let mut reply = String::from("Here's what we have on offer:\n");
    for product in products.iter().take(MAX_LISTED_PRODUCTS) {
        reply.push_str(&format!("- {} ({})\n", product.name, format_money(product.price)));
    }
    if products.len() > MAX_LISTED_PRODUCTS {
        reply.push_str(&format!("...and {} more.", products.len() - MAX_LISTED_PRODUCTS));
    } else {
        reply.pop();
    }
    Some(reply)
}

fn render_category_listing(input: &RuleInput<'_>) -> Option<String> {
    let categories = input.snapshot.categories.as_ref()?;
    if categories.is_empty() {
        return Some("We don't have any categories set up yet.".to_string());
    }

    let names = categories.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ");
    Some(format!("Our categories: {names}."))
}

fn render_login_prompt(_input: &RuleInput<'_>) -> Option<String> {
    Some(LOGIN_PROMPT_REPLY.to_string())
}

fn render_order_history(input: &RuleInput<'_>) -> Option<String> {
    let Some(orders) = input.snapshot.orders.as_ref() else {
        return Some(PERSONAL_DATA_UNAVAILABLE_REPLY.to_string());
    };

    // Backend returns orders newest first.
    let Some(latest) = orders.first() else {
        return Some(NO_ORDERS_REPLY.to_string());
    };

    Some(format!(
        "You have {} order(s). Your most recent order is {} with a total of {}.",
        orders.len(),
        latest.id,
        format_money(latest.total),
    ))
}

fn render_account_greeting(input: &RuleInput<'_>) -> Option<String> {
    let profile = input.snapshot.profile.as_ref();
    let balance = input.snapshot.balance.as_ref();

    match (profile, balance) {
        (Some(profile), Some(balance)) => Some(format!(
            "Hi {}! Your current balance is {} {}.",
            profile.name,
            balance.amount,
            balance.currency,
        )),
        (None, Some(balance)) => {
            Some(format!("Your current balance is {} {}.", balance.amount, balance.currency))
        }
        _ => Some(PERSONAL_DATA_UNAVAILABLE_REPLY.to_string()),
    }
}

fn format_money(amount: rust_decimal::Decimal) -> String {
    format!("${amount:.2}")
}
