//! System-prompt construction for the generative fallback.
//!
//! Pure: given the same `(is_authenticated, snapshot)` pair this always
//! produces the same instruction text. Context is serialized with hard
//! bounds so the payload cannot grow without limit, and absent sources
//! are declared unavailable rather than described as empty.

use crumb_core::domain::ContextSnapshot;

const MAX_PROMPT_PRODUCTS: usize = 10;
const MAX_PROMPT_ORDERS: usize = 5;

pub fn build_system_prompt(is_authenticated: bool, snapshot: &ContextSnapshot) -> String {
    let mut prompt = String::from(
        "You are the shopping assistant of a small bakery storefront. \
         Answer briefly and only about the shop: its products, categories, \
         prices, and the customer's own account data listed below. \
         If something is not listed below, say you don't know it instead of inventing it.\n",
    );

    match snapshot.products.as_deref() {
        Some(products) if !products.is_empty() => {
            prompt.push_str("\nProducts:\n");
            for product in products.iter().take(MAX_PROMPT_PRODUCTS) {
                prompt.push_str(&format!("- {} (${})\n", product.name, product.price));
            }
            if products.len() > MAX_PROMPT_PRODUCTS {
                prompt.push_str(&format!(
                    "(and {} more products not listed)\n",
                    products.len() - MAX_PROMPT_PRODUCTS
                ));
            }
        }
        Some(_) => prompt.push_str("\nThe product catalog is currently empty.\n"),
        None => prompt.push_str("\nProduct data is currently unavailable.\n"),
    }

    match snapshot.categories.as_deref() {
        Some(categories) if !categories.is_empty() => {
            let names = categories.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ");
            prompt.push_str(&format!("\nCategories: {names}\n"));
        }
        Some(_) => prompt.push_str("\nNo categories are defined.\n"),
        None => prompt.push_str("\nCategory data is currently unavailable.\n"),
    }

    if is_authenticated {
        prompt.push_str("\nThe customer is signed in.\n");

        if let Some(profile) = &snapshot.profile {
            prompt.push_str(&format!("Customer name: {}\n", profile.name));
        }
        if let Some(balance) = &snapshot.balance {
            prompt.push_str(&format!(
                "Account balance: {} {}\n",
                balance.amount, balance.currency
            ));
        }
        match snapshot.orders.as_deref() {
            Some(orders) if !orders.is_empty() => {
                prompt.push_str("Recent orders (newest first):\n");
                for order in orders.iter().take(MAX_PROMPT_ORDERS) {
                    prompt.push_str(&format!("- {} (total ${})\n", order.id, order.total));
                }
            }
            Some(_) => prompt.push_str("The customer has no orders yet.\n"),
            None => {}
        }
    } else {
        prompt.push_str(
            "\nThe customer is not signed in. Do not discuss orders, balances, \
             or account details; suggest signing in for those.\n",
        );
    }

    prompt
}

#[cfg(test)]
mod tests {
    use crumb_core::domain::{Balance, ContextSnapshot, Order, Product, UserProfile};
    use rust_decimal::Decimal;

    use super::build_system_prompt;

    fn snapshot_fixture() -> ContextSnapshot {
        ContextSnapshot {
            products: Some(vec![Product {
                id: "rye-1".to_string(),
                name: "Rye Loaf".to_string(),
                price: Decimal::new(450, 2),
            }]),
            categories: None,
            profile: Some(UserProfile {
                id: "u1".to_string(),
                name: "Maya".to_string(),
                email: None,
            }),
            orders: Some(Vec::new()),
            balance: Some(Balance { amount: Decimal::new(2500, 2), currency: "USD".to_string() }),
        }
    }

    #[test]
    fn prompt_is_deterministic_for_the_same_inputs() {
        let snapshot = snapshot_fixture();
        assert_eq!(
            build_system_prompt(true, &snapshot),
            build_system_prompt(true, &snapshot),
        );
    }

    #[test]
    fn anonymous_prompt_omits_personal_sections_and_forbids_account_talk() {
        let snapshot =
            ContextSnapshot { profile: None, orders: None, balance: None, ..snapshot_fixture() };
        let prompt = build_system_prompt(false, &snapshot);
        assert!(!prompt.contains("Maya"));
        assert!(!prompt.contains("balance:"));
        assert!(prompt.contains("not signed in"));
    }

    #[test]
    fn authenticated_prompt_includes_name_balance_and_empty_order_state() {
        let prompt = build_system_prompt(true, &snapshot_fixture());
        assert!(prompt.contains("Maya"));
        assert!(prompt.contains("25.00 USD"));
        assert!(prompt.contains("no orders yet"));
    }

    #[test]
    fn absent_sources_read_as_unavailable_not_empty() {
        let snapshot = ContextSnapshot::default();
        let prompt = build_system_prompt(false, &snapshot);
        assert!(prompt.contains("Product data is currently unavailable"));
        assert!(prompt.contains("Category data is currently unavailable"));
        assert!(!prompt.contains("catalog is currently empty"));
    }

    #[test]
    fn product_list_is_bounded_in_the_prompt() {
        let mut snapshot = snapshot_fixture();
        snapshot.products = Some(
            (0..15)
                .map(|i| Product {
                    id: format!("p{i}"),
                    name: format!("Item {i}"),
                    price: Decimal::new(100, 2),
                })
                .collect(),
        );
        let prompt = build_system_prompt(false, &snapshot);
        assert!(prompt.contains("Item 9"));
        assert!(!prompt.contains("Item 10"));
        assert!(prompt.contains("and 5 more products"));
    }

    #[test]
    fn bounded_orders_in_authenticated_prompt() {
        let mut snapshot = snapshot_fixture();
        snapshot.orders = Some(
            (0..9)
                .map(|i| Order {
                    id: format!("ord-{i}"),
                    total: Decimal::new(1000, 2),
                    created_at: None,
                })
                .collect(),
        );
        let prompt = build_system_prompt(true, &snapshot);
        assert!(prompt.contains("ord-4"));
        assert!(!prompt.contains("ord-5"));
    }
}
