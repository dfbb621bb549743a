//! Relevance gate: decides whether a message is worth processing at all.
//!
//! Pure and total - every string yields true or false, no I/O. The gate
//! is intentionally permissive: a single keyword hit is enough, and there
//! are no negative keywords. Its only job is to avoid spending backend
//! and generative calls on obviously off-topic input.

/// Shop/product/order vocabulary. Matched case-insensitively as
/// substrings of the normalized message.
const DOMAIN_KEYWORDS: &[&str] = &[
    "bread",
    "loaf",
    "bake",
    "bakery",
    "cake",
    "pastry",
    "pastries",
    "croissant",
    "bun",
    "roll",
    "cookie",
    "pie",
    "dessert",
    "product",
    "catalog",
    "menu",
    "assortment",
    "category",
    "categories",
    "price",
    "cost",
    "order",
    "purchase",
    "buy",
    "shop",
    "store",
    "delivery",
    "account",
    "balance",
    "profile",
    "login",
    "discount",
    "recommend",
    "fresh",
    "gluten",
];

/// Generic help-seeking phrases that earn the benefit of the doubt.
/// Deliberately phrases rather than bare question words, so "what is the
/// capital of France" does not slip through on "what" alone.
const HELP_PATTERNS: &[&str] =
    &["help", "can you", "what do you", "what can you", "how do i", "how can i"];

pub fn is_in_domain(text: &str) -> bool {
    let normalized = text.to_lowercase();
    DOMAIN_KEYWORDS.iter().chain(HELP_PATTERNS).any(|keyword| normalized.contains(keyword))
}
