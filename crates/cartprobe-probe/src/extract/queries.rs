//! Static strategy sets for product-id and payment-method extraction.
//!
//! Order matters: it is the merge priority when candidates from multiple
//! strategies are unioned.

use super::ExtractionQuery;

/// Product-identifier strategies, highest priority first.
pub const PRODUCT_QUERIES: &[ExtractionQuery] = &[
    // Anchor query strings: the classic WooCommerce add-to-cart link.
    ExtractionQuery::Selector {
        selector: r#"a[href*="add-to-cart="]"#,
        attr: Some("href"),
    },
    // Hidden form fields on single-product pages.
    ExtractionQuery::Selector {
        selector: r#"input[name="add-to-cart"]"#,
        attr: Some("value"),
    },
    ExtractionQuery::Selector {
        selector: r#"input[name="product_id"]"#,
        attr: Some("value"),
    },
    // Data attributes on AJAX add-to-cart buttons; both spellings occur.
    ExtractionQuery::Selector {
        selector: "[data-product_id]",
        attr: Some("data-product_id"),
    },
    ExtractionQuery::Selector {
        selector: "[data-product-id]",
        attr: Some("data-product-id"),
    },
    // Cart forms posting back to an add-to-cart action URL.
    ExtractionQuery::Selector {
        selector: r#"form[action*="add-to-cart="]"#,
        attr: Some("action"),
    },
    // schema.org Product records.
    ExtractionQuery::ProductJsonLd,
    // Raw-text fallback for markup the tree-based strategies miss.
    ExtractionQuery::Pattern(r#"(?:[?&]add-to-cart=|name="add-to-cart" value=")(\d+)"#),
];

/// Payment-method strategies for the checkout page, highest priority first.
/// Candidates are gateway slugs like `bacs`, `cod`, `stripe`, `paypal`.
pub const PAYMENT_QUERIES: &[ExtractionQuery] = &[
    // The stock WooCommerce checkout renders gateways as radio inputs
    // inside the #payment container.
    ExtractionQuery::Selector {
        selector: r#"#payment input[name="payment_method"]"#,
        attr: Some("value"),
    },
    // Themed checkouts rename the container but keep payment/method tokens
    // in its id or class.
    ExtractionQuery::Selector {
        selector: r#"[id*="payment"] input[name="payment_method"]"#,
        attr: Some("value"),
    },
    ExtractionQuery::Selector {
        selector: r#"[class*="method"] input[name="payment_method"]"#,
        attr: Some("value"),
    },
    // Raw-text fallbacks for pages where the inputs are emitted by inline
    // script and only the class/id markers survive in the static HTML.
    ExtractionQuery::Pattern(r#"(?i)class="wc_payment_method payment_method_([^"\s]+)""#),
    ExtractionQuery::Pattern(r#"(?i)id="payment_method_([^"\s]+)""#),
    ExtractionQuery::Pattern(r#"(?i)name="payment_method"[^>]*value="([^"\s]+)""#),
];
