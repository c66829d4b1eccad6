//! Add-to-cart mutation against the session's cart.
//!
//! Primary mechanism is the platform's AJAX endpoint; the query-parameter
//! URL is the fallback when the AJAX response is inconclusive. Neither
//! failing is fatal — the checkout probe still runs, with lowered
//! confidence surfaced in the report.

use serde::Deserialize;

use crate::session::Session;

/// Typed shape of the `?wc-ajax=add_to_cart` response. Decoded with
/// explicit presence checks; the success marker is the `fragments` field.
#[derive(Debug, Deserialize)]
pub struct AjaxCartResponse {
    /// HTML fragments for cart widgets. Present iff the add succeeded.
    #[serde(default)]
    pub fragments: Option<serde_json::Value>,
    #[serde(default)]
    pub cart_hash: Option<String>,
    /// Set to `true` when the platform rejected the product id.
    #[serde(default)]
    pub error: Option<bool>,
}

impl AjaxCartResponse {
    /// The recognized success marker: fragments present and no error flag.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.fragments.is_some() && self.error != Some(true)
    }
}

/// Which mechanism confirmed the mutation, for logging and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartMechanism {
    AjaxEndpoint,
    QueryParam,
}

/// Outcome of the mutation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOutcome {
    Confirmed { mechanism: CartMechanism },
    /// Both mechanisms inconclusive. The cart may still be populated — some
    /// themes return unrecognized response shapes on success — so callers
    /// proceed to checkout but must not report full confidence.
    Unconfirmed,
}

/// Body marker the query-parameter fallback looks for: WooCommerce renders
/// an `added_to_cart` button class / message wrapper after a GET add.
const ADDED_MARKER: &str = "added_to_cart";

/// Attempts to place `product_id` into the session's cart with quantity 1.
///
/// Never returns an error: every failure mode degrades to
/// [`CartOutcome::Unconfirmed`].
pub async fn add_to_cart(session: &Session, product_id: &str) -> CartOutcome {
    let ajax_url = format!("{}/?wc-ajax=add_to_cart", session.origin());
    let params = [("product_id", product_id), ("quantity", "1")];
    let headers = [
        ("Accept", "application/json, text/javascript, */*; q=0.01"),
        ("X-Requested-With", "XMLHttpRequest"),
    ];

    match session.post_form(&ajax_url, &params, &headers).await {
        Ok(page) => match serde_json::from_str::<AjaxCartResponse>(&page.body) {
            Ok(response) if response.is_success() => {
                tracing::debug!(product_id, "ajax endpoint confirmed add-to-cart");
                return CartOutcome::Confirmed {
                    mechanism: CartMechanism::AjaxEndpoint,
                };
            }
            Ok(_) => {
                tracing::debug!(product_id, "ajax response lacked success marker");
            }
            Err(e) => {
                tracing::debug!(product_id, error = %e, "ajax response was not parseable JSON");
            }
        },
        Err(e) => {
            tracing::debug!(product_id, error = %e, "ajax add-to-cart transport failure");
        }
    }

    // Fallback: the canonical add-to-cart query-parameter URL.
    let fallback_url = add_to_cart_url(session.entry_url(), product_id);
    match session.fetch(&fallback_url).await {
        Ok(page) if page.body.contains(ADDED_MARKER) => {
            tracing::debug!(product_id, "query-param fallback confirmed add-to-cart");
            CartOutcome::Confirmed {
                mechanism: CartMechanism::QueryParam,
            }
        }
        Ok(_) => {
            tracing::debug!(product_id, "fallback response lacked added-to-cart marker");
            CartOutcome::Unconfirmed
        }
        Err(e) => {
            tracing::debug!(product_id, error = %e, "fallback add-to-cart transport failure");
            CartOutcome::Unconfirmed
        }
    }
}

/// Appends `add-to-cart=<id>` to `base_url`, respecting any existing query
/// string.
fn add_to_cart_url(base_url: &str, product_id: &str) -> String {
    match reqwest::Url::parse(base_url) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("add-to-cart", product_id);
            url.to_string()
        }
        // The session already validated the entry URL; keep a string
        // fallback rather than panicking if that ever changes.
        Err(_) => format!("{base_url}?add-to-cart={product_id}"),
    }
}
