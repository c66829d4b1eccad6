//! The probe report — the single structured record a probe run produces.
//!
//! Field names are an external contract: the CLI prints this record as JSON
//! and the server returns it verbatim, so downstream consumers key on the
//! serialized names. Do not rename fields without versioning the API.

use serde::{Deserialize, Serialize};

/// Terminal status of one probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// A product id was found and the checkout page was reached.
    Success,
    /// Entry page and every candidate catalog path yielded zero identifiers.
    NoProductFound,
    /// Unrecoverable failure before a conclusive state (bad URL, entry fetch
    /// failure, checkout unreachable, deadline exceeded).
    Error,
}

/// Confidence in the add-to-cart mutation, reported only when one was
/// attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartConfidence {
    /// A recognized success marker confirmed the mutation.
    Confirmed,
    /// Both cart mechanisms were inconclusive; the checkout probe still ran
    /// because the cart may have been populated despite the odd response.
    Unconfirmed,
}

/// Structured outcome of a probe run. Built additively as stages complete;
/// never mutated after emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    pub status: ProbeStatus,
    /// The target URL as supplied by the caller.
    pub url: String,
    /// Identifier candidates in first-seen order; the first element is the
    /// one carried through cart mutation and checkout.
    pub product_ids: Vec<String>,
    /// CAPTCHA presence. Checkout-page value when checkout was reached,
    /// else the entry-page value, else `false`.
    pub captcha: bool,
    /// Payment gateway slugs extracted from the checkout page.
    pub payment_methods: Vec<String>,
    /// Present only when an add-to-cart mutation was attempted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart: Option<CartConfidence>,
    /// Human-readable detail for `status = error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProbeReport {
    /// Report for a run that never produced a usable product id.
    #[must_use]
    pub fn no_product_found(url: impl Into<String>, captcha: bool) -> Self {
        Self {
            status: ProbeStatus::NoProductFound,
            url: url.into(),
            product_ids: Vec::new(),
            captcha,
            payment_methods: Vec::new(),
            cart: None,
            message: None,
        }
    }

    /// Report for a run that failed before reaching a conclusive state.
    #[must_use]
    pub fn error(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Error,
            url: url.into(),
            product_ids: Vec::new(),
            captcha: false,
            payment_methods: Vec::new(),
            cart: None,
            message: Some(message.into()),
        }
    }

    /// The chosen identifier, when discovery succeeded.
    #[must_use]
    pub fn chosen_product_id(&self) -> Option<&str> {
        self.product_ids.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&ProbeStatus::NoProductFound).unwrap();
        assert_eq!(json, "\"no_product_found\"");
    }

    #[test]
    fn error_report_carries_message_and_no_cart_field() {
        let report = ProbeReport::error("https://example.com", "dns failure");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "dns failure");
        assert!(
            json.get("cart").is_none(),
            "cart must be omitted when no mutation was attempted"
        );
    }

    #[test]
    fn chosen_product_id_is_first_candidate() {
        let report = ProbeReport {
            status: ProbeStatus::Success,
            url: "https://example.com".into(),
            product_ids: vec!["42".into(), "99".into()],
            captcha: false,
            payment_methods: vec![],
            cart: Some(CartConfidence::Confirmed),
            message: None,
        };
        assert_eq!(report.chosen_product_id(), Some("42"));
    }
}
