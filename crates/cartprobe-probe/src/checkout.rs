//! Checkout probe: CAPTCHA re-detection and payment-method extraction under
//! the mutated session.

use crate::captcha::detect_captcha;
use crate::error::ProbeError;
use crate::extract::payment_methods_from_html;
use crate::session::Session;

/// What the checkout page revealed.
#[derive(Debug, Clone)]
pub struct CheckoutProbe {
    pub captcha: bool,
    /// Gateway slugs, sentinel values already filtered.
    pub payment_methods: Vec<String>,
}

/// Fetches `{origin}/checkout/` and inspects it.
///
/// An empty `payment_methods` list is a valid observation (gateways hidden
/// behind JS, or an empty-cart redirect); only transport failure is an
/// error, so callers can tell "checkout unreachable" from "no methods seen".
///
/// # Errors
///
/// Returns [`ProbeError::Http`] when the checkout page cannot be fetched.
pub async fn probe_checkout(session: &Session) -> Result<CheckoutProbe, ProbeError> {
    let url = format!("{}/checkout/", session.origin());
    let page = session.fetch(&url).await?;

    let captcha = detect_captcha(&page.body);
    let payment_methods = payment_methods_from_html(&page.body);

    tracing::debug!(
        url = %page.url,
        status = page.status,
        captcha,
        methods = payment_methods.len(),
        "checkout probed"
    );

    Ok(CheckoutProbe {
        captcha,
        payment_methods,
    })
}
