//! The full probe pipeline: discovery → cart mutation → checkout probe,
//! aggregated into one [`ProbeReport`].

use std::time::Duration;

use cartprobe_core::{AppConfig, CartConfidence, ProbeReport, ProbeStatus};

use crate::cart::{add_to_cart, CartOutcome};
use crate::checkout::probe_checkout;
use crate::discover::{discover, DiscoveryOutcome};
use crate::error::ProbeError;
use crate::session::Session;

/// Runs one probe against `url` and always returns a structured report.
///
/// The target URL is validated before any network activity; an invalid URL
/// is a terminal `error` report. The whole run is bounded by the configured
/// probe deadline, surfaced as an `error` report when exceeded. No failure
/// mode panics or escapes as a raw error.
pub async fn run_probe(config: &AppConfig, url: &str) -> ProbeReport {
    let session = match Session::new(config, url) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(url, error = %e, "probe aborted before any network activity");
            return ProbeReport::error(url, e.to_string());
        }
    };

    let deadline = Duration::from_secs(config.probe_deadline_secs);
    match tokio::time::timeout(deadline, probe_stages(config, &session)).await {
        Ok(report) => report,
        Err(_) => {
            let e = ProbeError::DeadlineExceeded {
                secs: config.probe_deadline_secs,
            };
            tracing::warn!(url, "{e}");
            ProbeReport::error(url, e.to_string())
        }
    }
}

async fn probe_stages(config: &AppConfig, session: &Session) -> ProbeReport {
    let entry_url = session.entry_url().to_owned();

    let (product_ids, source_url, entry_captcha) =
        match discover(session, config.candidate_concurrency).await {
            DiscoveryOutcome::Exhausted { entry_captcha } => {
                tracing::info!(url = %entry_url, "no product ids found anywhere");
                return ProbeReport::no_product_found(entry_url, entry_captcha);
            }
            DiscoveryOutcome::Found {
                product_ids,
                source_url,
                entry_captcha,
            } => (product_ids, source_url, entry_captcha),
        };

    // The chosen id is fixed here; downstream stages never re-derive it.
    let Some(chosen) = product_ids.first().cloned() else {
        return ProbeReport::no_product_found(entry_url, entry_captcha);
    };
    tracing::info!(url = %entry_url, source = %source_url, product_id = %chosen, "product id chosen");

    let cart_outcome = add_to_cart(session, &chosen).await;
    let cart = match cart_outcome {
        CartOutcome::Confirmed { mechanism } => {
            tracing::info!(product_id = %chosen, ?mechanism, "cart mutation confirmed");
            CartConfidence::Confirmed
        }
        CartOutcome::Unconfirmed => {
            tracing::warn!(product_id = %chosen, "cart mutation unconfirmed; probing checkout anyway");
            CartConfidence::Unconfirmed
        }
    };

    match probe_checkout(session).await {
        Ok(checkout) => ProbeReport {
            status: ProbeStatus::Success,
            url: entry_url,
            product_ids,
            // Checkout value supersedes the entry-page flag once checkout
            // was reached.
            captcha: checkout.captcha,
            payment_methods: checkout.payment_methods,
            cart: Some(cart),
            message: None,
        },
        Err(e) => {
            tracing::warn!(url = %entry_url, error = %e, "checkout unreachable");
            ProbeReport {
                status: ProbeStatus::Error,
                url: entry_url,
                product_ids,
                captcha: entry_captcha,
                payment_methods: Vec::new(),
                cart: Some(cart),
                message: Some(format!("checkout unreachable: {e}")),
            }
        }
    }
}
