//! Storefront probe pipeline.
//!
//! Given one target URL on a WooCommerce-family storefront, discovers a
//! purchasable product id, pushes it into the session's cart, and inspects
//! the checkout page for CAPTCHA presence and offered payment methods.
//! Everything runs against a single cookie-carrying [`Session`]; the
//! pipeline never panics and always terminates in a [`ProbeReport`].
//!
//! [`ProbeReport`]: cartprobe_core::ProbeReport

pub mod captcha;
pub mod cart;
pub mod checkout;
pub mod discover;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod session;

pub use captcha::detect_captcha;
pub use cart::{add_to_cart, CartOutcome};
pub use checkout::{probe_checkout, CheckoutProbe};
pub use discover::{discover, DiscoveryOutcome, CANDIDATE_PATHS};
pub use error::ProbeError;
pub use extract::{extract, payment_methods_from_html, product_ids_from_html};
pub use pipeline::run_probe;
pub use session::{Page, Session};
