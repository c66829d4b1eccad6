//! Product discovery: entry page first, then the candidate catalog walk.

use crate::captcha::detect_captcha;
use crate::extract::product_ids_from_html;
use crate::session::Session;

/// Guessed catalog locations for the target platform family, in priority
/// order. The first path yielding any identifier wins and no further paths
/// are fetched.
pub const CANDIDATE_PATHS: [&str; 40] = [
    "/shop/",
    "/product-category/",
    "/category/",
    "/products/",
    "/store/",
    "/collections/",
    "/items/",
    "/catalog/",
    "/products-page/",
    "/product/",
    "/our-products/",
    "/shop-all/",
    "/shop-by-category/",
    "/all-products/",
    "/product-list/",
    "/sale/",
    "/new-arrivals/",
    "/top-rated/",
    "/best-sellers/",
    "/featured/",
    "/brands/",
    "/vendors/",
    "/promotions/",
    "/deals/",
    "/discounts/",
    "/offers/",
    "/collections/all/",
    "/our-range/",
    "/exclusive/",
    "/seasonal/",
    "/limited-edition/",
    "/special-edition/",
    "/catalogue/",
    "/shop-now/",
    "/shop-by-brand/",
    "/shop-by-type/",
    "/shop-by-price/",
    "/clearance/",
    "/outlet/",
    "/promo-items/",
];

/// Terminal state of the discovery walk.
#[derive(Debug)]
pub enum DiscoveryOutcome {
    Found {
        /// Deduplicated candidates from the winning page; first = chosen.
        product_ids: Vec<String>,
        /// The page the candidates came from (entry URL or a catalog path).
        source_url: String,
        /// CAPTCHA flag from the entry page, kept for the final report when
        /// checkout is never reached.
        entry_captcha: bool,
    },
    Exhausted {
        entry_captcha: bool,
    },
}

/// Walks the discovery state machine: try the entry URL as-is, then the
/// candidate catalog paths in declared order.
///
/// A transport failure on any single fetch is treated as an empty extraction
/// result and the walk continues — guessed paths 404 or time out routinely
/// and must not abort discovery.
///
/// `concurrency` caps in-flight candidate fetches. With `1` the walk is
/// strictly sequential. Above `1`, paths are probed in fixed-size batches;
/// within a batch all fetches run concurrently but results are resolved in
/// declared priority order, so the winner is deterministic regardless of
/// response arrival order, and no batch after a hit is ever started.
pub async fn discover(session: &Session, concurrency: usize) -> DiscoveryOutcome {
    let mut entry_captcha = false;

    match session.fetch(session.entry_url()).await {
        Ok(page) => {
            entry_captcha = detect_captcha(&page.body);
            let product_ids = product_ids_from_html(&page.body);
            if !product_ids.is_empty() {
                tracing::debug!(
                    url = %page.url,
                    count = product_ids.len(),
                    "entry page yielded product ids"
                );
                return DiscoveryOutcome::Found {
                    product_ids,
                    source_url: page.url,
                    entry_captcha,
                };
            }
        }
        Err(e) => {
            tracing::debug!(url = session.entry_url(), error = %e, "entry fetch failed; trying candidate paths");
        }
    }

    let concurrency = concurrency.max(1);
    for batch in CANDIDATE_PATHS.chunks(concurrency) {
        let fetches = batch.iter().map(|path| {
            let url = format!("{}{path}", session.origin());
            async move {
                match session.fetch(&url).await {
                    Ok(page) => (url, product_ids_from_html(&page.body)),
                    Err(e) => {
                        tracing::debug!(url, error = %e, "candidate fetch failed; continuing walk");
                        (url, Vec::new())
                    }
                }
            }
        });

        // Resolve in declared order, not arrival order.
        for (source_url, product_ids) in futures::future::join_all(fetches).await {
            if !product_ids.is_empty() {
                tracing::debug!(
                    url = %source_url,
                    count = product_ids.len(),
                    "candidate path yielded product ids"
                );
                return DiscoveryOutcome::Found {
                    product_ids,
                    source_url,
                    entry_captcha,
                };
            }
        }
    }

    DiscoveryOutcome::Exhausted { entry_captcha }
}
