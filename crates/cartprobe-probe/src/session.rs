//! Per-run HTTP session: one cookie store, one client, one target origin.
//!
//! The original tooling this replaces shared a cookie file path through
//! ambient scope; here the cookie store is owned by the `Session` value and
//! released when it drops, on every exit path.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION};
use reqwest::{Client, Method, Url};
use std::time::Duration;

use cartprobe_core::AppConfig;

use crate::error::ProbeError;

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// One fetched page. Non-2xx statuses still carry their body: WAF challenge
/// pages and soft-404 storefront templates are usable payloads.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects.
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// HTTP session scoped to one probe run against one storefront.
///
/// Owns the cookie store (in-memory, per-client) so the add-to-cart mutation
/// and the checkout fetch share cart state, and carries browser-emulating
/// default headers. Dropped at run end along with its cookies.
#[derive(Debug)]
pub struct Session {
    client: Client,
    /// scheme+host of the target, e.g. `https://shop.example.com`.
    origin: String,
    /// The caller-supplied entry URL, verbatim.
    entry_url: String,
}

impl Session {
    /// Builds a session for `entry_url` using timeouts, user agent, and TLS
    /// settings from `config`.
    ///
    /// # Errors
    ///
    /// - [`ProbeError::InvalidTargetUrl`] — `entry_url` is not an absolute
    ///   http(s) URL with a host. Checked before any network activity.
    /// - [`ProbeError::ClientBuild`] — the underlying `reqwest::Client`
    ///   cannot be constructed.
    pub fn new(config: &AppConfig, entry_url: &str) -> Result<Self, ProbeError> {
        let parsed = Url::parse(entry_url).map_err(|e| ProbeError::InvalidTargetUrl {
            url: entry_url.to_owned(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProbeError::InvalidTargetUrl {
                url: entry_url.to_owned(),
                reason: format!("unsupported scheme \"{}\"", parsed.scheme()),
            });
        }
        if parsed.host_str().is_none() {
            return Err(ProbeError::InvalidTargetUrl {
                url: entry_url.to_owned(),
                reason: "URL has no host".to_owned(),
            });
        }

        let origin = parsed.origin().ascii_serialization();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(ProbeError::ClientBuild)?;

        Ok(Self {
            client,
            origin,
            entry_url: entry_url.to_owned(),
        })
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn entry_url(&self) -> &str {
        &self.entry_url
    }

    /// GET `url`, following redirects, carrying and persisting session
    /// cookies.
    ///
    /// HTTP status codes are not errors: a 403 WAF page or a themed 404 is
    /// still inspectable HTML, so the body is returned alongside the status.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Http`] only on transport failure (DNS, TLS,
    /// connect, timeout, reset).
    pub async fn fetch(&self, url: &str) -> Result<Page, ProbeError> {
        self.request(Method::GET, url, None, &[]).await
    }

    /// POST a form body to `url` with optional extra headers, under the same
    /// cookie store as [`Self::fetch`].
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Http`] on transport failure.
    pub async fn post_form(
        &self,
        url: &str,
        params: &[(&str, &str)],
        extra_headers: &[(&'static str, &'static str)],
    ) -> Result<Page, ProbeError> {
        self.request(Method::POST, url, Some(params), extra_headers)
            .await
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        form: Option<&[(&str, &str)]>,
        extra_headers: &[(&'static str, &'static str)],
    ) -> Result<Page, ProbeError> {
        let mut request = self.client.request(method, url);
        for (name, value) in extra_headers {
            request = request.header(*name, *value);
        }
        if let Some(params) = form {
            request = request.form(params);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await?;

        tracing::debug!(url, status, bytes = body.len(), "fetched page");

        Ok(Page {
            url: final_url,
            status,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            env: cartprobe_core::Environment::Test,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "debug".to_owned(),
            request_timeout_secs: 5,
            connect_timeout_secs: 2,
            probe_deadline_secs: 30,
            user_agent: "cartprobe-test/0.1".to_owned(),
            verify_tls: true,
            candidate_concurrency: 1,
        }
    }

    #[test]
    fn session_derives_origin_from_entry_url() {
        let session = Session::new(&test_config(), "https://shop.example.com/item/42?x=1").unwrap();
        assert_eq!(session.origin(), "https://shop.example.com");
        assert_eq!(session.entry_url(), "https://shop.example.com/item/42?x=1");
    }

    #[test]
    fn session_rejects_relative_url() {
        let err = Session::new(&test_config(), "/shop/").unwrap_err();
        assert!(
            matches!(err, ProbeError::InvalidTargetUrl { .. }),
            "expected InvalidTargetUrl, got: {err:?}"
        );
    }

    #[test]
    fn session_rejects_non_http_scheme() {
        let err = Session::new(&test_config(), "ftp://example.com/shop/").unwrap_err();
        assert!(
            matches!(err, ProbeError::InvalidTargetUrl { ref url, .. } if url.starts_with("ftp")),
            "expected InvalidTargetUrl, got: {err:?}"
        );
    }
}
