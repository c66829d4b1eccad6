//! CAPTCHA presence detection.

/// Provider tokens checked in order; the first hit wins. Specific provider
/// markers come first so the debug log names the provider rather than the
/// generic `captcha` token. Tokens outside this list are false negatives by
/// contract, not defects.
const CAPTCHA_TOKENS: &[&str] = &[
    "g-recaptcha",
    "h-captcha",
    "hcaptcha",
    "recaptcha",
    "turnstile",
    "captcha",
];

/// Returns `true` if any known CAPTCHA provider token appears in `html`.
///
/// Substring match over the lowercased payload, which covers provider
/// iframes, script src URLs, widget divs, and hidden response inputs alike.
#[must_use]
pub fn detect_captcha(html: &str) -> bool {
    let lowered = html.to_ascii_lowercase();
    for token in CAPTCHA_TOKENS {
        if lowered.contains(token) {
            tracing::debug!(token, "captcha indicator present");
            return true;
        }
    }
    false
}
