//! Primitive value rules shared by the request schemas.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Callback hosts that are always accepted, checked before the deny list.
pub const CALLBACK_ALLOWED_PATTERNS: &[&str] = &["https://integrations.utopianlabs.ai"];

/// Substrings that make a callback URL unacceptable unless an allowed pattern matches.
pub const CALLBACK_BLOCKED_PATTERNS: &[&str] = &[
    "localhost",
    "127.0.0.1",
    "utopianlabs",
    "utopian-labs",
    "luna.ai",
    "getluna.dev",
];

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("static e-mail pattern")
});

/// Whether `value` parses as an absolute URL.
pub fn is_absolute_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Accepts absolute URLs and bare domains (`example.com`), i.e. anything that parses as an
/// absolute URL as-is or once prefixed with `https://`.
pub fn is_valid_domain_or_url(value: &str) -> bool {
    is_absolute_url(value) || is_absolute_url(&format!("https://{}", value))
}

/// Allow/deny policy for `callback_url`, matched case-insensitively against the full string.
///
/// An allowed pattern wins even when a blocked substring is also present.
pub fn is_allowed_callback_url(value: &str) -> bool {
    let lower = value.to_lowercase();
    CALLBACK_ALLOWED_PATTERNS
        .iter()
        .any(|p| lower.contains(&p.to_lowercase()))
        || !CALLBACK_BLOCKED_PATTERNS
            .iter()
            .any(|p| lower.contains(&p.to_lowercase()))
}

pub fn is_valid_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL_RE.is_match(value)
}
