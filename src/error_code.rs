//! Error kinds: the closed taxonomy every failure of this crate is reported as.
//!
//! ## Kinds
//!
//! | Kind                | Code                  | Origin                              |
//! |---------------------|-----------------------|-------------------------------------|
//! | `Unauthorized`      | `unauthorized`        | HTTP 401                            |
//! | `PaymentRequired`   | `payment_required`    | HTTP 402                            |
//! | `NotFound`          | `not_found`           | HTTP 404                            |
//! | `BadRequest`        | `bad_request`         | HTTP 400                            |
//! | `RateLimitExceeded` | `rate_limit_exceeded` | HTTP 429                            |
//! | `ApiError`          | `api_error`           | any other non-2xx status            |
//! | `Unknown`           | `unknown`             | no response (network, timeout)      |
//! | `ValidationError`   | `validation_error`    | local request validation            |
//!
//! ## Example
//!
//! ```rust
//! use utopian_labs::error_code::ErrorKind;
//!
//! let kind = ErrorKind::from_http_status(429);
//! assert_eq!(kind, ErrorKind::RateLimitExceeded);
//! assert_eq!(kind.code(), "rate_limit_exceeded");
//! assert!(kind.retryable());
//! ```

use std::fmt;

/// Kind of an [`Error`](crate::Error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid or missing API key (HTTP 401)
    Unauthorized,
    /// Requested run or resource does not exist (HTTP 404)
    NotFound,
    /// The API rejected the request body (HTTP 400)
    BadRequest,
    /// Any other non-success status from the API
    ApiError,
    /// No response was received
    Unknown,
    /// Too many requests (HTTP 429)
    RateLimitExceeded,
    /// Account credits exhausted (HTTP 402)
    PaymentRequired,
    /// Request data failed local validation; never sent
    ValidationError,
}

impl ErrorKind {
    /// All kinds, in declaration order.
    pub const ALL: [ErrorKind; 8] = [
        Self::Unauthorized,
        Self::NotFound,
        Self::BadRequest,
        Self::ApiError,
        Self::Unknown,
        Self::RateLimitExceeded,
        Self::PaymentRequired,
        Self::ValidationError,
    ];

    /// Returns the wire code (e.g., `"not_found"`).
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::ApiError => "api_error",
            Self::Unknown => "unknown",
            Self::RateLimitExceeded => "rate_limit_exceeded",
            Self::PaymentRequired => "payment_required",
            Self::ValidationError => "validation_error",
        }
    }

    /// Message used when the response body carries nothing more specific.
    #[inline]
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Invalid API key",
            Self::NotFound => "Resource not found",
            Self::BadRequest => "Bad request",
            Self::ApiError => "API error",
            Self::Unknown => "Network error",
            Self::RateLimitExceeded => "Rate limit exceeded",
            Self::PaymentRequired => "Payment required",
            Self::ValidationError => "Invalid request data",
        }
    }

    /// Whether the message for this kind is taken from the remote `error.message` field.
    #[inline]
    pub fn uses_remote_message(&self) -> bool {
        matches!(self, Self::BadRequest | Self::ApiError)
    }

    /// Whether repeating the same call later may succeed.
    ///
    /// This crate never retries on its own; the flag is a hint for callers.
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded | Self::Unknown)
    }

    /// Whether the failure happened before any request left the process.
    #[inline]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::ValidationError)
    }

    /// Maps a wire code back to its kind.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    /// Maps a non-success HTTP status to its kind.
    ///
    /// The table is total: every status without a dedicated kind is an `ApiError`.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            402 => Self::PaymentRequired,
            404 => Self::NotFound,
            400 => Self::BadRequest,
            429 => Self::RateLimitExceeded,
            _ => Self::ApiError,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
