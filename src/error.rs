use crate::error_code::ErrorKind;
use crate::transport::TransportError;
use crate::validation::{ValidationIssue, ValidationReport};
use serde_json::Value;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path that caused the error (e.g., "lead.company.website")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., the raw response body)
    pub details: Option<String>,
    /// Source of the error (e.g., "transport", "request_validator", "response_validator", "config")
    pub source: Option<String>,
    /// HTTP status, when the error was produced from a response
    pub status: Option<u16>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// The single error type of the crate: a [`ErrorKind`] plus a human-readable message.
///
/// Callers branch on [`Error::kind`]; the message is for humans.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: ErrorContext,
    issues: Vec<ValidationIssue>,
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: ErrorContext::new(),
            issues: Vec::new(),
            cause: None,
        }
    }

    /// Create an error carrying structured context.
    pub fn with_context(kind: ErrorKind, message: impl Into<String>, context: ErrorContext) -> Self {
        Self {
            context,
            ..Self::new(kind, message)
        }
    }

    /// Create a `ValidationError` listing every issue of `report`.
    ///
    /// `prefix` is the leading phrase, e.g. "Invalid request data".
    pub fn validation(prefix: &str, report: ValidationReport) -> Self {
        Self::from_report(prefix, "request_validator", report)
    }

    /// Create a `ValidationError` for a response body that does not match its schema.
    pub fn invalid_response(report: ValidationReport) -> Self {
        Self::from_report("Invalid response data", "response_validator", report)
    }

    fn from_report(prefix: &str, source: &str, report: ValidationReport) -> Self {
        let message = format!("{}: {}", prefix, report);
        let mut context = ErrorContext::new().with_source(source);
        if let Some(first) = report.issues().first() {
            context = context.with_field_path(first.path());
        }
        Self {
            kind: ErrorKind::ValidationError,
            message,
            context,
            issues: report.into_issues(),
            cause: None,
        }
    }

    /// Create a `ValidationError` for bad client configuration.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::with_context(
            ErrorKind::ValidationError,
            message,
            ErrorContext::new().with_source("config"),
        )
    }

    /// Produce the taxonomy error for a non-success response.
    ///
    /// `BadRequest` and `ApiError` take their message from `error.message` in the body
    /// when it is a string; every other kind uses its fixed message.
    pub fn from_response(status: u16, body: &Value) -> Self {
        let kind = ErrorKind::from_http_status(status);
        let message = if kind.uses_remote_message() {
            body.pointer("/error/message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(kind.default_message())
                .to_string()
        } else {
            kind.default_message().to_string()
        };
        let mut context = ErrorContext::new()
            .with_source("transport")
            .with_status(status);
        if !body.is_null() {
            context = context.with_details(body.to_string());
        }
        Self::with_context(kind, message, context)
    }

    /// Produce the `Unknown` error for a request that received no response.
    pub fn from_transport(err: TransportError) -> Self {
        let message = match err.to_string() {
            m if m.trim().is_empty() => ErrorKind::Unknown.default_message().to_string(),
            m => m,
        };
        Self {
            kind: ErrorKind::Unknown,
            message,
            context: ErrorContext::new().with_source("transport"),
            issues: Vec::new(),
            cause: Some(Box::new(err)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &ErrorContext {
        &self.context
    }

    /// HTTP status of the response that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        self.context.status
    }

    /// Field-level issues; non-empty only for request/response validation failures.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Returns whether `err` (or anything in its source chain) is an error of this crate.
    pub fn is_sdk_error(err: &(dyn std::error::Error + 'static)) -> bool {
        Self::find_in_chain(err).is_some()
    }

    /// Finds the first error of this crate in the source chain of `err`.
    pub fn find_in_chain<'a>(err: &'a (dyn std::error::Error + 'static)) -> Option<&'a Error> {
        let mut current = Some(err);
        while let Some(e) = current {
            if let Some(found) = e.downcast_ref::<Error>() {
                return Some(found);
            }
            current = e.source();
        }
        None
    }
}
