//! 请求/响应数据校验：逐字段收集全部问题，而非遇到第一个错误就返回。
//!
//! Field-level validation of untyped JSON input.
//!
//! A [`Validator`] walks a `serde_json::Value`, keeps track of the current field path and
//! accumulates one [`ValidationIssue`] per violated rule. Nothing short-circuits inside an
//! object, so a [`ValidationReport`] always lists every problem at once:
//!
//! ```rust
//! use utopian_labs::types::RunRequest;
//! use serde_json::json;
//!
//! let report = RunRequest::from_value(&json!({
//!     "agent": "r1",
//!     "lead": { "company": { "website": "" } },
//!     "context": "x".repeat(10_001),
//! }))
//! .unwrap_err();
//!
//! assert_eq!(report.len(), 2);
//! assert!(report.has_path("lead.company.website"));
//! assert!(report.has_path("context"));
//! ```

pub mod rules;

use crate::error::Error;
use serde_json::{Map, Number, Value};
use std::fmt;

/// A single violated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    path: String,
    message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Dot-joined field path (e.g. `events.3.description`); empty for the input root.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Every issue found in one input. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn new(issues: Vec<ValidationIssue>) -> Self {
        debug_assert!(!issues.is_empty());
        Self { issues }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Whether any issue sits exactly at `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.issues.iter().any(|i| i.path == path)
    }

    /// Convert into a `ValidationError` whose message starts with `prefix`.
    pub fn into_error(self, prefix: &str) -> Error {
        Error::validation(prefix, self)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .issues
            .iter()
            .map(ValidationIssue::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for ValidationReport {}

/// JSON type name as it appears in type-mismatch messages.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Renders `'a' | 'b' | 'c'` for enum messages.
pub(crate) fn quoted_choices<'a>(choices: impl IntoIterator<Item = &'a str>) -> String {
    choices
        .into_iter()
        .map(|c| format!("'{}'", c))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Path-tracking issue collector.
#[derive(Debug, Default)]
pub struct Validator {
    path: Vec<String>,
    issues: Vec<ValidationIssue>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue at the current path.
    pub fn report(&mut self, message: impl Into<String>) {
        self.issues
            .push(ValidationIssue::new(self.path.join("."), message));
    }

    /// Run `f` one level deeper in the path.
    pub fn scoped<T>(&mut self, segment: impl ToString, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(segment.to_string());
        let out = f(self);
        self.path.pop();
        out
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Returns the parsed value when no issue was recorded.
    pub fn finish<T>(self, value: Option<T>) -> Result<T, ValidationReport> {
        match value {
            Some(v) if self.issues.is_empty() => Ok(v),
            _ if !self.issues.is_empty() => Err(ValidationReport::new(self.issues)),
            _ => Err(ValidationReport::new(vec![ValidationIssue::new(
                self.path.join("."),
                "Invalid input",
            )])),
        }
    }

    fn mismatch(&mut self, expected: &str, value: &Value) {
        self.report(format!(
            "Expected {}, received {}",
            expected,
            type_name(value)
        ));
    }

    pub fn object<'a>(&mut self, value: &'a Value) -> Option<&'a Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.mismatch("object", other);
                None
            }
        }
    }

    pub fn array<'a>(&mut self, value: &'a Value) -> Option<&'a Vec<Value>> {
        match value {
            Value::Array(items) => Some(items),
            other => {
                self.mismatch("array", other);
                None
            }
        }
    }

    pub fn string(&mut self, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                self.mismatch("string", other);
                None
            }
        }
    }

    pub fn number(&mut self, value: &Value) -> Option<f64> {
        let n = self.json_number(value)?;
        n.as_f64()
    }

    /// Like [`Validator::number`], but keeps the number as written (integers stay integers).
    pub fn json_number(&mut self, value: &Value) -> Option<Number> {
        match value {
            Value::Number(n) => Some(n.clone()),
            other => {
                self.mismatch("number", other);
                None
            }
        }
    }

    pub fn boolean(&mut self, value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            other => {
                self.mismatch("boolean", other);
                None
            }
        }
    }

    /// Open mapping of arbitrary keys to arbitrary values.
    pub fn record(&mut self, value: &Value) -> Option<Map<String, Value>> {
        self.object(value).cloned()
    }

    /// One of `choices`; reports the enum message otherwise.
    pub fn one_of<'c>(&mut self, value: &Value, choices: &[&'c str]) -> Option<&'c str> {
        let s = self.string(value)?;
        match choices.iter().find(|c| **c == s) {
            Some(c) => Some(*c),
            None => {
                self.report(format!(
                    "Invalid enum value. Expected {}, received '{}'",
                    quoted_choices(choices.iter().copied()),
                    s
                ));
                None
            }
        }
    }

    /// A key that must be present.
    pub fn required<'a, T>(
        &mut self,
        obj: &'a Map<String, Value>,
        key: &str,
        parse: impl FnOnce(&mut Self, &'a Value) -> Option<T>,
    ) -> Option<T> {
        self.scoped(key, |v| match obj.get(key) {
            Some(value) => parse(v, value),
            None => {
                v.report("Required");
                None
            }
        })
    }

    /// A key that may be absent. `None` means invalid; `Some(None)` means absent.
    pub fn optional<'a, T>(
        &mut self,
        obj: &'a Map<String, Value>,
        key: &str,
        parse: impl FnOnce(&mut Self, &'a Value) -> Option<T>,
    ) -> Option<Option<T>> {
        self.scoped(key, |v| match obj.get(key) {
            Some(value) => parse(v, value).map(Some),
            None => Some(None),
        })
    }

    /// Like [`Validator::optional`], but an explicit `null` also counts as absent.
    pub fn nullish<'a, T>(
        &mut self,
        obj: &'a Map<String, Value>,
        key: &str,
        parse: impl FnOnce(&mut Self, &'a Value) -> Option<T>,
    ) -> Option<Option<T>> {
        match obj.get(key) {
            Some(Value::Null) => Some(None),
            _ => self.optional(obj, key, parse),
        }
    }

    /// Record `message` when `ok` is false. Returns `ok`.
    pub fn check(&mut self, ok: bool, message: &str) -> bool {
        if !ok {
            self.report(message);
        }
        ok
    }

    /// Inclusive character-count bounds. Both bounds are checked.
    pub fn char_bounds(
        &mut self,
        s: &str,
        min: Option<(usize, &str)>,
        max: Option<(usize, &str)>,
    ) -> bool {
        // Limits are in UTF-16 code units, the way the API counts them.
        let len = s.encode_utf16().count();
        let mut ok = true;
        if let Some((min, message)) = min {
            ok &= self.check(len >= min, message);
        }
        if let Some((max, message)) = max {
            ok &= self.check(len <= max, message);
        }
        ok
    }

    /// Inclusive numeric bounds with the default range messages.
    pub fn number_bounds(&mut self, n: f64, min: f64, max: f64) -> bool {
        let lower = self.check(
            n >= min,
            &format!("Number must be greater than or equal to {}", min),
        );
        let upper = self.check(
            n <= max,
            &format!("Number must be less than or equal to {}", max),
        );
        lower && upper
    }

    /// Inclusive array-length bounds with caller-supplied messages.
    pub fn len_bounds(&mut self, len: usize, min: Option<(usize, &str)>, max: Option<(usize, &str)>) -> bool {
        let mut ok = true;
        if let Some((min, message)) = min {
            ok &= self.check(len >= min, message);
        }
        if let Some((max, message)) = max {
            ok &= self.check(len <= max, message);
        }
        ok
    }

    /// Parse every element of an array, each under its index.
    pub fn each<'a, T>(
        &mut self,
        items: &'a [Value],
        mut parse: impl FnMut(&mut Self, &'a Value) -> Option<T>,
    ) -> Option<Vec<T>> {
        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for (i, item) in items.iter().enumerate() {
            match self.scoped(i, |v| parse(v, item)) {
                Some(parsed) => out.push(parsed),
                None => ok = false,
            }
        }
        ok.then_some(out)
    }
}
