//! # Response metadata and classified task outcomes.
//!
//! [`ResponseMeta`] is the diagnostic snapshot a transport-shaped task attaches
//! to its result: status code, success flag, message, bodies and headers.
//! [`Outcome`] pairs it with the decoded payload. The success flag is set by
//! the caller's transport layer (e.g. from an HTTP status range); this crate
//! only consumes it during classification.

use std::fmt;

/// Snapshot of response metadata captured for diagnostics.
///
/// All fields are optional in spirit: a task that is not transport-shaped can
/// leave everything at its default and rely on
/// [`TaskError::Fail`](crate::TaskError) instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    /// Protocol status code (0 when not applicable).
    pub code: u16,
    /// Whether the transport classified this response as successful.
    pub successful: bool,
    /// Status message, if any.
    pub message: Option<String>,
    /// Rendered response body, if captured.
    pub body: Option<String>,
    /// Rendered error body, if captured.
    pub error_body: Option<String>,
    /// Response headers as name/value pairs.
    pub headers: Vec<(String, String)>,
}

impl fmt::Display for ResponseMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "code: {}", self.code)?;
        writeln!(f, "successful: {}", self.successful)?;
        writeln!(f, "message: {}", self.message.as_deref().unwrap_or("-"))?;
        writeln!(f, "body: {}", self.body.as_deref().unwrap_or("-"))?;
        writeln!(
            f,
            "error_body: {}",
            self.error_body.as_deref().unwrap_or("-")
        )?;
        write!(f, "headers: [")?;
        for (i, (name, value)) in self.headers.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "]")
    }
}

impl ResponseMeta {
    /// Metadata for a plain successful outcome with no transport detail.
    pub fn ok() -> Self {
        Self {
            successful: true,
            ..Self::default()
        }
    }
}

/// A task's raw result: decoded payload plus response metadata.
///
/// Classification into [`TaskState::Success`](crate::TaskState) or
/// [`TaskState::Error`](crate::TaskState) is driven entirely by
/// [`ResponseMeta::successful`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    /// Decoded payload; may be absent even on success (e.g. empty body).
    pub payload: Option<T>,
    /// Response metadata snapshot.
    pub meta: ResponseMeta,
}

impl<T> Outcome<T> {
    /// A successful outcome with a payload and default metadata.
    pub fn success(payload: T) -> Self {
        Self {
            payload: Some(payload),
            meta: ResponseMeta::ok(),
        }
    }

    /// An outcome carrying explicit transport metadata.
    pub fn with_meta(payload: Option<T>, meta: ResponseMeta) -> Self {
        Self { payload, meta }
    }

    /// A non-success outcome described only by its metadata.
    pub fn failure(meta: ResponseMeta) -> Self {
        Self {
            payload: None,
            meta,
        }
    }

    /// Whether the caller-supplied classifier marked this outcome successful.
    pub fn is_success(&self) -> bool {
        self.meta.successful
    }
}
