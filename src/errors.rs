// src/errors.rs

//! Crate-wide error types.
//!
//! - [`QueueError`] is the structured failure a task reports. It is what
//!   error listeners receive and what [`crate::engine::Queue::run`] returns.
//! - [`PagequeueError`] covers everything around the queue (plan loading,
//!   IO, serialization) and wraps a `QueueError` when a run fails.

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured failure raised by a task.
///
/// The fields are meant to be mapped by the embedder onto its own error
/// presentation (e.g. an HTTP status and an error page).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{title}: {message}")]
pub struct QueueError {
    /// Short title, e.g. `"Page not found"`.
    pub title: String,
    /// Human-readable message.
    pub message: String,
    /// Status-code-like classification (HTTP semantics by convention).
    pub status_code: u16,
    /// Optional trace / cause chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl QueueError {
    pub fn new(title: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            status_code,
            trace: None,
        }
    }

    /// Attach a trace string.
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// `500 Internal Error` with the given message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("Internal Error", message, 500)
    }

    /// `404 Not Found` with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("Not Found", message, 404)
    }

    /// Convert a panic payload caught while running a task.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "task panicked".to_string()
        };
        Self::new("Task panicked", message, 500)
    }
}

impl From<anyhow::Error> for QueueError {
    fn from(err: anyhow::Error) -> Self {
        let trace = ChainDisplay(&err).to_string();
        Self::internal(err.to_string()).with_trace(trace)
    }
}

/// Renders an anyhow error chain one cause per line.
struct ChainDisplay<'a>(&'a anyhow::Error);

impl fmt::Display for ChainDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cause) in self.0.chain().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{i}: {cause}")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum PagequeueError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Task failed: {0}")]
    Task(#[from] QueueError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PagequeueError>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn display_uses_title_and_message() {
        let err = QueueError::new("Page not found", "The requested page was not found.", 404);
        assert_eq!(
            err.to_string(),
            "Page not found: The requested page was not found."
        );
        assert!(err.trace.is_none());
    }

    #[test]
    fn anyhow_errors_become_internal_with_chain() {
        let err: anyhow::Result<()> =
            Err(anyhow::anyhow!("disk gone")).context("reading template");
        let qe = QueueError::from(err.unwrap_err());

        assert_eq!(qe.status_code, 500);
        assert_eq!(qe.message, "reading template");
        let trace = qe.trace.expect("trace");
        assert!(trace.contains("0: reading template"));
        assert!(trace.contains("1: disk gone"));
    }

    #[test]
    fn panic_payloads_keep_their_message() {
        let qe = QueueError::from_panic(Box::new("boom"));
        assert_eq!(qe.message, "boom");

        let qe = QueueError::from_panic(Box::new(String::from("owned boom")));
        assert_eq!(qe.message, "owned boom");

        let qe = QueueError::from_panic(Box::new(42_u8));
        assert_eq!(qe.message, "task panicked");
        assert_eq!(qe.status_code, 500);
    }
}
