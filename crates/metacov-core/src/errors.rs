//! Structured error types shared across metacov crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`CovError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (keys, coverage levels, sizes, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the coverage harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum CovError {
    /// A required store key does not exist.
    #[error("not found: {0}")]
    NotFound(ErrorInfo),
    /// Stored content cannot be parsed into the expected shape.
    #[error("corrupt data: {0}")]
    Corrupt(ErrorInfo),
    /// Store read/write IO failures.
    #[error("store error: {0}")]
    Store(ErrorInfo),
    /// Coverage grid validation and column sampling errors.
    #[error("sampling error: {0}")]
    Sampling(ErrorInfo),
    /// The external transform failed for a sampled subset.
    #[error("transform error: {0}")]
    Transform(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl CovError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            CovError::NotFound(info)
            | CovError::Corrupt(info)
            | CovError::Store(info)
            | CovError::Sampling(info)
            | CovError::Transform(info)
            | CovError::Serde(info) => info,
        }
    }

    /// Returns the same error with an extra context entry attached.
    pub fn with_context(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let attach = |info: ErrorInfo| info.with_context(key, value);
        match self {
            CovError::NotFound(info) => CovError::NotFound(attach(info)),
            CovError::Corrupt(info) => CovError::Corrupt(attach(info)),
            CovError::Store(info) => CovError::Store(attach(info)),
            CovError::Sampling(info) => CovError::Sampling(attach(info)),
            CovError::Transform(info) => CovError::Transform(attach(info)),
            CovError::Serde(info) => CovError::Serde(attach(info)),
        }
    }
}
