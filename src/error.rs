//! Error types of the fixture interpreter.
//!
//! Two layers exist. [`LoadError`] is raised while reading and validating a
//! fixture document and aborts the whole run. [`StepError`] is raised by a
//! single step, fails the enclosing test and is recorded in the run report;
//! it serializes as `{"kind": "...", ...context}` so reports can be diffed.

use serde_derive::Serialize;
use serde_json::error::Category;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Device state a step needed but did not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Precondition {
    NoCardScanned,
    NoSolveTime,
    NoSnapshot,
    DelegatePending,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Precondition::NoCardScanned => "no card has been scanned",
            Precondition::NoSolveTime => "no solve time is available",
            Precondition::NoSnapshot => "no snapshot has been taken",
            Precondition::DelegatePending => "a delegate call is still pending",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind")]
pub enum StepError {
    #[error("card {registrant_id} is not present in the suite")]
    #[serde(rename_all = "camelCase")]
    UnknownCard { registrant_id: u64 },

    #[error("button '{name}' is not bound")]
    UnknownButton { name: String },

    #[error("step type '{step_type}' is not supported")]
    #[serde(rename_all = "camelCase")]
    UnsupportedStep { step_type: String },

    #[error("card {registrant_id} cannot compete")]
    #[serde(rename_all = "camelCase")]
    InvalidCard { registrant_id: u64 },

    #[error("precondition failed: {reason}")]
    Precondition { reason: Precondition },

    #[error("verification of '{field}' failed: expected {expected}, actual {actual}")]
    Verification {
        field: String,
        expected: Value,
        actual: Value,
    },
    #[error("cannot capture device state: {reason}")]
    Capture { reason: String },
}

impl StepError {
    pub fn precondition(reason: Precondition) -> Self {
        StepError::Precondition { reason }
    }

    pub fn verification(field: impl Into<String>, expected: Value, actual: Value) -> Self {
        StepError::Verification {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Stable name of the error kind, identical to the serialized `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            StepError::UnknownCard { .. } => "UnknownCard",
            StepError::UnknownButton { .. } => "UnknownButton",
            StepError::UnsupportedStep { .. } => "UnsupportedStep",
            StepError::InvalidCard { .. } => "InvalidCard",
            StepError::Precondition { .. } => "Precondition",
            StepError::Verification { .. } => "Verification",
            StepError::Capture { .. } => "Capture",
        }
    }
}

/// Fatal error while loading a fixture; no test is executed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read fixture {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fixture is not a well-formed document: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("fixture schema error: {reason}")]
    Schema { reason: String },
}

impl LoadError {
    pub fn schema(reason: impl Into<String>) -> Self {
        LoadError::Schema {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => LoadError::schema(err.to_string()),
            _ => LoadError::Syntax(err),
        }
    }
}
