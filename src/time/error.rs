use thiserror::Error;

/// A duration string that could not be read.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("'{0}' is not a duration, expected a number with an optional unit such as 250ms or 30s")]
    Syntax(String),
    #[error("unit '{0}' not supported")]
    UnitNotSupported(String),
}
