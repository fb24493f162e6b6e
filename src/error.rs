//! Error types for telegram conversion.

use thiserror::Error;

/// Reasons a single field's payload fails to coerce to or from its value type.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValueError {
    /// The raw text does not parse as the declared value type.
    #[error("invalid literal {0:?}")]
    InvalidLiteral(String),
    /// A calendar/time field has no format pattern configured.
    #[error("missing date/time format")]
    MissingFormat,
    /// An injected extension hook rejected the value.
    #[error("{0}")]
    Custom(String),
}

/// Error type for decode/encode operations.
///
/// Conversion is all-or-nothing: any variant aborts the whole top-level call.
/// Truncated input is NOT an error; fields beyond the available bytes keep
/// their defaults.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// Value coercion failed for a field.
    #[error("field \"{field}\": {source}")]
    Value {
        field: &'static str,
        source: ValueError,
    },
    /// A width/count reference did not yield a usable integer at call time.
    #[error("field \"{field}\": reference \"{referent}\" holds no usable count")]
    InvalidReference {
        field: &'static str,
        referent: &'static str,
    },
    /// Embedded/list recursion exceeded the configured depth limit.
    #[error("recursion deeper than {0} levels")]
    DepthExceeded(usize),
}
