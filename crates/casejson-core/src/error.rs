//! Error types for the union codec
//!
//! Every failure is surfaced to the caller; nothing is retried internally.

use serde_json::Value;
use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors raised while describing, encoding or decoding a tagged union
#[derive(Error, Debug)]
pub enum CodecError {
    /// The descriptor has no usable variant set (no cases, duplicate case names).
    #[error("`{union}` is not a tagged union: {reason}")]
    NotAUnionType { union: &'static str, reason: String },

    /// A discriminator named a case the destination union does not declare.
    #[error("unknown case `{case}` for union `{union}`, expected one of {expected:?}")]
    UnknownCase {
        union: &'static str,
        case: String,
        expected: Vec<&'static str>,
    },

    /// The number of supplied fields differs from the case's declared arity.
    #[error("case `{union}::{case}` declares {expected} field(s), found {found}")]
    ArityMismatch {
        union: &'static str,
        case: &'static str,
        expected: usize,
        found: usize,
    },

    /// Discriminator-free input does not pick out exactly one case.
    #[error("ambiguous shape for union `{union}`: {reason}")]
    AmbiguousShape { union: &'static str, reason: String },

    /// A raw JSON value could not be converted into the declared field type.
    #[error("cannot coerce {value} into `{target}`: {reason}")]
    Coercion {
        value: Value,
        target: &'static str,
        reason: String,
    },

    /// A positional key was out of place while strict field keys are enabled.
    #[error("unexpected key `{key}` in union `{union}`, expected `{expected}`")]
    UnexpectedKey {
        union: &'static str,
        key: String,
        expected: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
