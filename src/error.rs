// File: src/error.rs
//! Error types for hangul_align.

use std::fmt;
use thiserror::Error;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a phonological conversion lookup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionFailure {
    /// The first argument is not a trailing consonant.
    NotTrailing,
    /// The second argument is not a leading consonant.
    NotLeading,
    /// The table has no rule for the pair.
    MissingRule,
    /// The stored rule is not `TRAILINGS/LEADINGS`.
    Malformed(String),
}

impl fmt::Display for ConversionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionFailure::NotTrailing => write!(f, "first jamo is not a trailing consonant"),
            ConversionFailure::NotLeading => write!(f, "second jamo is not a leading consonant"),
            ConversionFailure::MissingRule => write!(f, "no conversion rule for the pair"),
            ConversionFailure::Malformed(rule) => {
                write!(f, "malformed rule {rule:?}, expected 'TRAILINGS/LEADINGS'")
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// One of the texts has no Hangul left after sanitization.
    #[error("no Hangul left after filtering: reference {reference:?}, raw {raw:?}")]
    EmptyInput { reference: String, raw: String },

    /// A single-jamo precondition was violated.
    #[error("expected exactly one jamo, got {input:?}")]
    Classification { input: String },

    #[error("cannot convert {trailing:?} + {leading:?}: {reason}")]
    Conversion {
        trailing: char,
        leading: char,
        reason: ConversionFailure,
    },

    /// The predecessor chain broke during backtracking.
    #[error("broken alignment path at ({row}, {col}): {reason} (reference {reference:?}, raw {raw:?})")]
    Path {
        row: usize,
        col: usize,
        reason: String,
        reference: String,
        raw: String,
    },

    /// An index fell outside the decomposed sequence it refers to.
    #[error("index {index} out of bounds (length {len}) while {context}")]
    Mapping {
        index: usize,
        len: usize,
        context: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A table document parsed but holds an entry of the wrong category.
    #[error("invalid cost table: {0}")]
    Table(String),

    #[error("table document error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("table cache error: {0}")]
    Cache(#[from] bincode::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for the errors that exploratory cost lookups swallow into an
    /// infinite cost.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, Error::Classification { .. } | Error::Conversion { .. })
    }
}
