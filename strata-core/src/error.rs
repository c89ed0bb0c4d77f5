//! Conversion errors
//!
//! These are the hard failures of value conversion, for which no sensible
//! fallback value exists. Recoverable problems are reported as
//! [`crate::diag::Diagnostics`] instead.

use crate::diag::Diagnostics;
use crate::tftypes::WireError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// The wire value's type is not the one the attribute type decodes
    #[error("can't use {got} as value of {expected}")]
    TypeMismatch { expected: String, got: String },

    /// A decoded value is not of the kind the caller asked for
    #[error("unexpected value type of {0}")]
    UnexpectedValueType(String),

    #[error("number {0} cannot be represented as a 64-bit integer")]
    NumberOutOfRange(String),

    #[error("number {0} is not an integer")]
    NotAnInteger(String),

    /// Error diagnostics produced while converting between value representations
    #[error("unexpected error converting {from} to {to}: {diagnostics}")]
    Diagnostics {
        from: String,
        to: String,
        diagnostics: Diagnostics,
    },

    #[error(transparent)]
    Wire(#[from] WireError),
}

pub type ConversionResult<T> = Result<T, ConversionError>;
