//! Strata Core
//!
//! Attribute-type framework for infrastructure providers: typed attribute
//! values with null/unknown states, path-scoped diagnostics, wire-level values
//! and schema validation.

pub mod attr;
pub mod basetypes;
pub mod config;
pub mod diag;
pub mod error;
pub mod path;
pub mod schema;
pub mod tftypes;
pub mod value;

pub use attr::{AttributeTypable, AttributeValuable, ValidateableAttribute};
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use error::{ConversionError, ConversionResult};
pub use path::Path;
pub use value::{Known, Value, ValueState};
