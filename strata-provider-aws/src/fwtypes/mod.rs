//! Framework types
//!
//! Attribute types that AWS resource schemas share. Element types implement
//! [`ElementValue`], which lets the typed collections resolve an element
//! type descriptor from the Rust type alone.

pub mod arn;
pub mod set_of;
pub mod string_enum;

pub use arn::{Arn, ArnError, arn_type};
pub use set_of::{
    SetOfArn, SetOfString, SetOfStringEnum, SetTypeOf, SetValueOf, ValidateAttributeFn,
    set_of_arn_type, set_of_string_enum_type, set_of_string_type,
};
pub use string_enum::{EnumValues, StringEnum, string_enum_type, validate_string_enum_slice};

use strata_core::Value;
use strata_core::schema::AttributeType;

/// Rust type usable as the element of a typed collection
pub trait ElementValue: Sized + 'static {
    /// Type descriptor shared by every element of this kind
    fn element_type() -> AttributeType;

    /// Convert a known value of [`Self::element_type`]; `None` for anything else
    fn from_value(value: &Value) -> Option<Self>;

    fn into_value(self) -> Value;
}

impl ElementValue for String {
    fn element_type() -> AttributeType {
        AttributeType::String
    }

    fn from_value(value: &Value) -> Option<Self> {
        if value.attr_type() != &AttributeType::String {
            return None;
        }
        value.as_str().map(str::to_string)
    }

    fn into_value(self) -> Value {
        Value::string(self)
    }
}

impl ElementValue for i64 {
    fn element_type() -> AttributeType {
        AttributeType::Int
    }

    fn from_value(value: &Value) -> Option<Self> {
        if value.attr_type() != &AttributeType::Int {
            return None;
        }
        value.as_int()
    }

    fn into_value(self) -> Value {
        Value::int(self)
    }
}

impl ElementValue for bool {
    fn element_type() -> AttributeType {
        AttributeType::Bool
    }

    fn from_value(value: &Value) -> Option<Self> {
        if value.attr_type() != &AttributeType::Bool {
            return None;
        }
        value.as_bool()
    }

    fn into_value(self) -> Value {
        Value::bool(self)
    }
}
