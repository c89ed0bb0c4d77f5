//! String enumerations
//!
//! A `StringEnum<E>` holds a string that is expected to be one of the values
//! of the closed vocabulary `E`. Decoding accepts any string; membership is
//! checked during attribute validation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use strata_core::schema::AttributeType;
use strata_core::{Diagnostics, Known, Path, Value};

use super::ElementValue;

/// Closed vocabulary of string values
pub trait EnumValues: Sized + 'static {
    /// Name used in the attribute type (e.g., `StringEnum[InstanceStateName]`)
    const NAME: &'static str;

    /// All valid values, in API spelling
    fn values() -> &'static [&'static str];

    fn as_str(&self) -> &'static str;
}

/// Element type for `StringEnum<E>`
pub fn string_enum_type<E: EnumValues>() -> AttributeType {
    AttributeType::Custom {
        name: format!("StringEnum[{}]", E::NAME),
        base: Box::new(AttributeType::String),
        validate: |_| Ok(()),
    }
}

/// Set validation hook: every known element must be one of `E::values()`
pub fn validate_string_enum_slice<E: EnumValues>(path: &Path, elements: &[Value]) -> Diagnostics {
    let mut diags = Diagnostics::new();

    for element in elements {
        let Some(s) = element.as_str() else {
            continue;
        };
        if E::values().contains(&s) {
            continue;
        }
        let element_path = path.at_set_value(element);
        diags.add_attribute_error(
            element_path.clone(),
            "Invalid Attribute Value",
            format!(
                "Attribute {} value must be one of: [{}], got: {}",
                element_path,
                E::values()
                    .iter()
                    .map(|v| format!("{:?}", v))
                    .collect::<Vec<_>>()
                    .join(" "),
                element
            ),
        );
    }

    diags
}

/// String constrained to the vocabulary `E`
pub struct StringEnum<E> {
    value: String,
    _enum: PhantomData<fn() -> E>,
}

impl<E: EnumValues> StringEnum<E> {
    /// Wrap a string without checking membership
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _enum: PhantomData,
        }
    }

    pub fn value_string(&self) -> &str {
        &self.value
    }

    pub fn is_valid(&self) -> bool {
        E::values().contains(&self.value.as_str())
    }
}

impl<E: EnumValues> From<E> for StringEnum<E> {
    fn from(value: E) -> Self {
        Self::new(value.as_str())
    }
}

impl<E> Clone for StringEnum<E> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _enum: PhantomData,
        }
    }
}

impl<E: EnumValues> fmt::Debug for StringEnum<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(&format!("StringEnum[{}]", E::NAME))
            .field(&self.value)
            .finish()
    }
}

impl<E> PartialEq for StringEnum<E> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<E> Eq for StringEnum<E> {}

impl<E> Hash for StringEnum<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<E: EnumValues> ElementValue for StringEnum<E> {
    fn element_type() -> AttributeType {
        string_enum_type::<E>()
    }

    fn from_value(value: &Value) -> Option<Self> {
        if value.attr_type() != &string_enum_type::<E>() {
            return None;
        }
        value.as_str().map(Self::new)
    }

    fn into_value(self) -> Value {
        Value::new(string_enum_type::<E>(), Known::String(self.value))
    }
}
