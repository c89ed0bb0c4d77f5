//! Attr - Attribute type/value contracts and wire conversion
//!
//! [`AttributeTypable`] and [`AttributeValuable`] are object safe, so a
//! [`crate::schema::ResourceSchema`] can hold plain attribute types next to
//! provider-defined typed collections.

use std::fmt;

use crate::diag::Diagnostics;
use crate::error::{ConversionError, ConversionResult};
use crate::path::Path;
use crate::schema::AttributeType;
use crate::tftypes::{self, WireData};
use crate::value::{Known, Value, ValueState};

/// Attribute type that can decode wire values
pub trait AttributeTypable: fmt::Debug + fmt::Display + Send + Sync {
    /// Wire type this attribute type decodes from
    fn wire_type(&self) -> tftypes::Type;

    /// Decode a wire value into a value of this type
    fn decode_wire(&self, value: &tftypes::Value) -> ConversionResult<Box<dyn AttributeValuable>>;
}

/// Attribute value produced by an [`AttributeTypable`]
pub trait AttributeValuable: fmt::Debug + fmt::Display + Send + Sync {
    fn is_null(&self) -> bool;

    fn is_unknown(&self) -> bool;

    fn encode_wire(&self) -> tftypes::Value;

    /// Values with their own attribute-level validation return themselves here
    fn as_validateable(&self) -> Option<&dyn ValidateableAttribute> {
        None
    }
}

/// Attribute-level validation, run while validating a configuration
pub trait ValidateableAttribute {
    fn validate_attribute(&self, path: &Path, diags: &mut Diagnostics);
}

impl AttributeType {
    /// Wire type of this attribute type. Custom types use their base's wire type.
    pub fn terraform_type(&self) -> tftypes::Type {
        match self {
            AttributeType::String => tftypes::Type::String,
            AttributeType::Int => tftypes::Type::Number,
            AttributeType::Bool => tftypes::Type::Bool,
            AttributeType::Custom { base, .. } => base.terraform_type(),
            AttributeType::List(inner) => tftypes::Type::List(Box::new(inner.terraform_type())),
            AttributeType::Set(inner) => tftypes::Type::Set(Box::new(inner.terraform_type())),
            AttributeType::Map(inner) => tftypes::Type::Map(Box::new(inner.terraform_type())),
        }
    }

    /// Decode a wire value
    ///
    /// Only the structure is checked here; custom validation functions run
    /// during attribute validation.
    pub fn value_from_terraform(&self, value: &tftypes::Value) -> ConversionResult<Value> {
        let expected = self.terraform_type();
        if value.typ() != &expected {
            return Err(ConversionError::TypeMismatch {
                expected: self.to_string(),
                got: value.typ().to_string(),
            });
        }

        let data = match value.state() {
            ValueState::Null => return Ok(Value::null(self.clone())),
            ValueState::Unknown => return Ok(Value::unknown(self.clone())),
            ValueState::Known(data) => data,
        };

        let known = match (self, data) {
            (AttributeType::Custom { base, .. }, _) => {
                let decoded = base.value_from_terraform(value)?;
                return Ok(Value::from_state(self.clone(), decoded.into_state()));
            }
            (AttributeType::String, WireData::String(s)) => Known::String(s.clone()),
            (AttributeType::Int, WireData::Number(n)) => Known::Int(integer_from_number(n)?),
            (AttributeType::Bool, WireData::Bool(b)) => Known::Bool(*b),
            (AttributeType::List(inner) | AttributeType::Set(inner), WireData::Elements(items)) => {
                Known::Elements(
                    items
                        .iter()
                        .map(|item| inner.value_from_terraform(item))
                        .collect::<ConversionResult<_>>()?,
                )
            }
            (AttributeType::Map(inner), WireData::Map(entries)) => Known::Map(
                entries
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), inner.value_from_terraform(v)?)))
                    .collect::<ConversionResult<_>>()?,
            ),
            _ => {
                return Err(ConversionError::TypeMismatch {
                    expected: self.to_string(),
                    got: value.typ().to_string(),
                });
            }
        };

        Ok(Value::new(self.clone(), known))
    }

    /// Decode a JSON-encoded wire value of this type
    pub fn value_from_json(&self, json: &serde_json::Value) -> ConversionResult<Value> {
        let wire = tftypes::Value::from_json(&self.terraform_type(), json)?;
        self.value_from_terraform(&wire)
    }
}

/// Whole numbers written as floats (e.g. `1.0`) are accepted.
fn integer_from_number(n: &serde_json::Number) -> ConversionResult<i64> {
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    let Some(f) = n.as_f64() else {
        return Err(ConversionError::NumberOutOfRange(n.to_string()));
    };
    if f.fract() != 0.0 {
        return Err(ConversionError::NotAnInteger(n.to_string()));
    }
    if f < i64::MIN as f64 || f >= i64::MAX as f64 {
        return Err(ConversionError::NumberOutOfRange(n.to_string()));
    }
    Ok(f as i64)
}

impl AttributeTypable for AttributeType {
    fn wire_type(&self) -> tftypes::Type {
        self.terraform_type()
    }

    fn decode_wire(&self, value: &tftypes::Value) -> ConversionResult<Box<dyn AttributeValuable>> {
        Ok(Box::new(self.value_from_terraform(value)?))
    }
}

impl AttributeValuable for Value {
    fn is_null(&self) -> bool {
        self.state().is_null()
    }

    fn is_unknown(&self) -> bool {
        self.state().is_unknown()
    }

    fn encode_wire(&self) -> tftypes::Value {
        self.to_terraform_value()
    }

    fn as_validateable(&self) -> Option<&dyn ValidateableAttribute> {
        Some(self)
    }
}

impl ValidateableAttribute for Value {
    fn validate_attribute(&self, path: &Path, diags: &mut Diagnostics) {
        if let Err(e) = self.attr_type().validate(self) {
            diags.add_attribute_error(path.clone(), "Invalid Attribute Value", e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn upper() -> AttributeType {
        AttributeType::Custom {
            name: "UpperString".to_string(),
            base: Box::new(AttributeType::String),
            validate: |value| match value.as_str() {
                Some(s) if s.chars().any(char::is_lowercase) => {
                    Err(format!("'{}' is not upper case", s))
                }
                _ => Ok(()),
            },
        }
    }

    #[test]
    fn custom_types_map_to_base_wire_type() {
        assert_eq!(upper().terraform_type(), tftypes::Type::String);
        assert_eq!(
            AttributeType::Set(Box::new(upper())).terraform_type(),
            tftypes::Type::Set(Box::new(tftypes::Type::String))
        );
    }

    #[test]
    fn decode_keeps_custom_type() {
        let value = upper()
            .value_from_terraform(&tftypes::Value::string("lower"))
            .unwrap();
        assert_eq!(value.attr_type(), &upper());
        assert_eq!(value.as_str(), Some("lower"));
    }

    #[test]
    fn decode_nested_collections() {
        let typ = AttributeType::Map(Box::new(AttributeType::List(Box::new(AttributeType::Int))));
        let wire = tftypes::Value::from_json(&typ.terraform_type(), &json!({"a": [1, 2], "b": null}))
            .unwrap();
        let value = typ.value_from_terraform(&wire).unwrap();
        assert_eq!(value.to_terraform_value(), wire);
    }

    #[test]
    fn decode_rejects_type_mismatch() {
        let wire = tftypes::Value::list(tftypes::Type::String, vec![]).unwrap();
        let err = AttributeType::Set(Box::new(AttributeType::String))
            .value_from_terraform(&wire)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "can't use tftypes.List[tftypes.String] as value of Set<String>"
        );
    }

    #[test]
    fn decode_rejects_fractional_int() {
        let err = AttributeType::Int.value_from_json(&json!(1.5)).unwrap_err();
        assert!(matches!(err, ConversionError::NotAnInteger(_)));
        assert_eq!(err.to_string(), "number 1.5 is not an integer");
    }

    #[test]
    fn decode_accepts_whole_float_int() {
        let value = AttributeType::Int.value_from_json(&json!(1.0)).unwrap();
        assert_eq!(value, Value::int(1));
        let value = AttributeType::Int.value_from_json(&json!(-4.0)).unwrap();
        assert_eq!(value, Value::int(-4));
    }

    #[test]
    fn decode_rejects_out_of_range_int() {
        let err = AttributeType::Int.value_from_json(&json!(u64::MAX)).unwrap_err();
        assert!(matches!(err, ConversionError::NumberOutOfRange(_)));
        let err = AttributeType::Int.value_from_json(&json!(1e19)).unwrap_err();
        assert!(matches!(err, ConversionError::NumberOutOfRange(_)));
    }

    #[test]
    fn decode_json_reports_wire_errors() {
        let t = AttributeType::Set(Box::new(AttributeType::String));
        let err = t.value_from_json(&json!({"a": "b"})).unwrap_err();
        assert!(matches!(err, ConversionError::Wire(_)));

        let value = t.value_from_json(&json!(["b", "a"])).unwrap();
        assert_eq!(value.elements().map(<[Value]>::len), Some(2));
    }

    #[test]
    fn null_and_unknown_decode_to_typed_states() {
        let t = AttributeType::Set(Box::new(upper()));
        let null = t
            .value_from_terraform(&tftypes::Value::null(t.terraform_type()))
            .unwrap();
        let unknown = t
            .value_from_terraform(&tftypes::Value::unknown(t.terraform_type()))
            .unwrap();
        assert!(null.is_null());
        assert!(unknown.is_unknown());
        assert_eq!(null.attr_type(), &t);
    }

    #[test]
    fn validate_attribute_reports_path() {
        let value = upper()
            .decode_wire(&tftypes::Value::string("lower"))
            .unwrap();
        let mut diags = Diagnostics::new();
        let path = Path::root("name");
        value
            .as_validateable()
            .expect("values are validateable")
            .validate_attribute(&path, &mut diags);
        assert_eq!(diags.error_count(), 1);
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.path.as_ref(), Some(&path));
        assert!(diag.detail.contains("not upper case"));
    }
}
