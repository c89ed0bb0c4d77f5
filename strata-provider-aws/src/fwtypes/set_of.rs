//! Typed sets
//!
//! `SetTypeOf<T>` / `SetValueOf<T>` parameterize the generic set over an
//! element type, so schemas can declare `Set<ARN>`, `Set<String>` or
//! `Set<StringEnum<E>>` without repeating conversion and validation code.
//!
//! Problems with individual elements never abort a conversion. The value
//! falls back to unknown and the problems are returned as diagnostics, so a
//! validation pass can keep going and report other attributes too. Only
//! decoding a wire value turns such diagnostics into a hard error.

use std::fmt;
use std::marker::PhantomData;

use strata_core::basetypes::{SetType, SetValue};
use strata_core::schema::AttributeType;
use strata_core::{
    AttributeTypable, AttributeValuable, ConversionError, ConversionResult, Diagnostics, Path,
    ValidateableAttribute, Value, tftypes,
};

use super::arn::Arn;
use super::string_enum::{EnumValues, StringEnum, validate_string_enum_slice};
use super::ElementValue;

/// Attribute-level validation over all elements of a set
pub type ValidateAttributeFn = fn(&Path, &[Value]) -> Diagnostics;

/// Attribute type of a [`SetValueOf`]
pub struct SetTypeOf<T> {
    set_type: SetType,
    validate_attribute_fn: Option<ValidateAttributeFn>,
    _element: PhantomData<fn() -> T>,
}

pub type SetOfString = SetValueOf<String>;
pub type SetOfArn = SetValueOf<Arn>;
pub type SetOfStringEnum<E> = SetValueOf<StringEnum<E>>;

/// Set of strings
pub fn set_of_string_type() -> SetTypeOf<String> {
    SetTypeOf::new()
}

/// Set of ARNs
pub fn set_of_arn_type() -> SetTypeOf<Arn> {
    SetTypeOf::new()
}

/// Set of enumeration values; membership is checked during attribute validation
pub fn set_of_string_enum_type<E: EnumValues>() -> SetTypeOf<StringEnum<E>> {
    SetTypeOf::<StringEnum<E>>::new().with_validator(validate_string_enum_slice::<E>)
}

impl<T: ElementValue> SetTypeOf<T> {
    pub fn new() -> Self {
        Self {
            set_type: SetType::new(T::element_type()),
            validate_attribute_fn: None,
            _element: PhantomData,
        }
    }

    /// Attach a validation hook that runs on known values during attribute validation
    pub fn with_validator(mut self, validate: ValidateAttributeFn) -> Self {
        self.validate_attribute_fn = Some(validate);
        self
    }

    pub fn set_type(&self) -> &SetType {
        &self.set_type
    }

    pub fn element_type(&self) -> &AttributeType {
        self.set_type.element_type()
    }

    /// Zero value of this type (null)
    pub fn value_type(&self) -> SetValueOf<T> {
        SetValueOf::default()
    }

    /// Convert a generic set to a typed one
    ///
    /// Null and unknown pass through. Known elements are re-validated against
    /// `T`; on failure the result is unknown and the diagnostics say why.
    pub fn value_from_set(&self, set: SetValue) -> (SetValueOf<T>, Diagnostics) {
        if set.is_null() {
            return (SetValueOf::null(), Diagnostics::new());
        }
        if set.is_unknown() {
            return (SetValueOf::unknown(), Diagnostics::new());
        }

        if &set.set_type() != self.set_type() {
            let mut diags = Diagnostics::new();
            diags.add_error(
                "Set Element Type Mismatch",
                format!(
                    "Cannot use a Set with element type {} as {}.",
                    set.element_type(),
                    self
                ),
            );
            log::debug!("{}: falling back to unknown: {}", self, diags);
            return (SetValueOf::unknown(), diags);
        }

        self.value_from_elements(set.into_elements())
    }

    /// Build a value of this type from raw elements, carrying the type's validation hook
    pub fn value_from_elements(&self, elements: Vec<Value>) -> (SetValueOf<T>, Diagnostics) {
        let (value, diags) = SetValueOf::<T>::new(elements);
        if diags.has_error() {
            return (value, diags);
        }
        (value.with_validator(self.validate_attribute_fn), diags)
    }

    /// Decode a wire value
    ///
    /// Decode failures, a decoded value that is not a set, and error
    /// diagnostics from the typed conversion are all returned as errors.
    pub fn value_from_terraform(&self, value: &tftypes::Value) -> ConversionResult<SetValueOf<T>> {
        let decoded = self.set_type.value_from_terraform(value)?;
        let set = SetValue::try_from(decoded)?;

        let (typed, diags) = self.value_from_set(set);
        if diags.has_error() {
            log::debug!("{}: conversion from wire value failed: {}", self, diags);
            return Err(ConversionError::Diagnostics {
                from: self.set_type.to_string(),
                to: self.to_string(),
                diagnostics: diags,
            });
        }

        Ok(typed)
    }

    /// Decode a JSON-encoded wire value of this type
    pub fn value_from_json(&self, json: &serde_json::Value) -> ConversionResult<SetValueOf<T>> {
        let wire = tftypes::Value::from_json(&self.wire_type(), json)?;
        self.value_from_terraform(&wire)
    }
}

impl<T: ElementValue> Default for SetTypeOf<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SetTypeOf<T> {
    fn clone(&self) -> Self {
        Self {
            set_type: self.set_type.clone(),
            validate_attribute_fn: self.validate_attribute_fn,
            _element: PhantomData,
        }
    }
}

// Only the element type takes part in identity; the validation hook does not.
impl<T> PartialEq for SetTypeOf<T> {
    fn eq(&self, other: &Self) -> bool {
        self.set_type == other.set_type
    }
}

impl<T> Eq for SetTypeOf<T> {}

impl<T> fmt::Debug for SetTypeOf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetTypeOf")
            .field("element_type", self.set_type.element_type())
            .field("has_validator", &self.validate_attribute_fn.is_some())
            .finish()
    }
}

impl<T> fmt::Display for SetTypeOf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SetTypeOf[{}]", self.set_type.element_type())
    }
}

impl<T: ElementValue> AttributeTypable for SetTypeOf<T> {
    fn wire_type(&self) -> tftypes::Type {
        self.set_type.attr_type().terraform_type()
    }

    fn decode_wire(&self, value: &tftypes::Value) -> ConversionResult<Box<dyn AttributeValuable>> {
        Ok(Box::new(self.value_from_terraform(value)?))
    }
}

/// Set value whose elements are of type `T`
pub struct SetValueOf<T> {
    set_value: SetValue,
    validate_attribute_fn: Option<ValidateAttributeFn>,
    _element: PhantomData<fn() -> T>,
}

impl<T: ElementValue> SetValueOf<T> {
    /// Attribute absent
    pub fn null() -> Self {
        Self::from_set_value(SetValue::null(T::element_type()))
    }

    /// Value not yet known
    pub fn unknown() -> Self {
        Self::from_set_value(SetValue::unknown(T::element_type()))
    }

    /// Create a known value from elements of `T`'s type
    ///
    /// Each element must have `T`'s element type and pass its conformance
    /// check. Otherwise the result is unknown, with a diagnostic per problem.
    pub fn new(elements: Vec<Value>) -> (Self, Diagnostics) {
        let element_type = T::element_type();

        // Wrongly typed elements are reported by SetValue::new.
        let mut conformance = Diagnostics::new();
        for (idx, element) in elements.iter().enumerate() {
            if element.attr_type() != &element_type {
                continue;
            }
            if let Err(e) = element_type.validate(element) {
                conformance.add_error(
                    "Invalid Set Element",
                    format!(
                        "Set element {} ({}) is not a valid {}: {}",
                        idx, element, element_type, e
                    ),
                );
            }
        }

        let (set_value, mut diags) = SetValue::new(element_type.clone(), elements);
        diags.append(conformance);
        if diags.has_error() {
            log::debug!("SetValueOf[{}]: falling back to unknown: {}", element_type, diags);
            return (Self::unknown(), diags);
        }

        (Self::from_set_value(set_value), diags)
    }

    /// Like [`SetValueOf::new`], for fixed element lists known to be valid
    ///
    /// # Panics
    ///
    /// Panics if creating the value produces error diagnostics.
    pub fn new_must(elements: Vec<Value>) -> Self {
        let (value, diags) = Self::new(elements);
        if diags.has_error() {
            panic!("{}", diags);
        }
        value
    }

    pub fn from_typed(elements: impl IntoIterator<Item = T>) -> (Self, Diagnostics) {
        Self::new(elements.into_iter().map(ElementValue::into_value).collect())
    }

    fn from_set_value(set_value: SetValue) -> Self {
        Self {
            set_value,
            validate_attribute_fn: None,
            _element: PhantomData,
        }
    }

    fn with_validator(mut self, validate: Option<ValidateAttributeFn>) -> Self {
        self.validate_attribute_fn = validate;
        self
    }

    /// Type of this value. The validation hook is not part of it.
    pub fn attr_type(&self) -> SetTypeOf<T> {
        SetTypeOf::new()
    }

    pub fn set_value(&self) -> &SetValue {
        &self.set_value
    }

    pub fn is_null(&self) -> bool {
        self.set_value.is_null()
    }

    pub fn is_unknown(&self) -> bool {
        self.set_value.is_unknown()
    }

    /// Elements in insertion order; empty when null or unknown
    pub fn elements(&self) -> &[Value] {
        self.set_value.elements()
    }

    /// Elements converted to `T`
    pub fn typed_elements(&self) -> ConversionResult<Vec<T>> {
        self.elements()
            .iter()
            .map(|element| {
                T::from_value(element).ok_or_else(|| {
                    ConversionError::UnexpectedValueType(format!(
                        "{} element {}",
                        element.attr_type(),
                        element
                    ))
                })
            })
            .collect()
    }

    pub fn to_terraform_value(&self) -> tftypes::Value {
        self.set_value.to_terraform_value()
    }
}

impl<T: ElementValue> Default for SetValueOf<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> Clone for SetValueOf<T> {
    fn clone(&self) -> Self {
        Self {
            set_value: self.set_value.clone(),
            validate_attribute_fn: self.validate_attribute_fn,
            _element: PhantomData,
        }
    }
}

// Equal when the underlying sets are equal, regardless of the validation hook.
impl<T> PartialEq for SetValueOf<T> {
    fn eq(&self, other: &Self) -> bool {
        self.set_value == other.set_value
    }
}

impl<T> fmt::Debug for SetValueOf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetValueOf")
            .field("set_value", &self.set_value)
            .field("has_validator", &self.validate_attribute_fn.is_some())
            .finish()
    }
}

impl<T> fmt::Display for SetValueOf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.set_value)
    }
}

impl<T: ElementValue> ValidateableAttribute for SetValueOf<T> {
    fn validate_attribute(&self, path: &Path, diags: &mut Diagnostics) {
        if self.is_null() || self.is_unknown() {
            return;
        }
        let Some(validate) = self.validate_attribute_fn else {
            return;
        };
        diags.append(validate(path, self.elements()));
    }
}

impl<T: ElementValue> AttributeValuable for SetValueOf<T> {
    fn is_null(&self) -> bool {
        self.set_value.is_null()
    }

    fn is_unknown(&self) -> bool {
        self.set_value.is_unknown()
    }

    fn encode_wire(&self) -> tftypes::Value {
        self.to_terraform_value()
    }

    fn as_validateable(&self) -> Option<&dyn ValidateableAttribute> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::InstanceStateName;
    use crate::fwtypes::arn_type;
    use strata_core::Known;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn strings(items: &[&str]) -> Vec<Value> {
        items.iter().map(|s| Value::string(*s)).collect()
    }

    fn arn_element(s: &str) -> Value {
        Value::new(arn_type(), Known::String(s.to_string()))
    }

    fn states(items: &[&str]) -> Vec<Value> {
        items
            .iter()
            .map(|s| StringEnum::<InstanceStateName>::new(*s).into_value())
            .collect()
    }

    fn always_fails(path: &Path, _elements: &[Value]) -> Diagnostics {
        let mut diags = Diagnostics::new();
        diags.add_attribute_error(path.clone(), "Rejected", "hook always fails");
        diags
    }

    #[test]
    fn set_of_string_end_to_end() {
        let (value, diags) = SetOfString::new(strings(&["a", "b"]));
        assert!(diags.is_empty());
        assert_eq!(value.elements(), strings(&["a", "b"]).as_slice());
        assert!(!value.is_null());
        assert!(!value.is_unknown());
        assert_eq!(
            value.typed_elements().unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn elements_round_trip_for_each_element_type() {
        let arns = vec![
            arn_element("arn:aws:iam::123456789012:role/a"),
            arn_element("arn:aws:s3:::bucket"),
        ];
        let (value, diags) = SetOfArn::new(arns.clone());
        assert!(diags.is_empty());
        assert_eq!(value.elements(), arns.as_slice());

        let (value, diags) = SetOfStringEnum::<InstanceStateName>::new(states(&["running"]));
        assert!(diags.is_empty());
        assert_eq!(value.elements(), states(&["running"]).as_slice());

        let (value, diags) = SetOfString::new(vec![]);
        assert!(diags.is_empty());
        assert!(value.elements().is_empty());
        assert!(!value.is_null());

        let (value, diags) = SetValueOf::<i64>::new(vec![Value::int(3), Value::int(-1)]);
        assert!(diags.is_empty());
        assert_eq!(value.elements(), &[Value::int(3), Value::int(-1)]);
        assert_eq!(value.typed_elements().unwrap(), vec![3, -1]);

        let (value, diags) = SetValueOf::<bool>::from_typed([true, false]);
        assert!(diags.is_empty());
        assert_eq!(value.elements(), &[Value::bool(true), Value::bool(false)]);
        assert_eq!(value.typed_elements().unwrap(), vec![true, false]);
    }

    #[test]
    fn equality_ignores_element_order() {
        let (ab, _) = SetOfString::new(strings(&["a", "b"]));
        let (ba, _) = SetOfString::new(strings(&["b", "a"]));
        assert_eq!(ab, ba);
        assert_ne!(ab, SetOfString::new(strings(&["a", "c"])).0);
        assert_ne!(ab, SetOfString::new(strings(&["a", "b", "c"])).0);
    }

    #[test]
    fn null_and_unknown_construction() {
        let null = SetOfArn::null();
        assert!(null.is_null());
        assert!(!null.is_unknown());
        assert_eq!(null.set_value().element_type(), &arn_type());

        let unknown = SetOfArn::unknown();
        assert!(unknown.is_unknown());
        assert!(!unknown.is_null());

        assert_eq!(SetOfString::default(), SetOfString::null());
        assert_eq!(set_of_string_type().value_type(), SetOfString::null());
    }

    #[test]
    fn nonconforming_element_yields_unknown() {
        init_logging();
        let (value, diags) = SetOfArn::new(vec![
            arn_element("arn:aws:s3:::bucket"),
            arn_element("x"),
        ]);
        assert!(value.is_unknown());
        assert!(diags.has_error());
        let detail = &diags.iter().next().unwrap().detail;
        assert!(detail.contains("Set element 1 (\"x\") is not a valid ARN"));

        let (value, diags) = SetOfArn::new(vec![arn_element("arn:aws:s3:::bucket")]);
        assert!(!value.is_unknown());
        assert!(diags.is_empty());
    }

    #[test]
    fn mixed_problems_are_all_reported() {
        let (value, diags) = SetOfArn::new(vec![
            arn_element("arn:aws:s3:::bucket"),
            Value::string("arn:aws:s3:::other"),
            arn_element("x"),
        ]);
        assert!(value.is_unknown());
        assert_eq!(diags.error_count(), 2);

        let summaries: Vec<&str> = diags.iter().map(|d| d.summary.as_str()).collect();
        assert_eq!(summaries, vec!["Invalid Set Element Type", "Invalid Set Element"]);
        let detail = &diags.iter().nth(1).unwrap().detail;
        assert!(detail.contains("Set element 2 (\"x\") is not a valid ARN"));
    }

    #[test]
    fn wrong_element_type_yields_unknown() {
        let (value, diags) = SetOfArn::new(strings(&["arn:aws:s3:::bucket"]));
        assert!(value.is_unknown());
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.iter().next().unwrap().summary, "Invalid Set Element Type");
    }

    #[test]
    #[should_panic(expected = "Invalid Set Element Type")]
    fn new_must_panics_on_error() {
        SetOfString::new_must(vec![Value::int(1)]);
    }

    #[test]
    fn from_typed_elements() {
        let (value, diags) = SetOfStringEnum::<InstanceStateName>::from_typed([
            StringEnum::from(InstanceStateName::Running),
            StringEnum::from(InstanceStateName::Stopped),
        ]);
        assert!(diags.is_empty());
        assert_eq!(value.elements(), states(&["running", "stopped"]).as_slice());
    }

    #[test]
    fn equality_ignores_validator() {
        let set_type = set_of_string_enum_type::<InstanceStateName>();
        let (hooked, _) = set_type.value_from_elements(states(&["running"]));
        let (plain, _) = SetOfStringEnum::<InstanceStateName>::new(states(&["running"]));

        assert_eq!(hooked, hooked.clone());
        assert_eq!(hooked, plain);
        assert_eq!(plain, hooked);
        assert_ne!(
            plain,
            SetOfStringEnum::<InstanceStateName>::new(states(&["stopped"])).0
        );
        assert_eq!(set_type, hooked.attr_type());
    }

    #[test]
    fn type_display() {
        assert_eq!(set_of_arn_type().to_string(), "SetTypeOf[ARN]");
        assert_eq!(
            set_of_string_enum_type::<InstanceStateName>().to_string(),
            "SetTypeOf[StringEnum[InstanceStateName]]"
        );
    }

    #[test]
    fn value_from_set_propagates_null_and_unknown() {
        let set_type = set_of_arn_type();
        let (value, diags) = set_type.value_from_set(SetValue::null(arn_type()));
        assert!(value.is_null());
        assert!(diags.is_empty());

        let (value, diags) = set_type.value_from_set(SetValue::unknown(arn_type()));
        assert!(value.is_unknown());
        assert!(diags.is_empty());
    }

    #[test]
    fn value_from_set_rejects_mismatched_element_type() {
        let (generic, _) = SetValue::new(AttributeType::Int, vec![]);
        let (value, diags) = set_of_string_type().value_from_set(generic);
        assert!(value.is_unknown());
        assert_eq!(diags.error_count(), 1);
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.summary, "Set Element Type Mismatch");
        assert!(diag.detail.contains("element type Int as SetTypeOf[String]"));
    }

    #[test]
    fn value_from_set_carries_validator() {
        let set_type = set_of_string_enum_type::<InstanceStateName>();
        let element_type = set_type.element_type().clone();
        let (generic, _) = SetValue::new(element_type, states(&["paused"]));
        let (value, diags) = set_type.value_from_set(generic);
        assert!(diags.is_empty());

        let mut diags = Diagnostics::new();
        value.validate_attribute(&Path::root("states"), &mut diags);
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn validate_attribute_skips_null_and_unknown() {
        let set_type = SetTypeOf::<String>::new().with_validator(always_fails);

        let mut diags = Diagnostics::new();
        let (null, _) = set_type.value_from_set(SetValue::null(AttributeType::String));
        null.validate_attribute(&Path::root("names"), &mut diags);
        let (unknown, _) = set_type.value_from_set(SetValue::unknown(AttributeType::String));
        unknown.validate_attribute(&Path::root("names"), &mut diags);
        assert!(diags.is_empty());

        let (known, _) = set_type.value_from_elements(strings(&["a"]));
        known.validate_attribute(&Path::root("names"), &mut diags);
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn validate_attribute_without_validator_is_noop() {
        let (value, _) = SetOfString::new(strings(&["a"]));
        let mut diags = Diagnostics::new();
        value.validate_attribute(&Path::root("names"), &mut diags);
        assert!(diags.is_empty());
    }

    #[test]
    fn decode_from_wire() {
        let wire = tftypes::Value::set(
            tftypes::Type::String,
            vec![
                tftypes::Value::string("arn:aws:sns:us-east-1:123456789012:alerts"),
                tftypes::Value::string("arn:aws:sqs:us-east-1:123456789012:jobs"),
            ],
        )
        .unwrap();
        let value = set_of_arn_type().value_from_terraform(&wire).unwrap();
        let arns = value.typed_elements().unwrap();
        assert_eq!(arns[0].service, "sns");
        assert_eq!(arns[1].resource, "jobs");
        assert_eq!(value.to_terraform_value(), wire);
    }

    #[test]
    fn decode_null_and_unknown_from_wire() {
        let typ = tftypes::Type::Set(Box::new(tftypes::Type::String));
        let null = set_of_string_type()
            .value_from_terraform(&tftypes::Value::null(typ.clone()))
            .unwrap();
        assert!(null.is_null());
        let unknown = set_of_string_type()
            .value_from_terraform(&tftypes::Value::unknown(typ))
            .unwrap();
        assert!(unknown.is_unknown());
    }

    #[test]
    fn decode_rejects_wrong_wire_type() {
        let wire = tftypes::Value::list(tftypes::Type::String, vec![]).unwrap();
        let err = set_of_string_type().value_from_terraform(&wire).unwrap_err();
        assert!(matches!(err, ConversionError::TypeMismatch { .. }));
    }

    #[test]
    fn decode_invalid_element_is_an_error() {
        init_logging();
        let wire = tftypes::Value::set(tftypes::Type::String, vec![tftypes::Value::string("x")])
            .unwrap();
        let err = set_of_arn_type().value_from_terraform(&wire).unwrap_err();
        match err {
            ConversionError::Diagnostics { to, diagnostics, .. } => {
                assert_eq!(to, "SetTypeOf[ARN]");
                assert!(diagnostics.has_error());
            }
            other => panic!("Expected diagnostics error, got {:?}", other),
        }
    }

    #[test]
    fn decode_from_json() {
        let value = set_of_string_type()
            .value_from_json(&serde_json::json!(["b", "a"]))
            .unwrap();
        assert_eq!(value, SetOfString::new(strings(&["a", "b"])).0);

        let null = set_of_string_type()
            .value_from_json(&serde_json::Value::Null)
            .unwrap();
        assert!(null.is_null());

        let err = set_of_string_type()
            .value_from_json(&serde_json::json!("a"))
            .unwrap_err();
        assert!(matches!(err, ConversionError::Wire(_)));
    }

    #[test]
    fn typed_elements_reject_unknown_elements() {
        let (value, diags) = SetOfString::new(vec![
            Value::string("a"),
            Value::unknown(AttributeType::String),
        ]);
        assert!(diags.is_empty());
        assert!(value.typed_elements().is_err());
    }
}
