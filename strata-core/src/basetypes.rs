//! Generic set type and value
//!
//! `SetValue` is the untyped set representation that typed wrappers build on.
//! It checks that every element has the declared element type but does not
//! remove duplicates. Equality ignores element order.

use std::fmt;

use crate::diag::Diagnostics;
use crate::error::{ConversionError, ConversionResult};
use crate::schema::AttributeType;
use crate::tftypes;
use crate::value::{Known, Value, ValueState, same_members};

/// Set type with a fixed element type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetType {
    element_type: AttributeType,
}

impl SetType {
    pub fn new(element_type: AttributeType) -> Self {
        Self { element_type }
    }

    pub fn element_type(&self) -> &AttributeType {
        &self.element_type
    }

    /// The equivalent [`AttributeType::Set`]
    pub fn attr_type(&self) -> AttributeType {
        AttributeType::Set(Box::new(self.element_type.clone()))
    }

    /// Decode a wire value with the generic decoder
    pub fn value_from_terraform(&self, value: &tftypes::Value) -> ConversionResult<Value> {
        self.attr_type().value_from_terraform(value)
    }
}

impl fmt::Display for SetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SetType[{}]", self.element_type)
    }
}

/// Generic set value
#[derive(Debug, Clone)]
pub struct SetValue {
    element_type: AttributeType,
    state: ValueState<Vec<Value>>,
}

impl SetValue {
    pub fn null(element_type: AttributeType) -> Self {
        Self {
            element_type,
            state: ValueState::Null,
        }
    }

    pub fn unknown(element_type: AttributeType) -> Self {
        Self {
            element_type,
            state: ValueState::Unknown,
        }
    }

    /// Create a known set value
    ///
    /// If any element's type differs from `element_type` the result is an
    /// unknown value together with one error diagnostic per offending element.
    pub fn new(element_type: AttributeType, elements: Vec<Value>) -> (Self, Diagnostics) {
        let mut diags = Diagnostics::new();

        for (idx, element) in elements.iter().enumerate() {
            if element.attr_type() != &element_type {
                diags.add_error(
                    "Invalid Set Element Type",
                    format!(
                        "While creating a Set value, an invalid element was detected. \
                         A Set must use the single, given element type.\n\n\
                         Set Element Type: {}\n\
                         Set Index ({}) Element Type: {}",
                        element_type,
                        idx,
                        element.attr_type()
                    ),
                );
            }
        }

        if diags.has_error() {
            return (Self::unknown(element_type), diags);
        }

        (
            Self {
                element_type,
                state: ValueState::Known(elements),
            },
            diags,
        )
    }

    pub fn element_type(&self) -> &AttributeType {
        &self.element_type
    }

    pub fn set_type(&self) -> SetType {
        SetType::new(self.element_type.clone())
    }

    pub fn state(&self) -> &ValueState<Vec<Value>> {
        &self.state
    }

    pub fn is_null(&self) -> bool {
        self.state.is_null()
    }

    pub fn is_unknown(&self) -> bool {
        self.state.is_unknown()
    }

    /// Elements in insertion order; empty when null or unknown
    pub fn elements(&self) -> &[Value] {
        match &self.state {
            ValueState::Known(elements) => elements,
            _ => &[],
        }
    }

    pub fn into_elements(self) -> Vec<Value> {
        self.state.into_known().unwrap_or_default()
    }

    pub fn to_terraform_value(&self) -> tftypes::Value {
        Value::from(self.clone()).to_terraform_value()
    }
}

// Element type, then state, then membership in both directions.
impl PartialEq for SetValue {
    fn eq(&self, other: &Self) -> bool {
        if self.element_type != other.element_type {
            return false;
        }
        match (&self.state, &other.state) {
            (ValueState::Null, ValueState::Null) => true,
            (ValueState::Unknown, ValueState::Unknown) => true,
            (ValueState::Known(left), ValueState::Known(right)) => same_members(left, right),
            _ => false,
        }
    }
}

impl fmt::Display for SetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::from(self.clone()))
    }
}

impl From<SetValue> for Value {
    fn from(set: SetValue) -> Self {
        let attr_type = AttributeType::Set(Box::new(set.element_type));
        Value::from_state(attr_type, set.state.map(Known::Elements))
    }
}

impl TryFrom<Value> for SetValue {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let AttributeType::Set(element_type) = value.attr_type() else {
            return Err(ConversionError::UnexpectedValueType(
                value.attr_type().to_string(),
            ));
        };
        let element_type = (**element_type).clone();
        let state = match value.into_state() {
            ValueState::Null => ValueState::Null,
            ValueState::Unknown => ValueState::Unknown,
            ValueState::Known(Known::Elements(elements)) => ValueState::Known(elements),
            ValueState::Known(other) => {
                return Err(ConversionError::UnexpectedValueType(format!(
                    "Set<{}> holding {}",
                    element_type,
                    other.kind_name()
                )));
            }
        };
        Ok(Self {
            element_type,
            state,
        })
    }
}
