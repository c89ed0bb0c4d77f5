//! Value - Attribute values carrying their type and null/unknown state

use std::collections::BTreeMap;
use std::fmt;

use crate::schema::AttributeType;
use crate::tftypes;

/// Whether a value is absent, still pending, or concrete
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueState<T> {
    /// Intentionally absent
    Null,
    /// Will be determined later (e.g., computed during apply)
    Unknown,
    Known(T),
}

impl<T> ValueState<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, ValueState::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ValueState::Unknown)
    }

    pub fn is_known(&self) -> bool {
        matches!(self, ValueState::Known(_))
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            ValueState::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_known(self) -> Option<T> {
        match self {
            ValueState::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValueState<U> {
        match self {
            ValueState::Null => ValueState::Null,
            ValueState::Unknown => ValueState::Unknown,
            ValueState::Known(v) => ValueState::Known(f(v)),
        }
    }
}

/// Concrete payload of a known value
#[derive(Debug, Clone, PartialEq)]
pub enum Known {
    String(String),
    Int(i64),
    Bool(bool),
    /// Elements of a list or set, in insertion order
    Elements(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Known {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Known::String(_) => "String",
            Known::Int(_) => "Int",
            Known::Bool(_) => "Bool",
            Known::Elements(_) => "Elements",
            Known::Map(_) => "Map",
        }
    }
}

/// Attribute value
///
/// Every value knows its own [`AttributeType`], which is how custom types such
/// as ARNs stay distinguishable from plain strings after conversion.
/// Values are immutable; builders return new values.
#[derive(Debug, Clone)]
pub struct Value {
    attr_type: AttributeType,
    state: ValueState<Known>,
}

impl Value {
    /// Create a known value of the given type.
    ///
    /// The payload is not checked against the type; use
    /// [`AttributeType::validate`] for that.
    pub fn new(attr_type: AttributeType, known: Known) -> Self {
        Self::from_state(attr_type, ValueState::Known(known))
    }

    pub fn from_state(attr_type: AttributeType, state: ValueState<Known>) -> Self {
        Self { attr_type, state }
    }

    pub fn null(attr_type: AttributeType) -> Self {
        Self::from_state(attr_type, ValueState::Null)
    }

    pub fn unknown(attr_type: AttributeType) -> Self {
        Self::from_state(attr_type, ValueState::Unknown)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::new(AttributeType::String, Known::String(s.into()))
    }

    pub fn int(n: i64) -> Self {
        Self::new(AttributeType::Int, Known::Int(n))
    }

    pub fn bool(b: bool) -> Self {
        Self::new(AttributeType::Bool, Known::Bool(b))
    }

    pub fn attr_type(&self) -> &AttributeType {
        &self.attr_type
    }

    pub fn state(&self) -> &ValueState<Known> {
        &self.state
    }

    pub fn into_state(self) -> ValueState<Known> {
        self.state
    }

    pub fn is_null(&self) -> bool {
        self.state.is_null()
    }

    pub fn is_unknown(&self) -> bool {
        self.state.is_unknown()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.state.known() {
            Some(Known::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.state.known() {
            Some(Known::Int(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.state.known() {
            Some(Known::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn elements(&self) -> Option<&[Value]> {
        match self.state.known() {
            Some(Known::Elements(items)) => Some(items),
            _ => None,
        }
    }

    /// Encode this value in its wire form
    pub fn to_terraform_value(&self) -> tftypes::Value {
        let typ = self.attr_type.terraform_type();
        match &self.state {
            ValueState::Null => tftypes::Value::null(typ),
            ValueState::Unknown => tftypes::Value::unknown(typ),
            ValueState::Known(known) => {
                let data = match known {
                    Known::String(s) => tftypes::WireData::String(s.clone()),
                    Known::Int(n) => tftypes::WireData::Number((*n).into()),
                    Known::Bool(b) => tftypes::WireData::Bool(*b),
                    Known::Elements(items) => tftypes::WireData::Elements(
                        items.iter().map(Value::to_terraform_value).collect(),
                    ),
                    Known::Map(map) => tftypes::WireData::Map(
                        map.iter()
                            .map(|(k, v)| (k.clone(), v.to_terraform_value()))
                            .collect(),
                    ),
                };
                tftypes::Value::known(typ, data)
            }
        }
    }
}

// Set elements compare as members, lists and maps structurally.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.attr_type != other.attr_type {
            return false;
        }
        match (&self.state, &other.state) {
            (ValueState::Known(Known::Elements(left)), ValueState::Known(Known::Elements(right)))
                if matches!(self.attr_type, AttributeType::Set(_)) =>
            {
                same_members(left, right)
            }
            (left, right) => left == right,
        }
    }
}

/// Whether two element lists hold the same members, regardless of order
pub(crate) fn same_members(left: &[Value], right: &[Value]) -> bool {
    left.len() == right.len()
        && left.iter().all(|element| right.contains(element))
        && right.iter().all(|element| left.contains(element))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known = match &self.state {
            ValueState::Null => return write!(f, "<null>"),
            ValueState::Unknown => return write!(f, "<unknown>"),
            ValueState::Known(known) => known,
        };
        match known {
            Known::String(s) => write!(f, "{:?}", s),
            Known::Int(n) => write!(f, "{}", n),
            Known::Bool(b) => write!(f, "{}", b),
            Known::Elements(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Known::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}
