//! Wire-level types and values
//!
//! This is the transport form of configuration, plan and state values as
//! exchanged with the host. It only knows structural types; custom attribute
//! types (ARNs, enums) are mapped onto these by [`crate::schema::AttributeType`].

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value as Json;

use crate::value::ValueState;

/// Errors decoding or encoding wire values
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WireError {
    #[error("Invalid type constraint: {0}")]
    InvalidType(String),

    #[error("Expected {expected} value, got JSON {got}")]
    UnexpectedJson { expected: String, got: &'static str },

    #[error("Element of type {got} cannot be used in {collection}")]
    ElementType { collection: String, got: String },

    #[error("Unknown values cannot be encoded as JSON")]
    UnknownValue,
}

/// Wire type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    String,
    Number,
    Bool,
    List(Box<Type>),
    Set(Box<Type>),
    Map(Box<Type>),
}

impl Type {
    /// Parse the type-constraint JSON form (`"string"`, `["set", "string"]`)
    pub fn from_json(json: &Json) -> Result<Self, WireError> {
        match json {
            Json::String(s) => match s.as_str() {
                "string" => Ok(Type::String),
                "number" => Ok(Type::Number),
                "bool" => Ok(Type::Bool),
                _ => Err(WireError::InvalidType(json.to_string())),
            },
            Json::Array(parts) => match parts.as_slice() {
                [Json::String(kind), inner] => {
                    let inner = Box::new(Type::from_json(inner)?);
                    match kind.as_str() {
                        "list" => Ok(Type::List(inner)),
                        "set" => Ok(Type::Set(inner)),
                        "map" => Ok(Type::Map(inner)),
                        _ => Err(WireError::InvalidType(json.to_string())),
                    }
                }
                _ => Err(WireError::InvalidType(json.to_string())),
            },
            _ => Err(WireError::InvalidType(json.to_string())),
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            Type::String => Json::from("string"),
            Type::Number => Json::from("number"),
            Type::Bool => Json::from("bool"),
            Type::List(inner) => Json::Array(vec![Json::from("list"), inner.to_json()]),
            Type::Set(inner) => Json::Array(vec![Json::from("set"), inner.to_json()]),
            Type::Map(inner) => Json::Array(vec![Json::from("map"), inner.to_json()]),
        }
    }

    fn element_type(&self) -> Option<&Type> {
        match self {
            Type::List(inner) | Type::Set(inner) | Type::Map(inner) => Some(inner),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::String => write!(f, "tftypes.String"),
            Type::Number => write!(f, "tftypes.Number"),
            Type::Bool => write!(f, "tftypes.Bool"),
            Type::List(inner) => write!(f, "tftypes.List[{}]", inner),
            Type::Set(inner) => write!(f, "tftypes.Set[{}]", inner),
            Type::Map(inner) => write!(f, "tftypes.Map[{}]", inner),
        }
    }
}

/// Payload of a known wire value
#[derive(Debug, Clone, PartialEq)]
pub enum WireData {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
    /// List or set elements
    Elements(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

/// Wire value
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    typ: Type,
    state: ValueState<WireData>,
}

impl Value {
    pub(crate) fn known(typ: Type, data: WireData) -> Self {
        Self {
            typ,
            state: ValueState::Known(data),
        }
    }

    pub fn null(typ: Type) -> Self {
        Self {
            typ,
            state: ValueState::Null,
        }
    }

    pub fn unknown(typ: Type) -> Self {
        Self {
            typ,
            state: ValueState::Unknown,
        }
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::known(Type::String, WireData::String(s.into()))
    }

    pub fn number(n: impl Into<serde_json::Number>) -> Self {
        Self::known(Type::Number, WireData::Number(n.into()))
    }

    pub fn bool(b: bool) -> Self {
        Self::known(Type::Bool, WireData::Bool(b))
    }

    pub fn list(element_type: Type, elements: Vec<Value>) -> Result<Self, WireError> {
        Self::collection(Type::List(Box::new(element_type)), elements)
    }

    pub fn set(element_type: Type, elements: Vec<Value>) -> Result<Self, WireError> {
        Self::collection(Type::Set(Box::new(element_type)), elements)
    }

    pub fn map(element_type: Type, entries: BTreeMap<String, Value>) -> Result<Self, WireError> {
        let typ = Type::Map(Box::new(element_type.clone()));
        if let Some(bad) = entries.values().find(|v| v.typ != element_type) {
            return Err(WireError::ElementType {
                collection: typ.to_string(),
                got: bad.typ.to_string(),
            });
        }
        Ok(Self::known(typ, WireData::Map(entries)))
    }

    fn collection(typ: Type, elements: Vec<Value>) -> Result<Self, WireError> {
        if let Some(element_type) = typ.element_type()
            && let Some(bad) = elements.iter().find(|v| &v.typ != element_type)
        {
            return Err(WireError::ElementType {
                collection: typ.to_string(),
                got: bad.typ.to_string(),
            });
        }
        Ok(Self::known(typ, WireData::Elements(elements)))
    }

    pub fn typ(&self) -> &Type {
        &self.typ
    }

    pub fn state(&self) -> &ValueState<WireData> {
        &self.state
    }

    pub fn is_null(&self) -> bool {
        self.state.is_null()
    }

    pub fn is_known(&self) -> bool {
        self.state.is_known()
    }

    /// Decode a JSON document as a value of type `typ`
    pub fn from_json(typ: &Type, json: &Json) -> Result<Self, WireError> {
        let data = match (typ, json) {
            (_, Json::Null) => return Ok(Self::null(typ.clone())),
            (Type::String, Json::String(s)) => WireData::String(s.clone()),
            (Type::Number, Json::Number(n)) => WireData::Number(n.clone()),
            (Type::Bool, Json::Bool(b)) => WireData::Bool(*b),
            (Type::List(inner) | Type::Set(inner), Json::Array(items)) => WireData::Elements(
                items
                    .iter()
                    .map(|item| Self::from_json(inner, item))
                    .collect::<Result<_, _>>()?,
            ),
            (Type::Map(inner), Json::Object(entries)) => WireData::Map(
                entries
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), Self::from_json(inner, v)?)))
                    .collect::<Result<_, WireError>>()?,
            ),
            _ => {
                return Err(WireError::UnexpectedJson {
                    expected: typ.to_string(),
                    got: json_kind(json),
                });
            }
        };
        Ok(Self::known(typ.clone(), data))
    }

    /// Encode as JSON. Unknown values, including nested ones, cannot be encoded.
    pub fn to_json(&self) -> Result<Json, WireError> {
        let data = match &self.state {
            ValueState::Null => return Ok(Json::Null),
            ValueState::Unknown => return Err(WireError::UnknownValue),
            ValueState::Known(data) => data,
        };
        Ok(match data {
            WireData::String(s) => Json::String(s.clone()),
            WireData::Number(n) => Json::Number(n.clone()),
            WireData::Bool(b) => Json::Bool(*b),
            WireData::Elements(items) => Json::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Result<_, _>>()?,
            ),
            WireData::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), v.to_json()?)))
                    .collect::<Result<_, WireError>>()?,
            ),
        })
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
