//! Schema - Define attribute types and resource schemas
//!
//! Providers declare a schema for each resource type. The schema decodes the
//! wire-level configuration and validates every attribute in one pass,
//! collecting diagnostics instead of stopping at the first problem.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::attr::AttributeTypable;
use crate::config::ValidationConfig;
use crate::diag::Diagnostics;
use crate::path::Path;
use crate::tftypes;
use crate::value::{Known, Value};

/// Attribute type
#[derive(Debug, Clone)]
pub enum AttributeType {
    /// String
    String,
    /// Integer
    Int,
    /// Boolean
    Bool,
    /// Custom type (with validation function)
    Custom {
        name: String,
        base: Box<AttributeType>,
        validate: fn(&Value) -> Result<(), String>,
    },
    /// List
    List(Box<AttributeType>),
    /// Set (unordered; duplicates are not removed)
    Set(Box<AttributeType>),
    /// Map
    Map(Box<AttributeType>),
}

// Custom types compare by name and base; the validation function is not part of identity.
impl PartialEq for AttributeType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttributeType::String, AttributeType::String)
            | (AttributeType::Int, AttributeType::Int)
            | (AttributeType::Bool, AttributeType::Bool) => true,
            (
                AttributeType::Custom {
                    name: a, base: ab, ..
                },
                AttributeType::Custom {
                    name: b, base: bb, ..
                },
            ) => a == b && ab == bb,
            (AttributeType::List(a), AttributeType::List(b))
            | (AttributeType::Set(a), AttributeType::Set(b))
            | (AttributeType::Map(a), AttributeType::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for AttributeType {}

impl AttributeType {
    /// Check if a value conforms to this type
    ///
    /// Null and unknown values always conform as long as their type matches.
    pub fn validate(&self, value: &Value) -> Result<(), TypeError> {
        if value.attr_type() != self {
            return Err(TypeError::TypeMismatch {
                expected: self.type_name(),
                got: value.attr_type().type_name(),
            });
        }

        let Some(known) = value.state().known() else {
            return Ok(());
        };

        if !self.accepts(known) {
            return Err(TypeError::TypeMismatch {
                expected: self.type_name(),
                got: known.kind_name().to_string(),
            });
        }

        match (self, known) {
            (AttributeType::Custom { validate, .. }, _) => {
                validate(value).map_err(|message| TypeError::ValidationFailed { message })
            }

            (AttributeType::List(inner) | AttributeType::Set(inner), Known::Elements(items)) => {
                for (i, item) in items.iter().enumerate() {
                    inner.validate(item).map_err(|e| TypeError::ListItemError {
                        index: i,
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            (AttributeType::Map(inner), Known::Map(map)) => {
                for (k, v) in map {
                    inner.validate(v).map_err(|e| TypeError::MapValueError {
                        key: k.clone(),
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            _ => Ok(()),
        }
    }

    /// Whether a known payload has the shape of this type
    fn accepts(&self, known: &Known) -> bool {
        match (self, known) {
            (AttributeType::String, Known::String(_))
            | (AttributeType::Int, Known::Int(_))
            | (AttributeType::Bool, Known::Bool(_))
            | (AttributeType::List(_) | AttributeType::Set(_), Known::Elements(_))
            | (AttributeType::Map(_), Known::Map(_)) => true,
            (AttributeType::Custom { base, .. }, known) => base.accepts(known),
            _ => false,
        }
    }

    fn type_name(&self) -> String {
        match self {
            AttributeType::String => "String".to_string(),
            AttributeType::Int => "Int".to_string(),
            AttributeType::Bool => "Bool".to_string(),
            AttributeType::Custom { name, .. } => name.clone(),
            AttributeType::List(inner) => format!("List<{}>", inner.type_name()),
            AttributeType::Set(inner) => format!("Set<{}>", inner.type_name()),
            AttributeType::Map(inner) => format!("Map<{}>", inner.type_name()),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Type error
#[derive(Debug, Clone, thiserror::Error)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("List item at index {index}: {inner}")]
    ListItemError { index: usize, inner: Box<TypeError> },

    #[error("Map value for key '{key}': {inner}")]
    MapValueError { key: String, inner: Box<TypeError> },
}

/// Attribute schema
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub name: String,
    pub attr_type: Arc<dyn AttributeTypable>,
    pub required: bool,
    pub description: Option<String>,
    /// Setting a deprecated attribute produces a warning with this message
    pub deprecation_message: Option<String>,
}

impl AttributeSchema {
    pub fn new(name: impl Into<String>, attr_type: impl AttributeTypable + 'static) -> Self {
        Self {
            name: name.into(),
            attr_type: Arc::new(attr_type),
            required: false,
            description: None,
            deprecation_message: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn deprecated(mut self, message: impl Into<String>) -> Self {
        self.deprecation_message = Some(message.into());
        self
    }
}

/// Resource schema
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub resource_type: String,
    pub attributes: HashMap<String, AttributeSchema>,
    pub description: Option<String>,
}

impl ResourceSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            attributes: HashMap::new(),
            description: None,
        }
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Decode and validate a configuration
    ///
    /// Every attribute is checked, so the result reports all problems at once.
    /// Conversion errors become diagnostics on the attribute's path.
    pub fn validate_config(
        &self,
        config: &HashMap<String, tftypes::Value>,
        options: &ValidationConfig,
    ) -> Diagnostics {
        let mut diags = Diagnostics::new();

        let mut names: Vec<&String> = self.attributes.keys().collect();
        names.sort();

        for name in names {
            let schema = &self.attributes[name];
            let path = Path::root(name.as_str());

            let Some(wire) = config.get(name) else {
                if schema.required {
                    diags.add_attribute_error(
                        path,
                        "Missing Configuration for Required Attribute",
                        format!("Must set a configuration value for the {} attribute.", name),
                    );
                }
                continue;
            };

            let value = match schema.attr_type.decode_wire(wire) {
                Ok(value) => value,
                Err(e) => {
                    log::debug!(
                        "{}: failed to convert {} as {}: {}",
                        self.resource_type,
                        name,
                        schema.attr_type,
                        e
                    );
                    diags.add_attribute_error(
                        path,
                        "Value Conversion Error",
                        format!(
                            "An unexpected error was encountered trying to convert the {} attribute into {}: {}",
                            name, schema.attr_type, e
                        ),
                    );
                    continue;
                }
            };

            if value.is_null() {
                if schema.required {
                    diags.add_attribute_error(
                        path,
                        "Missing Configuration for Required Attribute",
                        format!("Must set a configuration value for the {} attribute.", name),
                    );
                }
                continue;
            }

            if let Some(message) = &schema.deprecation_message {
                diags.add_attribute_warning(path.clone(), "Attribute Deprecated", message.clone());
            }

            if let Some(validateable) = value.as_validateable() {
                validateable.validate_attribute(&path, &mut diags);
            }
        }

        if !options.allow_unknown_attributes {
            let mut unexpected: Vec<&String> = config
                .keys()
                .filter(|name| !self.attributes.contains_key(*name))
                .collect();
            unexpected.sort();
            for name in unexpected {
                diags.add_attribute_error(
                    Path::root(name.as_str()),
                    "Unsupported Argument",
                    format!("An argument named \"{}\" is not expected here.", name),
                );
            }
        }

        log::debug!(
            "{}: configuration validated with {} error(s), {} warning(s)",
            self.resource_type,
            diags.error_count(),
            diags.warning_count()
        );

        diags
    }
}
