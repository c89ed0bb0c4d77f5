//! Validation configuration

/// Options for [`crate::schema::ResourceSchema::validate_config`]
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Accept configuration keys that the schema does not declare (default: true)
    pub allow_unknown_attributes: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            allow_unknown_attributes: true,
        }
    }
}

impl ValidationConfig {
    /// Reject undeclared attributes
    pub fn strict() -> Self {
        Self {
            allow_unknown_attributes: false,
        }
    }
}
