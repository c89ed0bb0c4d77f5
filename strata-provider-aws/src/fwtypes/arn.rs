//! ARN - Amazon Resource Name attribute type

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use strata_core::schema::AttributeType;
use strata_core::{Known, Value};

use super::ElementValue;

static PARTITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^aws(-[a-z]+)*$").expect("partition pattern is valid"));

static ACCOUNT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{12})?$").expect("account id pattern is valid"));

/// ARN parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArnError {
    #[error("arn: invalid prefix")]
    InvalidPrefix,

    #[error("arn: not enough sections")]
    NotEnoughSections,

    #[error("arn: invalid partition '{0}'")]
    InvalidPartition(String),

    #[error("arn: missing service")]
    MissingService,

    #[error("arn: invalid account ID '{0}'")]
    InvalidAccountId(String),

    #[error("arn: missing resource")]
    MissingResource,
}

/// Parsed ARN: `arn:partition:service:region:account-id:resource`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account_id: String,
    /// May itself contain `:` and `/`
    pub resource: String,
}

impl FromStr for Arn {
    type Err = ArnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(rest) = s.strip_prefix("arn:") else {
            return Err(ArnError::InvalidPrefix);
        };

        let sections: Vec<&str> = rest.splitn(5, ':').collect();
        let [partition, service, region, account_id, resource] = sections.as_slice() else {
            return Err(ArnError::NotEnoughSections);
        };

        if !PARTITION.is_match(partition) {
            return Err(ArnError::InvalidPartition(partition.to_string()));
        }
        if service.is_empty() {
            return Err(ArnError::MissingService);
        }
        if !ACCOUNT_ID.is_match(account_id) {
            return Err(ArnError::InvalidAccountId(account_id.to_string()));
        }
        if resource.is_empty() {
            return Err(ArnError::MissingResource);
        }

        Ok(Self {
            partition: partition.to_string(),
            service: service.to_string(),
            region: region.to_string(),
            account_id: account_id.to_string(),
            resource: resource.to_string(),
        })
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}

/// ARN attribute type (a string that must parse as an ARN)
pub fn arn_type() -> AttributeType {
    AttributeType::Custom {
        name: "ARN".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| match value.as_str() {
            Some(s) => s
                .parse::<Arn>()
                .map(|_| ())
                .map_err(|e| format!("Invalid ARN '{}': {}", s, e)),
            None => Err("Expected string".to_string()),
        },
    }
}

impl ElementValue for Arn {
    fn element_type() -> AttributeType {
        arn_type()
    }

    fn from_value(value: &Value) -> Option<Self> {
        if value.attr_type() != &arn_type() {
            return None;
        }
        value.as_str()?.parse().ok()
    }

    fn into_value(self) -> Value {
        Value::new(arn_type(), Known::String(self.to_string()))
    }
}
