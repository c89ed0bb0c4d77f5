//! Path - Locate an attribute or a nested element within a configuration

use std::fmt;

use serde::Serialize;

/// One step of a [`Path`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum PathStep {
    /// Named attribute (e.g., `tags`)
    AttributeName(String),
    /// List element index
    ElementKeyInt(i64),
    /// Map element key
    ElementKeyString(String),
    /// Set element, identified by its rendered value
    ElementKeyValue(String),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::AttributeName(name) => write!(f, "{}", name),
            PathStep::ElementKeyInt(index) => write!(f, "[{}]", index),
            PathStep::ElementKeyString(key) => write!(f, "[{:?}]", key),
            PathStep::ElementKeyValue(value) => write!(f, "[Value({})]", value),
        }
    }
}

/// Attribute path, e.g. `security_service_policy_data.managed_service_data[0]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// Empty path (the root of a configuration)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Path to a top-level attribute
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            steps: vec![PathStep::AttributeName(name.into())],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn at_name(&self, name: impl Into<String>) -> Self {
        self.with_step(PathStep::AttributeName(name.into()))
    }

    pub fn at_list_index(&self, index: i64) -> Self {
        self.with_step(PathStep::ElementKeyInt(index))
    }

    pub fn at_map_key(&self, key: impl Into<String>) -> Self {
        self.with_step(PathStep::ElementKeyString(key.into()))
    }

    pub fn at_set_value(&self, value: impl fmt::Display) -> Self {
        self.with_step(PathStep::ElementKeyValue(value.to_string()))
    }

    fn with_step(&self, step: PathStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 && matches!(step, PathStep::AttributeName(_)) {
                write!(f, ".")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_nested_path() {
        let path = Path::root("policy")
            .at_name("resource_tags")
            .at_list_index(0)
            .at_name("key");
        assert_eq!(path.to_string(), "policy.resource_tags[0].key");
    }

    #[test]
    fn display_map_and_set_steps() {
        let path = Path::root("tags").at_map_key("Name");
        assert_eq!(path.to_string(), "tags[\"Name\"]");

        let path = Path::root("states").at_set_value("\"paused\"");
        assert_eq!(path.to_string(), "states[Value(\"paused\")]");
    }

    #[test]
    fn steps_do_not_mutate_parent() {
        let parent = Path::root("a");
        let child = parent.at_name("b");
        assert_eq!(parent.steps().len(), 1);
        assert_eq!(child.steps().len(), 2);
        assert!(Path::empty().is_empty());
    }
}
