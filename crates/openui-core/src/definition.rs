use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single named parameter in a [`ToolParameters`] object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// JSON type name (`string`, `number`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Guidance for the model.
    pub description: String,
}

/// JSON-Schema-like object describing a tool's arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameters {
    /// Always `"object"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Parameters by name.
    #[serde(default)]
    pub properties: BTreeMap<String, ParameterSpec>,
    /// Names of the mandatory parameters.
    #[serde(default)]
    pub required: Vec<String>,
}

impl Default for ToolParameters {
    fn default() -> Self {
        Self {
            kind: "object".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }
}

/// Static declaration of a tool, exposed to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Free text that guides the model's choice.
    pub description: String,
    /// Argument schema.
    #[serde(default)]
    pub parameters: ToolParameters,
}

impl ToolDefinition {
    /// Starts a definition with no parameters.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ToolParameters::default(),
        }
    }

    /// Adds a mandatory parameter.
    pub fn required(self, name: &str, kind: &str, description: &str) -> Self {
        self.param(name, kind, description, true)
    }

    /// Adds an optional parameter.
    pub fn optional(self, name: &str, kind: &str, description: &str) -> Self {
        self.param(name, kind, description, false)
    }

    fn param(mut self, name: &str, kind: &str, description: &str, required: bool) -> Self {
        self.parameters.properties.insert(
            name.to_string(),
            ParameterSpec {
                kind: kind.to_string(),
                description: description.to_string(),
            },
        );
        if required && !self.parameters.required.iter().any(|r| r == name) {
            self.parameters.required.push(name.to_string());
        }
        self
    }

    /// The parameter schema as a JSON value.
    pub fn parameters_schema(&self) -> serde_json::Value {
        serde_json::to_value(&self.parameters).unwrap_or_else(|_| serde_json::json!({}))
    }
}

/// A named group of tool definitions, for presentation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Display name of the group.
    pub name: String,
    /// Tools in the group.
    pub schema: Vec<ToolDefinition>,
}

impl ToolSchema {
    /// Flattens a list of groups into their definitions, keeping order.
    pub fn flatten(groups: &[ToolSchema]) -> Vec<&ToolDefinition> {
        groups.iter().flat_map(|g| g.schema.iter()).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_records_required() {
        let def = ToolDefinition::new("html_renderer", "Render HTML")
            .required("html", "string", "The HTML content")
            .optional("css", "string", "Optional CSS");
        assert_eq!(def.parameters.required, vec!["html".to_string()]);
        assert_eq!(def.parameters.properties.len(), 2);
    }

    #[test]
    fn test_parameters_schema_shape() {
        let def = ToolDefinition::new("javascript", "Run JS").required("code", "string", "Code");
        let schema = def.parameters_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["code"]["type"], "string");
        assert_eq!(schema["required"][0], "code");
    }

    #[test]
    fn test_flatten_keeps_group_order() {
        let groups = vec![
            ToolSchema {
                name: "A".to_string(),
                schema: vec![ToolDefinition::new("a1", ""), ToolDefinition::new("a2", "")],
            },
            ToolSchema {
                name: "B".to_string(),
                schema: vec![ToolDefinition::new("b1", "")],
            },
        ];
        let names: Vec<_> = ToolSchema::flatten(&groups)
            .into_iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["a1", "a2", "b1"]);
    }
}
