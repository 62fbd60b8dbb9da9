//! Schema Adapter
//!
//! Pure translation of MCP tool descriptors into the LLM
//! function-calling format. Discovery order is preserved and the
//! provider's schema internals are trusted as-is.

use crate::mcp::ToolDescriptor;
use crate::provider::{FunctionParameters, FunctionSchema};

/// Convert tool descriptors to function schemas, one per tool.
///
/// Tools without a description get a generated `Execute <name>`
/// fallback; missing properties/required default to empty.
pub fn functions_from_tools(tools: &[ToolDescriptor]) -> Vec<FunctionSchema> {
    tools
        .iter()
        .map(|tool| FunctionSchema {
            name: tool.name.clone(),
            description: tool
                .description
                .clone()
                .unwrap_or_else(|| format!("Execute {}", tool.name)),
            parameters: FunctionParameters {
                schema_type: "object".into(),
                properties: tool.input_schema.properties.clone().unwrap_or_default(),
                required: tool.input_schema.required.clone().unwrap_or_default(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::InputSchema;
    use serde_json::json;

    fn descriptor(name: &str, description: Option<&str>, schema: InputSchema) -> ToolDescriptor {
        ToolDescriptor {
            name: name.into(),
            description: description.map(String::from),
            input_schema: schema,
        }
    }

    #[test]
    fn test_schema_fidelity_with_fallback_description() {
        let mut properties = serde_json::Map::new();
        properties.insert("q".into(), json!({"type": "string"}));

        let tools = vec![descriptor(
            "search_products",
            None,
            InputSchema {
                schema_type: "object".into(),
                properties: Some(properties.clone()),
                required: Some(vec!["q".into()]),
            },
        )];

        let functions = functions_from_tools(&tools);
        assert_eq!(functions.len(), 1);

        let function = &functions[0];
        assert_eq!(function.name, "search_products");
        assert_eq!(function.description, "Execute search_products");
        assert_eq!(function.parameters.schema_type, "object");
        assert_eq!(function.parameters.properties, properties);
        assert_eq!(function.parameters.required, vec!["q".to_string()]);
    }

    #[test]
    fn test_missing_schema_fields_default_to_empty() {
        let tools = vec![descriptor(
            "list_products",
            Some("Browse the catalog"),
            InputSchema::default(),
        )];

        let functions = functions_from_tools(&tools);
        assert_eq!(functions[0].description, "Browse the catalog");
        assert!(functions[0].parameters.properties.is_empty());
        assert!(functions[0].parameters.required.is_empty());
    }

    #[test]
    fn test_discovery_order_is_preserved() {
        let tools = vec![
            descriptor("b_tool", None, InputSchema::default()),
            descriptor("a_tool", None, InputSchema::default()),
            descriptor("c_tool", None, InputSchema::default()),
        ];

        let names: Vec<_> = functions_from_tools(&tools)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["b_tool", "a_tool", "c_tool"]);
    }
}
