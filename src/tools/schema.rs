// Congress MCP - Model Context Protocol server for the Congress.gov API
//
// Copyright (c) 2025 the congress-mcp contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Declarative macros for JSON schema generation.
//!
//! Tool input schemas share a small vocabulary: optional congress numbers,
//! chamber enums, bounded result limits, search queries. These macros keep
//! the schema definitions in `get_tools()` declarative instead of repeating
//! `serde_json::json!` blocks with the same keys over and over.
//!
//! # Examples
//!
//! ```text
//! // Complete tool schema with required fields
//! let schema = tool_schema! {
//!     required: ["query"],
//!     properties: {
//!         query: query_arg!(),
//!         limit: limit_arg!(default: 10, maximum: 50)
//!     }
//! };
//!
//! // Parameterless tool
//! let schema = tool_schema!();
//! ```

/// Generate a JSON schema object with type "string" and description.
///
/// # Usage
/// ```text
/// schema_string!("Description of the string field")
/// schema_string!("State abbreviation", pattern: "^[A-Z]{2}$")
/// schema_string!("Search query", min_length: 1)
/// ```
#[macro_export]
macro_rules! schema_string {
    ($description:expr) => {
        serde_json::json!({
            "type": "string",
            "description": $description
        })
    };
    ($description:expr, pattern: $pattern:expr) => {
        serde_json::json!({
            "type": "string",
            "description": $description,
            "pattern": $pattern
        })
    };
    ($description:expr, min_length: $min:expr) => {
        serde_json::json!({
            "type": "string",
            "description": $description,
            "minLength": $min
        })
    };
}

/// Generate a JSON schema object with type "boolean" and optional default.
///
/// # Usage
/// ```text
/// schema_bool!("Enable feature")
/// schema_bool!("Force refresh", default: false)
/// ```
#[macro_export]
macro_rules! schema_bool {
    ($description:expr) => {
        serde_json::json!({
            "type": "boolean",
            "description": $description
        })
    };
    ($description:expr, default: $default:expr) => {
        serde_json::json!({
            "type": "boolean",
            "description": $description,
            "default": $default
        })
    };
}

/// Generate a JSON schema object with type "integer" and optional constraints.
///
/// # Usage
/// ```text
/// schema_integer!("Bill number")
/// schema_integer!("Bill number", minimum: 1)
/// schema_integer!("Result count", minimum: 1, maximum: 250, default: 20)
/// ```
#[macro_export]
macro_rules! schema_integer {
    ($description:expr) => {
        serde_json::json!({
            "type": "integer",
            "description": $description
        })
    };
    ($description:expr, minimum: $min:expr) => {
        serde_json::json!({
            "type": "integer",
            "description": $description,
            "minimum": $min
        })
    };
    ($description:expr, minimum: $min:expr, maximum: $max:expr) => {
        serde_json::json!({
            "type": "integer",
            "description": $description,
            "minimum": $min,
            "maximum": $max
        })
    };
    ($description:expr, minimum: $min:expr, maximum: $max:expr, default: $default:expr) => {
        serde_json::json!({
            "type": "integer",
            "description": $description,
            "minimum": $min,
            "maximum": $max,
            "default": $default
        })
    };
}

/// Generate a JSON schema object with string enum constraints.
///
/// # Usage
/// ```text
/// schema_enum!(["house", "senate", "joint"], "Chamber type")
/// ```
#[macro_export]
macro_rules! schema_enum {
    ([$($variant:expr),+ $(,)?], $description:expr) => {
        serde_json::json!({
            "type": "string",
            "enum": [$($variant),+],
            "description": $description
        })
    };
    ([$($variant:expr),+ $(,)?], $description:expr, default: $default:expr) => {
        serde_json::json!({
            "type": "string",
            "enum": [$($variant),+],
            "description": $description,
            "default": $default
        })
    };
}

/// Generate a JSON schema array whose items are drawn from a string enum.
///
/// # Usage
/// ```text
/// schema_enum_array!(["bill", "hearing"], "Types to include")
/// schema_enum_array!(["bill", "hearing"], "Types to include", default: ["bill"])
/// ```
#[macro_export]
macro_rules! schema_enum_array {
    ([$($variant:expr),+ $(,)?], $description:expr) => {
        serde_json::json!({
            "type": "array",
            "items": {
                "type": "string",
                "enum": [$($variant),+]
            },
            "description": $description
        })
    };
    ([$($variant:expr),+ $(,)?], $description:expr, default: [$($default:expr),* $(,)?]) => {
        serde_json::json!({
            "type": "array",
            "items": {
                "type": "string",
                "enum": [$($variant),+]
            },
            "description": $description,
            "default": [$($default),*]
        })
    };
}

/// Generate a complete tool schema with properties and required fields.
///
/// All tool schemas reject unknown arguments, so every expansion carries
/// `additionalProperties: false`.
///
/// # Usage
/// ```text
/// tool_schema!()                       // parameterless tool
/// tool_schema! {
///     properties: { limit: limit_arg!(default: 20) }
/// }
/// tool_schema! {
///     required: ["query"],
///     properties: { query: query_arg!() }
/// }
/// ```
#[macro_export]
macro_rules! tool_schema {
    () => {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        })
    };
    (
        properties: {
            $($field:ident: $schema:expr),+ $(,)?
        }
    ) => {
        serde_json::json!({
            "type": "object",
            "properties": {
                $(stringify!($field): $schema),+
            },
            "additionalProperties": false
        })
    };
    (
        required: [$($req:expr),* $(,)?],
        properties: {
            $($field:ident: $schema:expr),+ $(,)?
        }
    ) => {
        serde_json::json!({
            "type": "object",
            "properties": {
                $(stringify!($field): $schema),+
            },
            "required": [$($req),*],
            "additionalProperties": false
        })
    };
}

/// Generate schema for an optional congress number argument.
///
/// # Usage
/// ```text
/// congress_arg!()
/// congress_arg!("Congress number (e.g., 118 for current)")
/// ```
#[macro_export]
macro_rules! congress_arg {
    () => {
        $crate::schema_integer!("Congress number", minimum: 1)
    };
    ($description:expr) => {
        $crate::schema_integer!($description, minimum: 1)
    };
}

/// Generate schema for a chamber argument with enum values.
///
/// # Usage
/// ```text
/// chamber_arg!()                        // house, senate, joint
/// chamber_arg!(["house", "senate"])     // member listings have no joint chamber
/// ```
#[macro_export]
macro_rules! chamber_arg {
    () => {
        $crate::schema_enum!(["house", "senate", "joint"], "Chamber type")
    };
    ([$($variant:expr),+ $(,)?]) => {
        $crate::schema_enum!([$($variant),+], "Chamber type")
    };
}

/// Generate schema for a result limit argument.
///
/// List tools page up to 250 rows; search tools cap at 50 because every
/// result is scored in process.
///
/// # Usage
/// ```text
/// limit_arg!(default: 20)
/// limit_arg!(default: 10, maximum: 50)
/// ```
#[macro_export]
macro_rules! limit_arg {
    (default: $default:expr) => {
        $crate::schema_integer!(
            "Number of results to return",
            minimum: 1,
            maximum: 250,
            default: $default
        )
    };
    (default: $default:expr, maximum: $max:expr) => {
        $crate::schema_integer!(
            "Number of results to return",
            minimum: 1,
            maximum: $max,
            default: $default
        )
    };
}

/// Generate schema for a free-text search query argument.
///
/// # Usage
/// ```text
/// query_arg!()
/// ```
#[macro_export]
macro_rules! query_arg {
    () => {
        $crate::schema_string!("Search query", min_length: 1)
    };
}

/// Generate schema for a bill type argument.
///
/// # Usage
/// ```text
/// bill_type_arg!()
/// ```
#[macro_export]
macro_rules! bill_type_arg {
    () => {
        $crate::schema_enum!(
            ["hr", "s", "hjres", "sjres", "hconres", "sconres", "hres", "sres"],
            "Type of bill or resolution"
        )
    };
}

/// Generate schema for a search result type selector.
///
/// # Usage
/// ```text
/// item_types_arg!(default: ["bill", "hearing"])
/// ```
#[macro_export]
macro_rules! item_types_arg {
    (default: [$($default:expr),* $(,)?]) => {
        $crate::schema_enum_array!(
            ["bill", "hearing", "committee", "member"],
            "Types to include in search",
            default: [$($default),*]
        )
    };
}

/// Generate schema for a topic argument.
///
/// The enum is taken from the search engine's topic vocabulary so the
/// advertised schema cannot drift from what topic expansion understands.
///
/// # Usage
/// ```text
/// topic_arg!()
/// ```
#[macro_export]
macro_rules! topic_arg {
    () => {
        serde_json::json!({
            "type": "string",
            "enum": $crate::search::known_topics(),
            "description": "Topic to search for"
        })
    };
}

#[cfg(test)]
mod tests {
    use serde_json::Value as JsonValue;

    #[test]
    fn test_schema_string() {
        let schema = schema_string!("Test description");
        assert_eq!(schema["type"], "string");
        assert_eq!(schema["description"], "Test description");
        assert!(schema.get("pattern").is_none());
    }

    #[test]
    fn test_schema_string_with_pattern() {
        let schema = schema_string!("State abbreviation", pattern: "^[A-Z]{2}$");
        assert_eq!(schema["type"], "string");
        assert_eq!(schema["pattern"], "^[A-Z]{2}$");
    }

    #[test]
    fn test_schema_string_with_min_length() {
        let schema = schema_string!("Search query", min_length: 1);
        assert_eq!(schema["type"], "string");
        assert_eq!(schema["minLength"], 1);
    }

    #[test]
    fn test_schema_bool() {
        let schema = schema_bool!("Enable feature");
        assert_eq!(schema["type"], "boolean");
        assert!(schema.get("default").is_none());
    }

    #[test]
    fn test_schema_bool_with_default() {
        let schema = schema_bool!("Force refresh", default: false);
        assert_eq!(schema["type"], "boolean");
        assert_eq!(schema["default"], false);
    }

    #[test]
    fn test_schema_integer_with_minimum() {
        let schema = schema_integer!("Bill number", minimum: 1);
        assert_eq!(schema["type"], "integer");
        assert_eq!(schema["minimum"], 1);
        assert!(schema.get("maximum").is_none());
    }

    #[test]
    fn test_schema_integer_with_full_constraints() {
        let schema = schema_integer!("Result count", minimum: 1, maximum: 250, default: 20);
        assert_eq!(schema["minimum"], 1);
        assert_eq!(schema["maximum"], 250);
        assert_eq!(schema["default"], 20);
    }

    #[test]
    fn test_schema_enum() {
        let schema = schema_enum!(["house", "senate", "joint"], "Chamber type");
        assert_eq!(schema["type"], "string");
        assert_eq!(schema["description"], "Chamber type");
        let enum_vals = schema["enum"].as_array().unwrap();
        assert_eq!(enum_vals.len(), 3);
        assert!(enum_vals.contains(&JsonValue::String("senate".to_string())));
    }

    #[test]
    fn test_schema_enum_array() {
        let schema = schema_enum_array!(["bill", "hearing"], "Types", default: ["bill"]);
        assert_eq!(schema["type"], "array");
        assert_eq!(schema["items"]["type"], "string");
        assert_eq!(schema["items"]["enum"].as_array().unwrap().len(), 2);
        assert_eq!(schema["default"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_tool_schema_empty() {
        let schema = tool_schema!();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"].as_object().unwrap().is_empty());
        assert_eq!(schema["additionalProperties"], false);
    }

    #[test]
    fn test_tool_schema_without_required() {
        let schema = tool_schema! {
            properties: {
                limit: limit_arg!(default: 20)
            }
        };
        assert_eq!(schema["type"], "object");
        assert!(schema.get("required").is_none());
        assert!(schema["properties"].get("limit").is_some());
        assert_eq!(schema["additionalProperties"], false);
    }

    #[test]
    fn test_tool_schema_with_required() {
        let schema = tool_schema! {
            required: ["query"],
            properties: {
                query: query_arg!(),
                limit: limit_arg!(default: 10, maximum: 50)
            }
        };
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "query");
        assert!(schema["properties"].get("query").is_some());
        assert!(schema["properties"].get("limit").is_some());
    }

    #[test]
    fn test_congress_arg() {
        let schema = congress_arg!();
        assert_eq!(schema["type"], "integer");
        assert_eq!(schema["minimum"], 1);

        let custom = congress_arg!("Congress number (e.g., 118 for current)");
        assert_eq!(
            custom["description"],
            "Congress number (e.g., 118 for current)"
        );
    }

    #[test]
    fn test_chamber_arg() {
        let schema = chamber_arg!();
        assert_eq!(schema["enum"].as_array().unwrap().len(), 3);

        let members = chamber_arg!(["house", "senate"]);
        assert_eq!(members["enum"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_limit_arg() {
        let listing = limit_arg!(default: 20);
        assert_eq!(listing["maximum"], 250);
        assert_eq!(listing["default"], 20);

        let search = limit_arg!(default: 10, maximum: 50);
        assert_eq!(search["maximum"], 50);
        assert_eq!(search["default"], 10);
    }

    #[test]
    fn test_query_arg() {
        let schema = query_arg!();
        assert_eq!(schema["type"], "string");
        assert_eq!(schema["minLength"], 1);
    }

    #[test]
    fn test_bill_type_arg() {
        let schema = bill_type_arg!();
        let variants = schema["enum"].as_array().unwrap();
        assert_eq!(variants.len(), 8);
        assert!(variants.contains(&JsonValue::String("hr".to_string())));
        assert!(variants.contains(&JsonValue::String("sconres".to_string())));
    }

    #[test]
    fn test_item_types_arg() {
        let schema = item_types_arg!(default: ["bill", "hearing"]);
        assert_eq!(schema["items"]["enum"].as_array().unwrap().len(), 4);
        let default = schema["default"].as_array().unwrap();
        assert_eq!(default.len(), 2);
        assert_eq!(default[0], "bill");
    }

    #[test]
    fn test_topic_arg_matches_engine_vocabulary() {
        let schema = topic_arg!();
        let variants = schema["enum"].as_array().unwrap();
        assert_eq!(variants.len(), crate::search::known_topics().len());
        assert!(variants.contains(&JsonValue::String("healthcare".to_string())));
    }
}
