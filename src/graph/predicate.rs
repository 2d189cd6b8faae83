//! The fixed predicate vocabulary (spec.md §3).

pub const TYPE: &str = "type";

// Attribute predicates
pub const NAME: &str = "name";
pub const COMMAND: &str = "command";
pub const DESCRIPTION: &str = "description";
pub const VARIABLES: &str = "variables";
pub const PATH: &str = "path";
pub const FILE_TYPE: &str = "file_type";
pub const STATUS: &str = "status";
pub const HASH: &str = "hash";
pub const BUILD: &str = "build";
pub const BUILD_ID: &str = "build_id";
pub const RULE: &str = "rule";
pub const POOL: &str = "pool";
pub const LAST_MODIFIED: &str = "last_modified";

// Relationship predicates
pub const HAS_INPUT: &str = "has_input";
pub const HAS_OUTPUT: &str = "has_output";
pub const HAS_IMPLICIT_DEP: &str = "has_implicit_dep";
pub const HAS_ORDER_DEP: &str = "has_order_dep";
pub const DEPENDS_ON: &str = "depends_on";

// Type markers
pub const TYPE_RULE: &str = "rule";
pub const TYPE_FILE: &str = "file";
pub const TYPE_TARGET: &str = "target";
pub const TYPE_BUILD: &str = "build";

/// Serialize a variables map to JSON text, normalizing the empty map to
/// `"{}"` (never an empty string) per spec.md §3.
pub fn variables_to_json(vars: &std::collections::HashMap<String, String>) -> String {
    serde_json::to_string(vars).unwrap_or_else(|_| "{}".to_string())
}

pub fn variables_from_json(text: &str) -> std::collections::HashMap<String, String> {
    if text.is_empty() {
        return std::collections::HashMap::new();
    }
    serde_json::from_str(text).unwrap_or_default()
}
