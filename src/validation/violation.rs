//! Structural violations reported by the deps validator

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Runtime kind of a value, as named in violation messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Null,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Null => ValueKind::Null,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structural defect, labeled with its location in the input tree.
///
/// The `Display` output is the stable message text; downstream tools match on it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// Field name not legal at this nesting level
    #[error("Invalid field ({field}) in \"{path}\"")]
    UnknownField { path: String, field: String },

    /// Leaf value of the wrong kind, or a container (`mods`) of the wrong kind
    #[error("Invalid type ({actual}) in \"{path}\", expected {expected}")]
    WrongType {
        path: String,
        actual: ValueKind,
        expected: &'static str,
    },

    /// Value where a declaration (or a list of them) was required
    #[error("Invalid declaration type ({actual}){}, expected {expected}", located(.path))]
    WrongDeclaration {
        path: String,
        actual: ValueKind,
        expected: &'static str,
    },

    /// `include` set to anything but `false`
    #[error("Invalid value ({value}) in \"{path}\", expected false")]
    InvalidLiteral { path: String, value: String },
}

fn located(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" in \"{path}\"")
    }
}

impl Violation {
    pub fn path(&self) -> &str {
        match self {
            Violation::UnknownField { path, .. }
            | Violation::WrongType { path, .. }
            | Violation::WrongDeclaration { path, .. }
            | Violation::InvalidLiteral { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_kind_names() {
        assert_eq!(ValueKind::of(&json!("a")).as_str(), "string");
        assert_eq!(ValueKind::of(&json!(1.5)).as_str(), "number");
        assert_eq!(ValueKind::of(&json!(false)).as_str(), "boolean");
        assert_eq!(ValueKind::of(&json!(null)).as_str(), "null");
        assert_eq!(ValueKind::of(&json!([])).as_str(), "array");
        assert_eq!(ValueKind::of(&json!({})).as_str(), "object");
    }

    #[test]
    fn test_root_declaration_message_has_no_location() {
        let violation = Violation::WrongDeclaration {
            path: String::new(),
            actual: ValueKind::Number,
            expected: "array or object",
        };
        assert_eq!(
            violation.to_string(),
            "Invalid declaration type (number), expected array or object"
        );
    }

    #[test]
    fn test_nested_declaration_message_names_path() {
        let violation = Violation::WrongDeclaration {
            path: "mustDeps".to_string(),
            actual: ValueKind::Boolean,
            expected: "string, array or object",
        };
        assert_eq!(
            violation.to_string(),
            "Invalid declaration type (boolean) in \"mustDeps\", expected string, array or object"
        );
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let violation = Violation::UnknownField {
            path: "foo".to_string(),
            field: "foo".to_string(),
        };
        let value = serde_json::to_value(&violation).unwrap();
        assert_eq!(value["kind"], "unknown_field");
        assert_eq!(value["path"], "foo");
    }
}
