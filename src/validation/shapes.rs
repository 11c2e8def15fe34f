//! Shape validators: each checks one structural pattern and reports into the sink

use serde_json::Value;

use super::registry::{FieldLevel, Shape};
use super::sink::ErrorSink;
use super::violation::{ValueKind, Violation};
use super::walker::walk_declaration;

/// `prefix.field`, or just `field` at the root
pub(crate) fn field_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// `prefix[index]`
pub(crate) fn index_path(prefix: &str, index: usize) -> String {
    format!("{prefix}[{index}]")
}

/// Dispatch a field value to the validator for its shape
pub fn check_shape(shape: Shape, value: &Value, path: &str, sink: &mut ErrorSink) {
    match shape {
        Shape::String => check_string(value, path, "string", sink),
        Shape::ArrayOfStrings => check_array_of_strings(value, path, sink),
        Shape::StringOrArray => check_string_or_array(value, path, sink),
        Shape::BooleanOrString => check_boolean_or_string(value, path, sink),
        Shape::Mods => check_mods(value, path, sink),
        Shape::Declaration { level, arrays } => {
            check_declarations(value, path, level, arrays, sink)
        }
        Shape::IncludeLiteral => check_include(value, path, sink),
    }
}

pub fn check_string(value: &Value, path: &str, expected: &'static str, sink: &mut ErrorSink) {
    if !value.is_string() {
        sink.report(Violation::WrongType {
            path: path.to_string(),
            actual: ValueKind::of(value),
            expected,
        });
    }
}

/// Checks each item is a string. A non-array is reported as a single wrong type.
pub fn check_array_of_strings(value: &Value, path: &str, sink: &mut ErrorSink) {
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                check_string(item, &index_path(path, i), "string", sink);
            }
        }
        other => check_string(other, path, "array of strings", sink),
    }
}

pub fn check_string_or_array(value: &Value, path: &str, sink: &mut ErrorSink) {
    if value.is_array() {
        check_array_of_strings(value, path, sink);
    } else {
        check_string(value, path, "string", sink);
    }
}

pub fn check_boolean_or_string(value: &Value, path: &str, sink: &mut ErrorSink) {
    if !value.is_boolean() {
        check_string(value, path, "boolean or string", sink);
    }
}

/// `mods: ['a', 'b']` or `mods: { disabled: true, size: 'm', types: ['x'] }`
pub fn check_mods(value: &Value, path: &str, sink: &mut ErrorSink) {
    match value {
        Value::Array(_) => check_array_of_strings(value, path, sink),
        Value::Object(mods) => {
            for (name, mod_value) in mods {
                let mod_path = field_path(path, name);
                if mod_value.is_array() {
                    check_array_of_strings(mod_value, &mod_path, sink);
                } else {
                    check_boolean_or_string(mod_value, &mod_path, sink);
                }
            }
        }
        other => sink.report(Violation::WrongType {
            path: path.to_string(),
            actual: ValueKind::of(other),
            expected: "array or object",
        }),
    }
}

pub fn check_include(value: &Value, path: &str, sink: &mut ErrorSink) {
    if !matches!(value, Value::Bool(false)) {
        sink.report(Violation::InvalidLiteral {
            path: path.to_string(),
            value: value.to_string(),
        });
    }
}

/// A nested declaration, a bare string shorthand, or (with `arrays`) a list of either
pub fn check_declarations(
    value: &Value,
    path: &str,
    level: FieldLevel,
    arrays: bool,
    sink: &mut ErrorSink,
) {
    match value {
        Value::Object(_) => walk_declaration(value, path, level, sink),
        Value::Array(items) if arrays => {
            for (i, item) in items.iter().enumerate() {
                check_declaration_item(item, &index_path(path, i), level, sink);
            }
        }
        Value::String(_) => {}
        other => sink.report(Violation::WrongDeclaration {
            path: path.to_string(),
            actual: ValueKind::of(other),
            expected: if arrays {
                "string, array or object"
            } else {
                "string or object"
            },
        }),
    }
}

fn check_declaration_item(item: &Value, path: &str, level: FieldLevel, sink: &mut ErrorSink) {
    match item {
        Value::Object(_) => walk_declaration(item, path, level, sink),
        Value::String(_) => {}
        other => sink.report(Violation::WrongDeclaration {
            path: path.to_string(),
            actual: ValueKind::of(other),
            expected: "string or object",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(shape: Shape, value: Value) -> Vec<String> {
        let mut sink = ErrorSink::new();
        check_shape(shape, &value, "field", &mut sink);
        sink.finish().messages()
    }

    #[test]
    fn test_string() {
        assert!(run(Shape::String, json!("ok")).is_empty());
        assert_eq!(
            run(Shape::String, json!(5)),
            vec!["Invalid type (number) in \"field\", expected string"]
        );
    }

    #[test]
    fn test_array_of_strings_labels_each_index() {
        assert!(run(Shape::ArrayOfStrings, json!([])).is_empty());
        assert_eq!(
            run(Shape::ArrayOfStrings, json!(["a", 1, "b", false])),
            vec![
                "Invalid type (number) in \"field[1]\", expected string",
                "Invalid type (boolean) in \"field[3]\", expected string",
            ]
        );
    }

    #[test]
    fn test_array_of_strings_rejects_scalar() {
        assert_eq!(
            run(Shape::ArrayOfStrings, json!("a")),
            vec!["Invalid type (string) in \"field\", expected array of strings"]
        );
    }

    #[test]
    fn test_string_or_array() {
        assert!(run(Shape::StringOrArray, json!("e1")).is_empty());
        assert!(run(Shape::StringOrArray, json!(["e1", "e2"])).is_empty());
        assert_eq!(
            run(Shape::StringOrArray, json!({})),
            vec!["Invalid type (object) in \"field\", expected string"]
        );
    }

    #[test]
    fn test_boolean_or_string() {
        assert!(run(Shape::BooleanOrString, json!(true)).is_empty());
        assert!(run(Shape::BooleanOrString, json!(false)).is_empty());
        assert!(run(Shape::BooleanOrString, json!("yes")).is_empty());
        assert_eq!(
            run(Shape::BooleanOrString, json!(null)),
            vec!["Invalid type (null) in \"field\", expected boolean or string"]
        );
    }

    #[test]
    fn test_include_accepts_only_false() {
        assert!(run(Shape::IncludeLiteral, json!(false)).is_empty());
        assert_eq!(
            run(Shape::IncludeLiteral, json!("false")),
            vec!["Invalid value (\"false\") in \"field\", expected false"]
        );
    }

    #[test]
    fn test_declaration_without_arrays_rejects_list() {
        let shape = Shape::Declaration {
            level: FieldLevel::Top,
            arrays: false,
        };
        assert!(run(shape, json!("b1")).is_empty());
        assert_eq!(
            run(shape, json!(["b1"])),
            vec!["Invalid declaration type (array) in \"field\", expected string or object"]
        );
    }

    #[test]
    fn test_declaration_array_items() {
        let shape = Shape::Declaration {
            level: FieldLevel::Top,
            arrays: true,
        };
        assert_eq!(
            run(shape, json!(["b1", { "block": "b2" }, 3, [], null])),
            vec![
                "Invalid declaration type (number) in \"field[2]\", expected string or object",
                "Invalid declaration type (array) in \"field[3]\", expected string or object",
                "Invalid declaration type (null) in \"field[4]\", expected string or object",
            ]
        );
    }

    #[test]
    fn test_paths() {
        assert_eq!(field_path("", "tech"), "tech");
        assert_eq!(field_path("mustDeps[0]", "block"), "mustDeps[0].block");
        assert_eq!(index_path("elems", 3), "elems[3]");
        assert_eq!(index_path("", 0), "[0]");
    }
}
