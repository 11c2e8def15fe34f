use serde_json::Value;

use super::registry::{FieldLevel, field_set};
use super::shapes::{check_shape, field_path};
use super::sink::ErrorSink;
use super::violation::{ValueKind, Violation};

/// Validate one declaration object against the field set for `level`.
///
/// Every field is visited; unknown fields are reported and their values skipped.
pub fn walk_declaration(value: &Value, path: &str, level: FieldLevel, sink: &mut ErrorSink) {
    let Value::Object(fields) = value else {
        sink.report(Violation::WrongDeclaration {
            path: path.to_string(),
            actual: ValueKind::of(value),
            expected: "object",
        });
        return;
    };

    let legal = field_set(level);
    for (name, field_value) in fields {
        let child = field_path(path, name);
        match legal.lookup(name) {
            None => sink.report(Violation::UnknownField {
                path: child,
                field: name.clone(),
            }),
            Some(Some(shape)) => check_shape(shape, field_value, &child, sink),
            Some(None) => {}
        }
    }
}
