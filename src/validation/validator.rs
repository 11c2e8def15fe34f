use serde_json::Value;
use tracing::debug;

use super::registry::FieldLevel;
use super::shapes::index_path;
use super::sink::{ErrorSink, ValidationReport};
use super::violation::{ValueKind, Violation};
use super::walker::walk_declaration;

/// Validates deps trees: a single declaration or an array of declarations.
///
/// Holds no state; one instance may validate any number of trees, from any thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, tree: &Value) -> ValidationReport {
        let mut sink = ErrorSink::new();

        match tree {
            Value::Object(_) => walk_declaration(tree, "", FieldLevel::Top, &mut sink),
            Value::Array(decls) => {
                for (i, decl) in decls.iter().enumerate() {
                    walk_declaration(decl, &index_path("", i), FieldLevel::Top, &mut sink);
                }
            }
            other => sink.report(Violation::WrongDeclaration {
                path: String::new(),
                actual: ValueKind::of(other),
                expected: "array or object",
            }),
        }

        let report = sink.finish();
        debug!(
            "Deps validation finished with {} violation(s)",
            report.violations.len()
        );
        report
    }
}

/// Validate a deps tree with the fixed declaration schema
pub fn validate_deps(tree: &Value) -> ValidationReport {
    Validator::new().validate(tree)
}
