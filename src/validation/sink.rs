use serde::Serialize;

use super::violation::Violation;

/// Append-only collector threaded through a single validation pass
#[derive(Debug, Default)]
pub struct ErrorSink {
    violations: Vec<Violation>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn finish(self) -> ValidationReport {
        ValidationReport {
            violations: self.violations,
        }
    }
}

/// Outcome of validating one deps tree. An empty report means the tree is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Rendered messages, in the order the violations were found
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

impl IntoIterator for ValidationReport {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}
