//! Lint host integration
//!
//! A lint host walks a project's entities and hands each tech artifact to the
//! linters that registered for it. `DepsLinter` registers for the deps techs,
//! decodes the artifact, validates it and reports one record per violation to
//! the entity's error list.

use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::loader::{DepsSource, LoadError};
use crate::models::LintConfig;
use crate::validation::Validator;

/// Message attached to every record produced by the deps linter
pub const DEPS_VALIDATION_MESSAGE: &str = "Deps validation";

/// One problem reported to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintRecord {
    pub message: String,
    pub source_kind: String,
    pub detail: String,
}

/// Error accumulator owned by the host for one entity
pub trait EntityErrors {
    fn add_error(&mut self, record: LintRecord);
}

impl EntityErrors for Vec<LintRecord> {
    fn add_error(&mut self, record: LintRecord) {
        self.push(record);
    }
}

/// A tech file of an entity, as seen by the host
#[derive(Debug, Clone, Copy)]
pub struct TechArtifact<'a> {
    pub tech: &'a str,
    pub path: &'a Path,
    /// `None` when the entity has no such file
    pub content: Option<&'a str>,
}

/// Validates deps artifacts handed over by a lint host
pub struct DepsLinter {
    techs: Vec<String>,
    validator: Validator,
}

impl DepsLinter {
    pub fn new(config: &LintConfig) -> Self {
        Self {
            techs: config.techs.clone(),
            validator: Validator::new(),
        }
    }

    /// Techs this linter wants to receive
    pub fn techs(&self) -> &[String] {
        &self.techs
    }

    /// Validate one artifact, reporting violations to `entity`.
    ///
    /// Returns how many records were added. Missing or blank content is not
    /// an error; undecodable content is returned as a `LoadError`.
    pub fn for_entity_tech(
        &self,
        artifact: &TechArtifact<'_>,
        entity: &mut dyn EntityErrors,
    ) -> Result<usize, LoadError> {
        if !self.techs.iter().any(|tech| tech == artifact.tech) {
            debug!("Skipping {}: tech {} not linted", artifact.path.display(), artifact.tech);
            return Ok(0);
        }

        let Some(content) = artifact.content else {
            return Ok(0);
        };
        let source = DepsSource::new(artifact.path, content);
        if source.is_blank() {
            debug!("Skipping blank {}", artifact.path.display());
            return Ok(0);
        }

        let tree = source.decode()?;
        let report = self.validator.validate(&tree);
        let count = report.violations.len();

        for violation in report {
            entity.add_error(LintRecord {
                message: DEPS_VALIDATION_MESSAGE.to_string(),
                source_kind: artifact.tech.to_string(),
                detail: violation.to_string(),
            });
        }

        Ok(count)
    }
}
