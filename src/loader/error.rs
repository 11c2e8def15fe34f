use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a deps artifact into a tree. Distinct from structural violations:
/// when loading fails there is nothing to validate.
#[derive(Error, Debug, Diagnostic)]
pub enum LoadError {
    #[error("Failed to read {}", .path.display())]
    #[diagnostic(code(depslint::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse deps declaration: {message}")]
    #[diagnostic(
        code(depslint::syntax),
        help("deps files must hold a single object or array literal")
    )]
    Syntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
        message: String,
    },
}

impl LoadError {
    pub fn syntax(
        name: &str,
        content: &str,
        offset: usize,
        len: usize,
        message: impl Into<String>,
    ) -> Self {
        let offset = offset.min(content.len());
        let len = len.min(content.len() - offset);
        LoadError::Syntax {
            src: crate::error_utils::create_named_source(name, content.to_string()),
            span: SourceSpan::new(offset.into(), len),
            message: message.into(),
        }
    }
}
