//! Loading deps artifacts into trees the validator can walk
//!
//! Sources are decoded with literal parsers only; nothing in a deps file is
//! ever executed.

mod error;
pub mod file_scanner;
pub mod js_literal;

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use self::error::LoadError;
pub use self::file_scanner::FileScanner;

/// Encoding of a deps artifact, chosen by file suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepsFormat {
    /// `*.deps.js`: a JavaScript object or array literal
    JsLiteral,
    Json,
    Yaml,
}

impl DepsFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => DepsFormat::Json,
            Some("yml" | "yaml") => DepsFormat::Yaml,
            _ => DepsFormat::JsLiteral,
        }
    }
}

/// Raw content of one deps artifact
#[derive(Debug, Clone)]
pub struct DepsSource {
    pub path: PathBuf,
    pub content: String,
    pub format: DepsFormat,
}

impl DepsSource {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        let format = DepsFormat::from_path(&path);
        let mut content = content.into();
        if content.starts_with('\u{feff}') {
            content.replace_range(..'\u{feff}'.len_utf8(), "");
        }
        Self {
            path,
            content,
            format,
        }
    }

    pub fn read(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path, content))
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn decode(&self) -> Result<Value, LoadError> {
        let name = self.path.display().to_string();
        debug!("Decoding {name} as {:?}", self.format);
        parse_source(&name, &self.content, self.format)
    }
}

/// Decode deps source text into a tree
pub fn parse_source(name: &str, content: &str, format: DepsFormat) -> Result<Value, LoadError> {
    match format {
        DepsFormat::JsLiteral => {
            let normalized = js_literal::to_json(content)
                .map_err(|e| LoadError::syntax(name, content, e.offset, e.len, e.message))?;
            serde_json::from_str(&normalized.json).map_err(|e| {
                let offset = normalized.origin_at(e.line(), e.column());
                LoadError::syntax(name, content, offset, 1, strip_location(&e.to_string()))
            })
        }
        DepsFormat::Json => serde_json::from_str(content).map_err(|e| {
            let offset = offset_of(content, e.line(), e.column());
            LoadError::syntax(name, content, offset, 1, strip_location(&e.to_string()))
        }),
        DepsFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
            let offset = e.location().map(|l| l.index()).unwrap_or(0);
            LoadError::syntax(name, content, offset, 1, strip_location(&e.to_string()))
        }),
    }
}

fn offset_of(content: &str, line: usize, column: usize) -> usize {
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    line_start + column.saturating_sub(1)
}

/// Parser messages end with " at line X column Y"; the diagnostic label shows that already
fn strip_location(message: &str) -> String {
    match message.find(" at line ") {
        Some(at) => message[..at].to_string(),
        None => message.to_string(),
    }
}
