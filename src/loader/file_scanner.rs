//! File scanning utilities for discovering deps artifacts

use anyhow::{Context, Result};
use globwalk::{FileType, GlobWalkerBuilder};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FileScanner {
    techs: Vec<String>,
    patterns: Vec<String>,
}

impl FileScanner {
    /// Scanner for files named `*.<tech>`, skipping anything matching `exclude`
    pub fn new(techs: &[String], exclude: &[String]) -> Self {
        let patterns = techs
            .iter()
            .map(|tech| format!("**/*.{tech}"))
            .chain(exclude.iter().map(|pattern| format!("!{pattern}")))
            .collect();

        Self {
            techs: techs.to_vec(),
            patterns,
        }
    }

    /// Tech of a file, if it is one this scanner looks for
    pub fn tech_of(&self, path: &Path) -> Option<&str> {
        let name = path.file_name()?.to_str()?;
        self.techs
            .iter()
            .filter(|tech| name.ends_with(&format!(".{tech}")))
            .max_by_key(|tech| tech.len())
            .map(String::as_str)
    }

    /// Recursively collect deps files under a directory, sorted by path
    pub fn scan_directory(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let walker = GlobWalkerBuilder::from_patterns(dir, &self.patterns)
            .file_type(FileType::FILE)
            .follow_links(false)
            .build()
            .with_context(|| {
                format!(
                    "Failed to evaluate glob patterns {:?} relative to {}",
                    self.patterns,
                    dir.display()
                )
            })?;

        let mut files = BTreeSet::new();
        for entry in walker {
            let entry = entry?;
            files.insert(entry.path().to_path_buf());
        }

        debug!("Found {} deps file(s) under {}", files.len(), dir.display());
        Ok(files.into_iter().collect())
    }

    /// Expand the given paths: directories are scanned, files are taken as-is
    pub fn scan_paths(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for path in paths {
            if path.is_dir() {
                files.extend(self.scan_directory(path)?);
            } else if path.is_file() {
                files.push(path.clone());
            } else {
                anyhow::bail!("Path not found: {}", path.display());
            }
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanner() -> FileScanner {
        FileScanner::new(
            &["deps.js".to_string()],
            &["**/node_modules/**".to_string()],
        )
    }

    #[test]
    fn test_tech_of_prefers_longest_suffix() {
        let scanner = FileScanner::new(&["js".to_string(), "deps.js".to_string()], &[]);
        assert_eq!(scanner.tech_of(Path::new("b1.deps.js")), Some("deps.js"));
        assert_eq!(scanner.tech_of(Path::new("b1.js")), Some("js"));
        assert_eq!(scanner.tech_of(Path::new("b1.css")), None);
    }

    #[test]
    fn test_scan_directory_recurses_and_excludes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("blocks/b1/__e1")).unwrap();
        fs::create_dir_all(root.join("node_modules/lib/b2")).unwrap();
        fs::write(root.join("blocks/b1/b1.deps.js"), "({})").unwrap();
        fs::write(root.join("blocks/b1/__e1/b1__e1.deps.js"), "({})").unwrap();
        fs::write(root.join("blocks/b1/b1.css"), "").unwrap();
        fs::write(root.join("node_modules/lib/b2/b2.deps.js"), "({})").unwrap();

        let files = scanner().scan_directory(root).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            relative,
            vec![
                PathBuf::from("blocks/b1/__e1/b1__e1.deps.js"),
                PathBuf::from("blocks/b1/b1.deps.js"),
            ]
        );
    }

    #[test]
    fn test_scan_paths_rejects_missing() {
        let temp_dir = TempDir::new().unwrap();
        let result = scanner().scan_paths(&[temp_dir.path().join("missing")]);
        assert!(result.is_err());
    }
}
