pub mod config;

// Re-export commonly used types
pub use config::{DEFAULT_CONFIG_FILE, DEPS_TECH, LintConfig};
