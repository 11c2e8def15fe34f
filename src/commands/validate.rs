use anyhow::Result;
use colored::Colorize;
use depslint::loader::{DepsSource, FileScanner};
use depslint::models::{DEPS_TECH, LintConfig};
use depslint::plugin::{DepsLinter, LintRecord, TechArtifact};
use miette::Report;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Outcome for one deps file
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileReport {
    path: String,
    errors: Vec<LintRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    load_error: Option<String>,
}

impl FileReport {
    fn failed(&self) -> bool {
        !self.errors.is_empty() || self.load_error.is_some()
    }
}

pub fn validate_command(paths: &[PathBuf], config: &LintConfig, format: OutputFormat) -> Result<()> {
    let paths = if paths.is_empty() {
        vec![std::env::current_dir()?]
    } else {
        paths.to_vec()
    };

    let scanner = FileScanner::new(&config.techs, &config.exclude);
    let files = scanner.scan_paths(&paths)?;
    if files.is_empty() {
        warn!("No deps files found in {:?}", paths);
    }

    let linter = DepsLinter::new(config);
    let fallback_tech = linter
        .techs()
        .first()
        .map(String::as_str)
        .unwrap_or(DEPS_TECH);

    let mut reports = Vec::with_capacity(files.len());
    for file in &files {
        debug!("Validating {}", file.display());
        let tech = scanner.tech_of(file).unwrap_or(fallback_tech);
        let mut report = FileReport {
            path: file.display().to_string(),
            errors: Vec::new(),
            load_error: None,
        };

        let outcome = DepsSource::read(file).and_then(|source| {
            let artifact = TechArtifact {
                tech,
                path: &source.path,
                content: Some(&source.content),
            };
            linter.for_entity_tech(&artifact, &mut report.errors)
        });

        if let Err(err) = outcome {
            report.load_error = Some(err.to_string());
            if matches!(format, OutputFormat::Text) {
                eprintln!();
                eprintln!("{:?}", Report::new(err));
            }
        }

        reports.push(report);
    }

    match format {
        OutputFormat::Text => print_text(&reports),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    let failed_files = reports.iter().filter(|r| r.failed()).count();
    let error_count: usize = reports.iter().map(|r| r.errors.len()).sum();
    let load_failures = reports.iter().filter(|r| r.load_error.is_some()).count();

    if failed_files > 0 {
        anyhow::bail!(
            "Deps validation failed: {error_count} error(s) and {load_failures} unreadable file(s) in {failed_files} of {} file(s)",
            reports.len()
        );
    }

    info!("✓ {} deps file(s) validated", reports.len());
    if matches!(format, OutputFormat::Text) {
        println!(
            "{}",
            format!("✅ All {} deps file(s) are valid", reports.len()).green()
        );
    }
    Ok(())
}

fn print_text(reports: &[FileReport]) {
    for report in reports.iter().filter(|r| !r.errors.is_empty()) {
        println!("{}", report.path.bold());
        for error in &report.errors {
            println!("  {} {}", "✗".red(), error.detail.red());
        }
        println!();
    }
}
