use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use depslint::models::LintConfig;
use depslint::validation::FieldLevel;

mod commands;

use commands::{OutputFormat, fields_command, validate_command};

#[derive(Parser)]
#[command(
    name = "depslint",
    about = "Validates the structure of BEM deps.js declarations",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to a depslint config file (defaults to ./.depslint.yml when present)
    #[arg(short, long, global = true, env = "DEPSLINT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output (use -vv for debug output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate deps files (default command)
    Validate {
        /// Files or directories to check (defaults to the current directory)
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the fields a declaration may contain
    Fields {
        /// Only list the fields of one level
        #[arg(short, long, value_enum)]
        level: Option<FieldLevel>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Validate { paths, format }) => {
            let config = load_config(cli.config)?;
            validate_command(&paths, &config, format)?;
        }
        Some(Commands::Fields { level }) => {
            fields_command(level)?;
        }
        None => {
            // Default to validating the current directory
            let config = load_config(cli.config)?;
            validate_command(&[], &config, OutputFormat::default())?;
        }
    }

    Ok(())
}

fn load_config(explicit: Option<PathBuf>) -> Result<LintConfig> {
    let cwd = std::env::current_dir()?;
    LintConfig::load(explicit.as_deref(), &cwd)
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbose {
        0 => EnvFilter::new("depslint=warn"), // Default: warnings and errors only
        1 => EnvFilter::new("depslint=info"), // -v: info messages
        _ => EnvFilter::new("depslint=debug"), // -vv or more: full debug
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
