//! msipack - Main entry point
//!
//! Dispatches CLI subcommands and maps compiler errors to process exit
//! codes. All domain work lives in the library; this layer only does
//! argument handling, config discovery/loading and user-facing output.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use msipack::cli::{Cli, Commands};
use msipack::compiler::{compile, verify_resources};
use msipack::config::{find_config_file, Config, DiscoveryError, Overrides};
use msipack::engine::{JsonManifestEngine, PackagingEngine};
use msipack::error::exit_codes;
use msipack::options::Platform;
use msipack::template::load_template;

/// Initialize tracing with a verbosity-dependent default filter.
/// `RUST_LOG` overrides both.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);
    debug!("CLI arguments parsed");

    let code = match cli.command {
        Commands::Init { output, force } => run_init(&output, force),
        Commands::Build {
            config,
            version,
            platform,
            output,
            dirs,
            files,
            certificate_name,
            certificate_password,
        } => run_build(
            config,
            Overrides {
                version,
                // Unreachable in practice: clap restricts the vocabulary.
                platform: platform.as_deref().and_then(|s| s.parse::<Platform>().ok()),
                output_file: output,
                dirs,
                files,
                certificate_name,
                certificate_password,
            },
        ),
    };

    ExitCode::from(code)
}

/// Write the embedded template config to `output`.
fn run_init(output: &Path, force: bool) -> u8 {
    if output.exists() && !force {
        eprintln!(
            "Error: '{}' already exists, use --force to overwrite",
            output.display()
        );
        return exit_codes::INVALID_ARGUMENTS;
    }

    if let Err(e) = std::fs::write(output, load_template()) {
        eprintln!("Error: Failed to write '{}': {}", output.display(), e);
        return exit_codes::UNKNOWN_ERROR;
    }

    println!("Created config file '{}'", output.display());
    exit_codes::SUCCESS
}

/// Load the config (discovering it if necessary), merge CLI overrides,
/// compile, and hand the model to the packaging engine.
fn run_build(config_path: Option<PathBuf>, overrides: Overrides) -> u8 {
    let config_path = match config_path {
        Some(path) => path,
        None => match find_config_file(Path::new(".")) {
            Ok(path) => {
                println!("No config file specified, using '{}'", path.display());
                path
            }
            Err(e @ DiscoveryError::NotFound) => {
                eprintln!("Error: {e}");
                return exit_codes::FILE_NOT_FOUND;
            }
            Err(e @ DiscoveryError::Multiple(_)) => {
                eprintln!("Error: {e}");
                return exit_codes::INVALID_ARGUMENTS;
            }
            Err(e) => {
                eprintln!("Error: {e}");
                return exit_codes::UNKNOWN_ERROR;
            }
        },
    };

    info!(config = %config_path.display(), "loading config file");

    let mut config = match Config::load_from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            // Distinguish "cannot read" from "cannot parse" for the exit code.
            return if config_path.exists() {
                eprintln!("Error in config file: {e:#}");
                exit_codes::INVALID_CONFIG
            } else {
                eprintln!("Error: {e:#}");
                exit_codes::FILE_NOT_FOUND
            };
        }
    };

    config.apply_overrides(overrides);

    println!("Configuring installer project...");
    let project = match compile(&config) {
        Ok(project) => project,
        Err(e) => {
            eprintln!("Config error: {e}");
            return e.exit_code();
        }
    };

    if let Err(e) = verify_resources(&project) {
        eprintln!("Error: {e}");
        return e.exit_code();
    }

    println!("Building installer package...");
    match JsonManifestEngine::new().package(&project) {
        Ok(path) => {
            println!("Wrote '{}'", path.display());
            exit_codes::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::UNKNOWN_ERROR
        }
    }
}
