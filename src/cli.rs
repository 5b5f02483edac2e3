//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::options::ProductVersion;

/// msipack - Windows Installer creation tool
#[derive(Parser)]
#[command(name = "msipack")]
#[command(about = "Compile a declarative TOML config into an MSI installer project")]
#[command(version)]
pub struct Cli {
    /// Print extended output
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new config file from the embedded template
    Init {
        /// Where to write the config file
        #[arg(short, long, default_value = "config.msi.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Build an installer project from a config file
    Build {
        /// Path to the configuration file (default: the single *.msi.toml
        /// in the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Version of the app, overrides the config value
        #[arg(long)]
        version: Option<ProductVersion>,

        /// Platform the installer should run on
        #[arg(long, value_parser = ["x86", "x64", "arm32", "arm64"])]
        platform: Option<String>,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,

        /// Source directory spec to include, can be provided multiple times
        #[arg(long = "dir")]
        dirs: Vec<String>,

        /// Source file to include, can be provided multiple times
        #[arg(long = "file")]
        files: Vec<String>,

        /// Name of the code signing certificate to use
        #[arg(long)]
        certificate_name: Option<String>,

        /// Password of the code signing certificate
        #[arg(long)]
        certificate_password: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_build_defaults() {
        let cli = Cli::try_parse_from(["msipack", "build"]).unwrap();
        match cli.command {
            Commands::Build {
                config,
                version,
                platform,
                ..
            } => {
                assert!(config.is_none());
                assert!(version.is_none());
                assert!(platform.is_none());
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_with_overrides() {
        let cli = Cli::try_parse_from([
            "msipack",
            "build",
            "--config",
            "app.msi.toml",
            "--version",
            "2.0.1",
            "--platform",
            "arm64",
            "--dir",
            "bin\\*.*",
            "--dir",
            "assets\\*.*",
            "--file",
            "readme.txt",
        ])
        .unwrap();

        match cli.command {
            Commands::Build {
                config,
                version,
                platform,
                dirs,
                files,
                ..
            } => {
                assert_eq!(config.unwrap().to_str().unwrap(), "app.msi.toml");
                assert_eq!(version.unwrap().to_string(), "2.0.1");
                assert_eq!(platform.as_deref(), Some("arm64"));
                assert_eq!(dirs.len(), 2);
                assert_eq!(files, vec!["readme.txt".to_string()]);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_rejects_bad_version() {
        let result = Cli::try_parse_from(["msipack", "build", "--version", "not.a.version"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_build_rejects_bad_platform() {
        let result = Cli::try_parse_from(["msipack", "build", "--platform", "mips"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_init_defaults() {
        let cli = Cli::try_parse_from(["msipack", "init"]).unwrap();
        match cli.command {
            Commands::Init { output, force } => {
                assert_eq!(output.to_str().unwrap(), "config.msi.toml");
                assert!(!force);
            }
            _ => panic!("Expected Init command"),
        }
    }
}
