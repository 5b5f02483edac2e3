//! msipack library
//!
//! Compiles a declarative TOML installer description into a fully resolved,
//! packaging-engine-agnostic installer project model.

pub mod cli;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod error;
pub mod install_set;
pub mod options;
pub mod project;
pub mod template;

// Re-export main types for convenience
pub use compiler::{compile, verify_resources};
pub use config::{Config, Overrides};
pub use engine::{JsonManifestEngine, PackagingEngine};
pub use error::CompileError;
pub use options::{
    EnvVarPart, InstallScope, Platform, ProductVersion, ShortcutLocation, UiLevel,
};
pub use project::{InstallEntry, InstallerProject, ShortcutBinding};
