//! Configuration document handling.
//!
//! The config file is a TOML document with `[general]`, `[metadata]` and
//! `[installation]` tables. This module only deserializes and carries the
//! document; all domain validation (name/GUID invariants, option vocabulary,
//! shortcut matching) happens in the compiler. Unknown keys are rejected so
//! that typos surface as parse errors instead of silently ignored settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::options::{Platform, ProductVersion};

/// Filename suffix config files are discovered by.
pub const CONFIG_SUFFIX: &str = ".msi.toml";

/// Top-level configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    pub general: GeneralConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation: Option<InstallationConfig>,
}

/// `[general]` table: identity and top-level options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct GeneralConfig {
    /// Product name. Must be non-empty and contain no whitespace.
    pub name: String,
    /// Product GUID literal. Must parse as a UUID.
    pub guid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reboot: Option<bool>,
    /// Output file path; a trailing `.msi` is stripped by the compiler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_file: Option<String>,
}

/// `[metadata]` table: display and control-panel information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct MetadataConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    /// Path to an RTF license file shown by the installer UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Path to the top banner image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    /// Path to the dialog background image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog: Option<String>,
    /// Path to the control-panel icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_url: Option<String>,
    /// Hide the repair button in the control panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forbid_repair: Option<bool>,
    /// Hide the modify button in the control panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forbid_modify: Option<bool>,
    /// Hide the remove button in the control panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forbid_remove: Option<bool>,
    /// Hide the whole entry from the installed-programs list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

/// `[installation]` table: what gets installed where.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct InstallationConfig {
    /// Destination override; may contain environment-variable placeholders
    /// that the packaging engine expands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest: Option<String>,
    /// Literal source files, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    /// Wildcard directory specs (file-name component is a glob pattern),
    /// in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dirs: Vec<String>,
    /// Expand directory specs recursively. Default: true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVarConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shortcuts: Vec<ShortcutConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing: Option<SigningConfig>,
}

/// One `[[installation.env]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct EnvVarConfig {
    pub name: String,
    /// Value to set. The literal `@` stands for the final install directory
    /// and is substituted with the engine's install-dir token.
    pub value: String,
    /// "all", "prefix" or "suffix". Default: "all".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,
}

/// One `[[installation.shortcuts]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ShortcutConfig {
    /// Suffix of the installed file name the shortcut points at.
    pub target: String,
    /// "programs", "desktop" or "startup". Default: "programs".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Display name. Default: the product name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// `[installation.signing]` table, carried through to the packaging engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct SigningConfig {
    /// Certificate file path or store certificate name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    /// Path to the signing tool, if not on PATH.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_embedded: Option<bool>,
}

/// Errors from config file discovery in the working directory.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("no config file found, please specify one using --config")]
    NotFound,
    #[error("multiple config files found ({0}), please specify one using --config")]
    Multiple(usize),
    #[error("failed to read directory: {0}")]
    Io(#[from] std::io::Error),
}

impl Config {
    /// Parse a config document from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse configuration TOML")
    }

    /// Load a config document from a file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;
        Self::from_toml(&text)
    }

    /// Serialize back to TOML (used by `init` when customizing the template).
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Merge CLI-layer overrides into the document before compilation.
    /// An explicit flag always wins over the file value; extra source
    /// dirs/files are appended after the config-declared ones.
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(version) = overrides.version {
            self.general.version = Some(version.to_string());
        }
        if let Some(platform) = overrides.platform {
            self.general.platform = Some(platform.to_string());
        }
        if let Some(output_file) = overrides.output_file {
            self.general.out_file = Some(output_file);
        }

        if !overrides.dirs.is_empty() {
            self.installation
                .get_or_insert_with(Default::default)
                .dirs
                .extend(overrides.dirs);
        }
        if !overrides.files.is_empty() {
            self.installation
                .get_or_insert_with(Default::default)
                .files
                .extend(overrides.files);
        }

        if overrides.certificate_name.is_some() || overrides.certificate_password.is_some() {
            let signing = self
                .installation
                .get_or_insert_with(Default::default)
                .signing
                .get_or_insert_with(Default::default);
            if let Some(name) = overrides.certificate_name {
                signing.certificate = Some(name);
            }
            if let Some(password) = overrides.certificate_password {
                signing.password = Some(password);
            }
        }
    }
}

/// CLI-layer overrides merged into the config before compilation.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub version: Option<ProductVersion>,
    pub platform: Option<Platform>,
    pub output_file: Option<String>,
    pub dirs: Vec<String>,
    pub files: Vec<String>,
    pub certificate_name: Option<String>,
    pub certificate_password: Option<String>,
}

/// Find the single `*.msi.toml` config file in `dir`.
///
/// Matches are sorted by name so the "multiple found" diagnostic is
/// deterministic.
pub fn find_config_file(dir: &Path) -> Result<PathBuf, DiscoveryError> {
    let mut matches: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(CONFIG_SUFFIX))
        })
        .collect();
    matches.sort();

    debug!(count = matches.len(), "config discovery finished");

    match matches.len() {
        0 => Err(DiscoveryError::NotFound),
        1 => Ok(matches.remove(0)),
        n => Err(DiscoveryError::Multiple(n)),
    }
}
