//! The fully resolved installer project model.
//!
//! This is the compiler's output: a packaging-engine-agnostic description of
//! what to build. It is created once per compile and owned exclusively by the
//! packaging engine after handoff; the compiler never mutates it afterwards.

use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

use crate::config::SigningConfig;
use crate::options::{
    EnvVarPart, InstallScope, Platform, ProductVersion, ShortcutLocation, UiLevel,
};

/// Token the packaging engine resolves to the final install directory at
/// install time. The literal `@` in env-var values maps to this.
pub const INSTALL_DIR_TOKEN: &str = "[INSTALLDIR]";

/// Fully resolved installer project, ready for the packaging engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallerProject {
    pub name: String,
    pub guid: Uuid,
    pub platform: Platform,
    pub version: ProductVersion,
    pub scope: InstallScope,
    pub ui: UiLevel,
    pub description: String,
    pub license_file: Option<String>,
    pub banner_image: Option<String>,
    pub background_image: Option<String>,
    pub control_panel: ControlPanelInfo,
    pub install_dir: InstallDirectory,
    pub shortcuts: Vec<ShortcutBinding>,
    pub environment: Vec<EnvVarBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing: Option<SigningConfig>,
    pub reboot_required: bool,
    /// Directory the package artifact is written to.
    pub out_dir: PathBuf,
    /// Output file name without the packaging extension.
    pub out_file_name: String,
}

/// Control-panel (installed-programs list) metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ControlPanelInfo {
    pub display_name: Option<String>,
    pub manufacturer: Option<String>,
    pub icon_file: Option<String>,
    pub help_url: Option<String>,
    pub about_url: Option<String>,
    pub update_url: Option<String>,
    pub no_repair: bool,
    pub no_modify: bool,
    pub no_remove: bool,
    pub hidden: bool,
}

/// The resolved install destination and its ordered contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallDirectory {
    /// Destination path; may contain unexpanded environment-variable
    /// placeholders resolved by the packaging engine.
    pub path: String,
    /// Literal file entries first, directory entries after, each group in
    /// config declaration order. Shortcut matching depends on this order.
    pub entries: Vec<InstallEntry>,
}

/// One entry of the install set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InstallEntry {
    /// A literal source file.
    File { source: String },
    /// A wildcard directory spec, expanded by the packaging engine.
    Dir { source: String, recursive: bool },
}

impl InstallEntry {
    /// File name component of the entry's source path, for literal files.
    /// Both `/` and `\` count as separators since config paths are written
    /// in Windows style but builds may run elsewhere.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            // rsplit always yields at least one item.
            Self::File { source } => source.rsplit(['/', '\\']).next(),
            Self::Dir { .. } => None,
        }
    }
}

/// A shortcut bound to a resolved install file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortcutBinding {
    /// Source path of the matched file entry.
    pub target: String,
    pub name: String,
    pub location: ShortcutLocation,
}

/// A resolved environment variable entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvVarBinding {
    pub name: String,
    /// Value with `@` already substituted by [`INSTALL_DIR_TOKEN`].
    pub value: String,
    pub part: EnvVarPart,
}
