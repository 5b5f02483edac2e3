//! The configuration-to-installer-model compiler.
//!
//! `compile` runs a linear, fail-fast pipeline over a parsed [`Config`]:
//! name validation, core option resolution, install set construction,
//! metadata attachment, shortcut and environment-variable binding, and
//! output path resolution. Each stage returns the first error it hits and
//! produces only immutable intermediate values; the whole pass is pure
//! computation. Filesystem existence checks for referenced resources are a
//! separate pass, [`verify_resources`], so the compiler itself can be tested
//! without touching the filesystem.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::{Config, EnvVarConfig, ShortcutConfig};
use crate::error::{CompileError, Result};
use crate::install_set::build_install_set;
use crate::options::{
    resolve_env_var_part, resolve_guid, resolve_install_scope, resolve_platform,
    resolve_shortcut_location, resolve_ui_level, resolve_version, Platform, ProductVersion,
};
use crate::project::{
    ControlPanelInfo, EnvVarBinding, InstallDirectory, InstallerProject, ShortcutBinding,
    INSTALL_DIR_TOKEN,
};

/// Packaging extension stripped from a configured output file name.
const PACKAGE_EXTENSION: &str = ".msi";

/// Compile a configuration document into an installer project model.
///
/// Pure except for log output: compiling the same config twice yields
/// identical models. Referenced-resource existence is checked separately by
/// [`verify_resources`].
pub fn compile(config: &Config) -> Result<InstallerProject> {
    let name = validate_name(&config.general.name)?;

    if config.general.guid.is_empty() {
        return Err(CompileError::MissingRequiredField {
            field: "general.guid",
        });
    }
    let guid = resolve_guid(&config.general.guid).ok_or_else(|| CompileError::InvalidGuid {
        value: config.general.guid.clone(),
    })?;
    let platform = resolve_platform(config.general.platform.as_deref())?;
    let version = resolve_version(config.general.version.as_deref());
    let scope = resolve_install_scope(config.general.scope.as_deref())?;
    let ui = resolve_ui_level(config.general.ui.as_deref())?;

    debug!(%name, %platform, %version, "core options resolved");

    let metadata = config.metadata.clone().unwrap_or_default();
    let installation = config.installation.clone().unwrap_or_default();

    let install_dir = build_install_set(
        scope,
        installation.dest.as_deref(),
        metadata.manufacturer.as_deref(),
        name,
        &installation.files,
        &installation.dirs,
        installation.recursive.unwrap_or(true),
    );

    let control_panel = ControlPanelInfo {
        display_name: metadata.display_name.clone(),
        manufacturer: metadata.manufacturer.clone(),
        icon_file: metadata.icon.clone(),
        help_url: metadata.help_url.clone(),
        about_url: metadata.about_url.clone(),
        update_url: metadata.update_url.clone(),
        no_repair: metadata.forbid_repair.unwrap_or(false),
        no_modify: metadata.forbid_modify.unwrap_or(false),
        no_remove: metadata.forbid_remove.unwrap_or(false),
        hidden: metadata.hidden.unwrap_or(false),
    };

    let shortcuts = bind_shortcuts(&installation.shortcuts, &install_dir, name)?;
    let environment = bind_environment_variables(&installation.env)?;

    let (out_dir, out_file_name) = resolve_output_path(
        config.general.out_file.as_deref(),
        name,
        &version,
        platform,
    )?;

    Ok(InstallerProject {
        name: name.to_string(),
        guid,
        platform,
        version,
        scope,
        ui,
        description: metadata.description.unwrap_or_default(),
        license_file: metadata.license,
        banner_image: metadata.banner,
        background_image: metadata.dialog,
        control_panel,
        install_dir,
        shortcuts,
        environment,
        signing: installation.signing,
        reboot_required: config.general.reboot.unwrap_or(false),
        out_dir,
        out_file_name,
    })
}

/// Name must be non-empty and contain no whitespace.
fn validate_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(CompileError::MissingRequiredField {
            field: "general.name",
        });
    }
    if name.contains(char::is_whitespace) {
        return Err(CompileError::InvalidOption {
            field: "general.name",
            value: name.to_string(),
        });
    }
    Ok(name)
}

/// Match each shortcut target against the install set by file-name suffix.
///
/// Zero matches is fatal; multiple matches warn and bind to the first entry
/// in install-set order (literal files before expanded directories).
fn bind_shortcuts(
    shortcuts: &[ShortcutConfig],
    install_dir: &InstallDirectory,
    product_name: &str,
) -> Result<Vec<ShortcutBinding>> {
    shortcuts
        .iter()
        .map(|shortcut| {
            let matches: Vec<&str> = install_dir
                .entries
                .iter()
                .filter(|entry| {
                    entry
                        .file_name()
                        .is_some_and(|name| name.ends_with(&shortcut.target))
                })
                .filter_map(|entry| match entry {
                    crate::project::InstallEntry::File { source } => Some(source.as_str()),
                    crate::project::InstallEntry::Dir { .. } => None,
                })
                .collect();

            let target = match matches.as_slice() {
                [] => {
                    return Err(CompileError::ShortcutTargetNotFound {
                        target: shortcut.target.clone(),
                    })
                }
                [only] => *only,
                [first, ..] => {
                    warn!(
                        shortcut = %shortcut.target,
                        matches = matches.len(),
                        bound = first,
                        "shortcut target matches multiple files, using first match"
                    );
                    *first
                }
            };

            Ok(ShortcutBinding {
                target: target.to_string(),
                name: shortcut
                    .name
                    .clone()
                    .unwrap_or_else(|| product_name.to_string()),
                location: resolve_shortcut_location(shortcut.location.as_deref())?,
            })
        })
        .collect()
}

/// Resolve env-var parts and substitute `@` with the install-dir token.
fn bind_environment_variables(entries: &[EnvVarConfig]) -> Result<Vec<EnvVarBinding>> {
    entries
        .iter()
        .map(|entry| {
            Ok(EnvVarBinding {
                name: entry.name.clone(),
                value: entry.value.replace('@', INSTALL_DIR_TOKEN),
                part: resolve_env_var_part(entry.part.as_deref())?,
            })
        })
        .collect()
}

/// Split the output file into directory and extension-less file name,
/// synthesizing `<name>-<version>-<platform>` in the working directory when
/// no output file is configured.
fn resolve_output_path(
    out_file: Option<&str>,
    name: &str,
    version: &ProductVersion,
    platform: Platform,
) -> Result<(PathBuf, String)> {
    let out_file = match out_file {
        Some(path) => path.to_string(),
        None => format!("{name}-{version}-{platform}"),
    };

    let path = Path::new(&out_file);
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    // Only a trailing packaging extension is stripped; any other extension
    // is part of the output name. The offset check stays on char boundaries
    // so multi-byte file names pass through untouched.
    let stem = match file_name.len().checked_sub(PACKAGE_EXTENSION.len()) {
        Some(at)
            if file_name.is_char_boundary(at)
                && file_name[at..].eq_ignore_ascii_case(PACKAGE_EXTENSION) =>
        {
            &file_name[..at]
        }
        _ => file_name,
    };

    if stem.is_empty() {
        return Err(CompileError::InvalidOutputPath { path: out_file });
    }

    let out_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((out_dir, stem.to_string()))
}

/// Check that every referenced filesystem resource exists: license, banner
/// and dialog images, control-panel icon, and the signing certificate when
/// it is given as a file path. The one I/O-bound step of the pipeline; run
/// it after [`compile`] and before handing the model to the engine.
pub fn verify_resources(project: &InstallerProject) -> Result<()> {
    let mut referenced: Vec<(&'static str, Option<&String>)> = vec![
        ("metadata.license", project.license_file.as_ref()),
        ("metadata.banner", project.banner_image.as_ref()),
        ("metadata.dialog", project.background_image.as_ref()),
        ("metadata.icon", project.control_panel.icon_file.as_ref()),
    ];
    if let Some(signing) = &project.signing {
        // A store certificate name has no path separators or extension to
        // check; only verify values that point into the filesystem.
        if let Some(certificate) = signing
            .certificate
            .as_ref()
            .filter(|c| Path::new(c).extension().is_some())
        {
            referenced.push(("installation.signing.certificate", Some(certificate)));
        }
    }

    for (field, path) in referenced {
        if let Some(path) = path {
            if !Path::new(path).exists() {
                return Err(CompileError::ReferencedFileNotFound {
                    field,
                    path: path.clone(),
                });
            }
        }
    }

    Ok(())
}
