//! Install destination and file set resolution.
//!
//! Computes the destination directory (unless overridden) and the ordered
//! list of install entries. Literal files always come before expanded
//! directory specs; shortcut binding relies on that order for its
//! deterministic first-match tie-break.

use crate::options::InstallScope;
use crate::project::{InstallDirectory, InstallEntry};

/// Directory root placeholder for machine-wide installs.
const MACHINE_ROOT: &str = "%ProgramFiles%";
/// Directory root placeholder for per-user installs.
const USER_ROOT: &str = "%LocalAppData%";

/// Build the resolved install directory.
///
/// Wildcard syntax of directory specs (a glob file-name component such as a
/// trailing `*.*`) is not validated here; expansion is the packaging
/// engine's job at build time.
pub fn build_install_set(
    scope: InstallScope,
    dest_override: Option<&str>,
    manufacturer: Option<&str>,
    product_name: &str,
    files: &[String],
    dir_specs: &[String],
    recursive: bool,
) -> InstallDirectory {
    let path = match dest_override {
        // Used verbatim; env-var placeholders are expanded by the engine.
        Some(dest) => dest.to_string(),
        None => synthesize_destination(scope, manufacturer, product_name),
    };

    let mut entries: Vec<InstallEntry> =
        Vec::with_capacity(files.len() + dir_specs.len());
    for file in files {
        entries.push(InstallEntry::File {
            source: file.clone(),
        });
    }
    for spec in dir_specs {
        entries.push(InstallEntry::Dir {
            source: spec.clone(),
            recursive,
        });
    }

    InstallDirectory { path, entries }
}

/// `<scope-root>\[<manufacturer>\]<productName>`, manufacturer segment only
/// when non-blank.
fn synthesize_destination(
    scope: InstallScope,
    manufacturer: Option<&str>,
    product_name: &str,
) -> String {
    let root = match scope {
        InstallScope::PerMachine => MACHINE_ROOT,
        InstallScope::PerUser => USER_ROOT,
    };

    match manufacturer.map(str::trim).filter(|m| !m.is_empty()) {
        Some(manufacturer) => format!("{root}\\{manufacturer}\\{product_name}"),
        None => format!("{root}\\{product_name}"),
    }
}
