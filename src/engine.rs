//! Packaging engine interface.
//!
//! The compiler hands a finished [`InstallerProject`] to a packaging engine,
//! which owns wildcard-glob expansion of directory entries, file embedding,
//! signing, and emission of the final package artifact. This crate ships a
//! manifest-emitting engine that serializes the resolved model for an
//! external WiX-based packager to consume.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::project::InstallerProject;

/// Extension of the emitted manifest file.
pub const MANIFEST_EXTENSION: &str = "msi.json";

/// Consumes a resolved installer project and produces a package artifact,
/// returning its path. Implementations own everything past the model
/// handoff: glob expansion, signing, byte-level packaging.
pub trait PackagingEngine {
    fn package(&self, project: &InstallerProject) -> Result<PathBuf>;
}

/// Engine that writes the project model as a JSON manifest at
/// `<outDir>/<outFileName>.msi.json`.
#[derive(Debug, Default)]
pub struct JsonManifestEngine;

impl JsonManifestEngine {
    pub fn new() -> Self {
        Self
    }
}

impl PackagingEngine for JsonManifestEngine {
    fn package(&self, project: &InstallerProject) -> Result<PathBuf> {
        let manifest = serde_json::to_string_pretty(project)
            .context("Failed to serialize installer project")?;

        fs::create_dir_all(&project.out_dir).with_context(|| {
            format!("Failed to create output directory {:?}", project.out_dir)
        })?;

        let path = project
            .out_dir
            .join(format!("{}.{}", project.out_file_name, MANIFEST_EXTENSION));
        fs::write(&path, manifest)
            .with_context(|| format!("Failed to write manifest to {path:?}"))?;

        info!(path = %path.display(), "package manifest written");
        Ok(path)
    }
}
