//! Symbolic option resolution.
//!
//! This module replaces stringly-typed configuration values with proper Rust
//! enums and provides the pure resolver functions that turn raw optional
//! strings from the config document into typed values. Policy is uniform
//! across all symbolic options: an absent value takes the documented default,
//! a present-but-unrecognized value is an `InvalidOption` error. The one
//! deliberate exception is the product version, which falls back to `1.0`
//! on a parse failure (lenient by contract, with a warning).

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};
use tracing::warn;
use uuid::Uuid;

use crate::error::CompileError;

/// Processor architecture the installer targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[strum(serialize = "x86")]
    X86,
    #[default]
    #[strum(serialize = "x64")]
    X64,
    #[strum(serialize = "arm32")]
    Arm32,
    #[strum(serialize = "arm64")]
    Arm64,
}

/// Whether the package installs machine-wide or for the current user only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum InstallScope {
    #[default]
    #[strum(serialize = "machine")]
    PerMachine,
    #[strum(serialize = "user")]
    PerUser,
}

/// Installer UI presented to the end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum UiLevel {
    /// Progress bar only, no dialogs ("none" in the config vocabulary).
    #[default]
    #[strum(serialize = "none")]
    ProgressOnly,
    /// Minimal dialog set ("basic").
    #[strum(serialize = "basic")]
    Minimal,
    /// Full dialog set including install directory selection ("full").
    #[strum(serialize = "full")]
    InstallDir,
}

/// How an environment variable value combines with an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum EnvVarPart {
    /// Replace the whole value.
    #[default]
    #[strum(serialize = "all")]
    All,
    #[strum(serialize = "prefix")]
    Prefix,
    #[strum(serialize = "suffix")]
    Suffix,
}

/// Where a shortcut is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutLocation {
    /// The Programs menu folder of the install scope.
    #[default]
    #[strum(serialize = "programs")]
    ProgramMenu,
    #[strum(serialize = "desktop")]
    Desktop,
    #[strum(serialize = "startup")]
    Startup,
}

/// A dotted numeric product version with 1-4 components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductVersion {
    parts: Vec<u32>,
}

impl ProductVersion {
    /// The documented fallback used when a config version fails to parse.
    pub fn fallback() -> Self {
        Self { parts: vec![1, 0] }
    }

    pub fn parts(&self) -> &[u32] {
        &self.parts
    }
}

impl fmt::Display for ProductVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .parts
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&rendered)
    }
}

impl FromStr for ProductVersion {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CompileError::InvalidVersion {
            value: s.to_string(),
        };

        let components: Vec<&str> = s.split('.').collect();
        if components.is_empty() || components.len() > 4 {
            return Err(invalid());
        }

        let parts = components
            .iter()
            .map(|c| c.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<u32>, _>>()?;

        Ok(Self { parts })
    }
}

impl Serialize for ProductVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Resolve the target platform. Absent defaults to x64.
pub fn resolve_platform(raw: Option<&str>) -> Result<Platform, CompileError> {
    match raw {
        None => Ok(Platform::default()),
        Some(s) => s.parse().map_err(|_| CompileError::InvalidOption {
            field: "general.platform",
            value: s.to_string(),
        }),
    }
}

/// Resolve the install scope. Absent defaults to per-machine.
pub fn resolve_install_scope(raw: Option<&str>) -> Result<InstallScope, CompileError> {
    match raw {
        None => Ok(InstallScope::default()),
        Some(s) => s.parse().map_err(|_| CompileError::InvalidOption {
            field: "general.scope",
            value: s.to_string(),
        }),
    }
}

/// Resolve the installer UI level. Absent defaults to progress-only.
pub fn resolve_ui_level(raw: Option<&str>) -> Result<UiLevel, CompileError> {
    match raw {
        None => Ok(UiLevel::default()),
        Some(s) => s.parse().map_err(|_| CompileError::InvalidOption {
            field: "general.ui",
            value: s.to_string(),
        }),
    }
}

/// Resolve the environment variable part. Absent defaults to replacing the
/// whole value.
pub fn resolve_env_var_part(raw: Option<&str>) -> Result<EnvVarPart, CompileError> {
    match raw {
        None => Ok(EnvVarPart::default()),
        Some(s) => s.parse().map_err(|_| CompileError::InvalidOption {
            field: "installation.env.part",
            value: s.to_string(),
        }),
    }
}

/// Resolve the shortcut location. Absent defaults to the Programs menu.
pub fn resolve_shortcut_location(raw: Option<&str>) -> Result<ShortcutLocation, CompileError> {
    match raw {
        None => Ok(ShortcutLocation::default()),
        Some(s) => s.parse().map_err(|_| CompileError::InvalidOption {
            field: "installation.shortcuts.location",
            value: s.to_string(),
        }),
    }
}

/// Resolve the product version with the documented lenient fallback: an
/// absent or malformed version yields `1.0` instead of failing.
pub fn resolve_version(raw: Option<&str>) -> ProductVersion {
    match raw {
        None => ProductVersion::fallback(),
        Some(s) => s.parse().unwrap_or_else(|_| {
            warn!(version = s, "version does not parse, falling back to 1.0");
            ProductVersion::fallback()
        }),
    }
}

/// Parse the product GUID. Returns `None` on failure; the compiler turns
/// `None` into a fatal `InvalidGuid` error.
pub fn resolve_guid(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_platform_known_values() {
        assert_eq!(resolve_platform(Some("x86")).unwrap(), Platform::X86);
        assert_eq!(resolve_platform(Some("x64")).unwrap(), Platform::X64);
        assert_eq!(resolve_platform(Some("arm32")).unwrap(), Platform::Arm32);
        assert_eq!(resolve_platform(Some("arm64")).unwrap(), Platform::Arm64);
    }

    #[test]
    fn test_resolve_platform_absent_defaults_to_x64() {
        assert_eq!(resolve_platform(None).unwrap(), Platform::X64);
    }

    #[test]
    fn test_resolve_platform_unrecognized_fails() {
        let err = resolve_platform(Some("mips")).unwrap_err();
        assert!(matches!(
            err,
            CompileError::InvalidOption {
                field: "general.platform",
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_install_scope() {
        assert_eq!(resolve_install_scope(None).unwrap(), InstallScope::PerMachine);
        assert_eq!(
            resolve_install_scope(Some("machine")).unwrap(),
            InstallScope::PerMachine
        );
        assert_eq!(
            resolve_install_scope(Some("user")).unwrap(),
            InstallScope::PerUser
        );
        assert!(resolve_install_scope(Some("invalid")).is_err());
    }

    #[test]
    fn test_resolve_ui_level() {
        assert_eq!(resolve_ui_level(None).unwrap(), UiLevel::ProgressOnly);
        assert_eq!(resolve_ui_level(Some("none")).unwrap(), UiLevel::ProgressOnly);
        assert_eq!(resolve_ui_level(Some("basic")).unwrap(), UiLevel::Minimal);
        assert_eq!(resolve_ui_level(Some("full")).unwrap(), UiLevel::InstallDir);
        assert!(resolve_ui_level(Some("fancy")).is_err());
    }

    #[test]
    fn test_resolve_env_var_part() {
        assert_eq!(resolve_env_var_part(None).unwrap(), EnvVarPart::All);
        assert_eq!(resolve_env_var_part(Some("prefix")).unwrap(), EnvVarPart::Prefix);
        assert_eq!(resolve_env_var_part(Some("suffix")).unwrap(), EnvVarPart::Suffix);
        assert!(resolve_env_var_part(Some("middle")).is_err());
    }

    #[test]
    fn test_version_parses_one_to_four_components() {
        for (raw, expected) in [
            ("1", vec![1]),
            ("1.2", vec![1, 2]),
            ("1.2.3", vec![1, 2, 3]),
            ("1.2.3.4", vec![1, 2, 3, 4]),
        ] {
            let version: ProductVersion = raw.parse().unwrap();
            assert_eq!(version.parts(), expected.as_slice());
            assert_eq!(version.to_string(), raw);
        }
    }

    #[test]
    fn test_version_rejects_malformed() {
        assert!("".parse::<ProductVersion>().is_err());
        assert!("1.2.3.4.5".parse::<ProductVersion>().is_err());
        assert!("1.x".parse::<ProductVersion>().is_err());
        assert!("v1.0".parse::<ProductVersion>().is_err());
    }

    #[test]
    fn test_resolve_version_is_lenient() {
        assert_eq!(resolve_version(None), ProductVersion::fallback());
        assert_eq!(resolve_version(Some("not-a-version")), ProductVersion::fallback());
        assert_eq!(
            resolve_version(Some("2.5.1")).to_string(),
            "2.5.1".to_string()
        );
    }

    #[test]
    fn test_resolve_guid() {
        assert!(resolve_guid("f2c1a9f0-1c2d-4b3e-9a8b-7c6d5e4f3a2b").is_some());
        // The nil UUID is valid, matching the template default.
        assert!(resolve_guid("00000000-0000-0000-0000-000000000000").is_some());
        assert!(resolve_guid("not-a-guid").is_none());
    }
}
