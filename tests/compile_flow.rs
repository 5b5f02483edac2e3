//! End-to-end compile flow tests: TOML text in, installer project model and
//! package manifest out.

use std::fs;
use tempfile::TempDir;

use msipack::compiler::{compile, verify_resources};
use msipack::config::{Config, Overrides};
use msipack::engine::{JsonManifestEngine, PackagingEngine};
use msipack::options::{InstallScope, Platform, ShortcutLocation, UiLevel};
use msipack::project::InstallEntry;
use msipack::CompileError;

const GUID: &str = "f2c1a9f0-1c2d-4b3e-9a8b-7c6d5e4f3a2b";

fn full_config(out_dir: &str) -> String {
    format!(
        r#"
[general]
name = "DemoApp"
guid = "{GUID}"
platform = "x86"
version = "2.4.0"
scope = "user"
ui = "full"
reboot = true
out-file = "{out_dir}/DemoApp.msi"

[metadata]
display-name = "Demo Application"
description = "Demonstrates the compiler"
manufacturer = "Acme"
help-url = "https://example.com/help"
forbid-modify = true

[installation]
files = ["bin/demo.exe", "bin/demo.dll"]
dirs = ["assets/*.*"]

[[installation.env]]
name = "DEMO_HOME"
value = "@"

[[installation.shortcuts]]
target = "demo.exe"
"#
    )
}

#[test]
fn test_full_config_end_to_end() {
    let out = TempDir::new().unwrap();
    let out_dir = out.path().to_str().unwrap().to_string();

    let config = Config::from_toml(&full_config(&out_dir)).unwrap();
    let project = compile(&config).unwrap();

    assert_eq!(project.name, "DemoApp");
    assert_eq!(project.platform, Platform::X86);
    assert_eq!(project.version.to_string(), "2.4.0");
    assert_eq!(project.scope, InstallScope::PerUser);
    assert_eq!(project.ui, UiLevel::InstallDir);
    assert_eq!(project.install_dir.path, "%LocalAppData%\\Acme\\DemoApp");
    assert_eq!(project.install_dir.entries.len(), 3);
    assert!(matches!(
        project.install_dir.entries[2],
        InstallEntry::Dir {
            recursive: true,
            ..
        }
    ));

    assert_eq!(project.shortcuts[0].target, "bin/demo.exe");
    assert_eq!(project.shortcuts[0].name, "DemoApp");
    assert_eq!(project.shortcuts[0].location, ShortcutLocation::ProgramMenu);
    assert_eq!(project.environment[0].value, "[INSTALLDIR]");
    assert!(project.control_panel.no_modify);
    assert!(project.reboot_required);

    // No filesystem resources referenced, so verification passes.
    verify_resources(&project).unwrap();

    let manifest_path = JsonManifestEngine::new().package(&project).unwrap();
    assert_eq!(manifest_path, out.path().join("DemoApp.msi.json"));

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
    assert_eq!(manifest["guid"], GUID);
    assert_eq!(manifest["out_file_name"], "DemoApp");
    assert_eq!(manifest["environment"][0]["part"], "all");
}

#[test]
fn test_cli_overrides_take_precedence() {
    let out = TempDir::new().unwrap();
    let out_dir = out.path().to_str().unwrap().to_string();

    let mut config = Config::from_toml(&full_config(&out_dir)).unwrap();
    config.apply_overrides(Overrides {
        version: Some("3.0".parse().unwrap()),
        platform: Some(Platform::Arm64),
        output_file: None,
        dirs: vec![],
        files: vec!["extras/tool.exe".to_string()],
        certificate_name: None,
        certificate_password: None,
    });

    let project = compile(&config).unwrap();
    assert_eq!(project.version.to_string(), "3.0");
    assert_eq!(project.platform, Platform::Arm64);
    // Appended file lands after config files, before directory specs for
    // shortcut matching purposes it is still a literal file entry.
    assert!(project
        .install_dir
        .entries
        .iter()
        .any(|e| matches!(e, InstallEntry::File { source } if source == "extras/tool.exe")));
}

#[test]
fn test_name_validation_runs_before_everything() {
    let toml = r#"
[general]
name = "Demo App"
guid = "not-even-a-guid"
platform = "mips"
"#;
    let config = Config::from_toml(toml).unwrap();
    let err = compile(&config).unwrap_err();
    assert!(matches!(
        err,
        CompileError::InvalidOption {
            field: "general.name",
            ..
        }
    ));
}

#[test]
fn test_missing_shortcut_target_fails_compile() {
    let toml = format!(
        r#"
[general]
name = "Demo"
guid = "{GUID}"

[[installation.shortcuts]]
target = "gone.exe"
"#
    );
    let config = Config::from_toml(&toml).unwrap();
    assert!(matches!(
        compile(&config).unwrap_err(),
        CompileError::ShortcutTargetNotFound { .. }
    ));
}

#[test]
fn test_referenced_resource_checked_against_filesystem() {
    let dir = TempDir::new().unwrap();
    let license = dir.path().join("license.rtf");
    fs::write(&license, "terms").unwrap();

    let toml = format!(
        r#"
[general]
name = "Demo"
guid = "{GUID}"

[metadata]
license = "{}"
"#,
        license.display()
    );
    let config = Config::from_toml(&toml).unwrap();
    let project = compile(&config).unwrap();
    verify_resources(&project).unwrap();

    fs::remove_file(&license).unwrap();
    assert!(matches!(
        verify_resources(&project).unwrap_err(),
        CompileError::ReferencedFileNotFound { .. }
    ));
}

#[test]
fn test_compiling_twice_yields_identical_models() {
    let out = TempDir::new().unwrap();
    let config =
        Config::from_toml(&full_config(out.path().to_str().unwrap())).unwrap();

    assert_eq!(compile(&config).unwrap(), compile(&config).unwrap());
}
