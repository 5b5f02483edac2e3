//! Error handling for the installer project compiler.
//!
//! Every validation failure during compilation maps to one of these typed
//! variants so the CLI layer can render a message naming the offending field
//! and value, and pick the right process exit code.

use thiserror::Error;

/// Typed compilation errors. All variants are terminal for the current
/// compile; validation failures are deterministic, so no retries apply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A required field (name, GUID) is absent or empty.
    #[error("required field '{field}' is missing or empty")]
    MissingRequiredField { field: &'static str },

    /// A constrained field holds a value outside its fixed vocabulary.
    #[error("invalid value '{value}' for field '{field}'")]
    InvalidOption { field: &'static str, value: String },

    /// The product GUID does not parse as a UUID.
    #[error("'{value}' is not a valid GUID")]
    InvalidGuid { value: String },

    /// A version string is not 1-4 dotted numeric components.
    #[error("'{value}' is not a valid version (expected 1-4 dotted numeric components)")]
    InvalidVersion { value: String },

    /// A referenced license/image/certificate path does not exist.
    #[error("referenced file for '{field}' not found: {path}")]
    ReferencedFileNotFound { field: &'static str, path: String },

    /// No file entry in the install set matches a configured shortcut target.
    #[error("no install file matches shortcut target '{target}'")]
    ShortcutTargetNotFound { target: String },

    /// The resolved output path has an empty file-name component.
    #[error("output path '{path}' must contain a file name")]
    InvalidOutputPath { path: String },
}

/// Result type alias for compiler operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Process exit codes, shared by all subcommands.
pub mod exit_codes {
    /// Everything went smoothly.
    pub const SUCCESS: u8 = 0;
    /// Wrong arguments were provided or required arguments are missing.
    pub const INVALID_ARGUMENTS: u8 = 1;
    /// Invalid configuration file or configuration data.
    pub const INVALID_CONFIG: u8 = 2;
    /// A file was not found.
    pub const FILE_NOT_FOUND: u8 = 3;
    /// Unknown error occurred.
    pub const UNKNOWN_ERROR: u8 = 255;
}

impl CompileError {
    /// Exit code the CLI should terminate with for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ReferencedFileNotFound { .. } => exit_codes::FILE_NOT_FOUND,
            _ => exit_codes::INVALID_CONFIG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CompileError::MissingRequiredField {
            field: "general.name",
        };
        assert_eq!(
            err.to_string(),
            "required field 'general.name' is missing or empty"
        );

        let err = CompileError::InvalidOption {
            field: "general.platform",
            value: "mips".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value 'mips' for field 'general.platform'"
        );
    }

    #[test]
    fn test_exit_code_mapping() {
        let err = CompileError::ReferencedFileNotFound {
            field: "metadata.license",
            path: "missing.rtf".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::FILE_NOT_FOUND);

        let err = CompileError::InvalidGuid {
            value: "nope".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::INVALID_CONFIG);
    }
}
