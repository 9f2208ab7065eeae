//! Error types for scenario operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving or rendering scenarios.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// No factory scenario with this name
    #[error("scenario not found: {0}")]
    ScenarioNotFound(String),

    /// Module id not in the registry
    #[error("unknown module: {0}")]
    UnknownModule(String),

    /// Validation errors
    #[error("validation failed: {0}")]
    Validation(#[from] crate::validation::ValidationError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_display_names_path() {
        let err = ConfigError::read_file("/a/b.toml", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/b.toml"), "got: {msg}");
        assert!(err.source().is_some(), "ReadFile must expose I/O source");
    }

    #[test]
    fn write_file_display_names_path() {
        let err = ConfigError::write_file("/out/render.toml", mock_io_err());
        assert!(
            matches!(err, ConfigError::WriteFile { ref path, .. } if path == std::path::Path::new("/out/render.toml"))
        );
        assert!(err.to_string().contains("failed to write file"));
    }

    #[test]
    fn create_dir_keeps_source() {
        let err = ConfigError::create_dir("/a/b", mock_io_err());
        assert!(err.to_string().contains("failed to create directory"));
        assert!(err.source().is_some());
    }

    #[test]
    fn scenario_not_found_display() {
        let err = ConfigError::ScenarioNotFound("swell".to_string());
        assert_eq!(err.to_string(), "scenario not found: swell");
        assert!(err.source().is_none());
    }

    #[test]
    fn unknown_module_display() {
        let err = ConfigError::UnknownModule("adsr9".to_string());
        assert_eq!(err.to_string(), "unknown module: adsr9");
    }

    #[test]
    fn validation_converts() {
        let err: ConfigError = ValidationError::InvalidBlockSize.into();
        assert!(err.to_string().starts_with("validation failed"), "got: {err}");
    }
}
