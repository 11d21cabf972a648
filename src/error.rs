//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `shotpath` library. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! ## Error Taxonomy
//!
//! Errors fall into three groups with different lifetimes:
//!
//! - **Definition errors** (`ConfigParse`, `Definition`, `KeyDefinition`):
//!   the studio configuration is malformed. These are raised while the
//!   configuration is loaded and never deferred to use time.
//!
//! - **Value errors** (`Value`, `MissingKeys`, `RootUnavailable`): a field
//!   mapping handed to a template is incomplete or carries a value the key
//!   rejects. Local to the call that supplied the fields.
//!
//! - **Environment errors** (`Io`, `Yaml`, `Glob`, `Regex`): wrapped
//!   failures from the filesystem and supporting crates. Not retried
//!   internally.
//!
//! A path that simply does not conform to any template is *not* an error:
//! those operations return `None` or an empty collection instead.

use thiserror::Error;

/// Main error type for shotpath operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing the studio configuration file.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A template definition string is malformed (unknown key reference,
    /// duplicate key, adjacent placeholders with no separator).
    #[error("Template definition error in '{template}': {message}")]
    Definition { template: String, message: String },

    /// A key definition in the configuration is malformed (bad format
    /// spec, default value of the wrong type, unknown key type).
    #[error("Key definition error for '{key}': {message}")]
    KeyDefinition { key: String, message: String },

    /// A field value was rejected by the key it is destined for.
    #[error("Invalid value for key '{key}': {message}")]
    Value { key: String, message: String },

    /// Required keys were absent from a field mapping, with no defaults to
    /// fall back on.
    #[error("Template '{template}' is missing required keys: {}", keys.join(", "))]
    MissingKeys { template: String, keys: Vec<String> },

    /// A storage root has no path configured for the platform the process
    /// is running on.
    #[error("Storage root '{root}' has no path configured for platform '{platform}'")]
    RootUnavailable { root: String, platform: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config_parse() {
        let error = Error::ConfigParse {
            message: "Invalid YAML".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration parsing error"));
        assert!(display.contains("Invalid YAML"));
    }

    #[test]
    fn test_error_display_config_parse_with_hint() {
        let error = Error::ConfigParse {
            message: "Missing roots section".to_string(),
            hint: Some("Add a 'roots:' mapping with a 'primary' entry".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration parsing error"));
        assert!(display.contains("Missing roots section"));
        assert!(display.contains("hint:"));
        assert!(display.contains("Add a 'roots:'"));
    }

    #[test]
    fn test_error_display_definition() {
        let error = Error::Definition {
            template: "maya_shot_work".to_string(),
            message: "unknown key 'Shoot' referenced in definition".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("maya_shot_work"));
        assert!(display.contains("unknown key 'Shoot'"));
    }

    #[test]
    fn test_error_display_value() {
        let error = Error::Value {
            key: "version".to_string(),
            message: "expected an integer, got 'abc'".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Invalid value for key 'version'"));
        assert!(display.contains("'abc'"));
    }

    #[test]
    fn test_error_display_missing_keys_lists_all() {
        let error = Error::MissingKeys {
            template: "maya_shot_work".to_string(),
            keys: vec!["Shot".to_string(), "version".to_string()],
        };
        let display = format!("{}", error);
        assert!(display.contains("maya_shot_work"));
        assert!(display.contains("Shot, version"));
    }

    #[test]
    fn test_error_display_root_unavailable() {
        let error = Error::RootUnavailable {
            root: "renders".to_string(),
            platform: "windows".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("renders"));
        assert!(display.contains("windows"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_str = "invalid: [unclosed";
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let error: Error = yaml_error.into();
        let display = format!("{}", error);
        assert!(display.contains("YAML parsing error"));
    }
}
