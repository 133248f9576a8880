#![forbid(unsafe_code)]

//! Editor session configuration.
//!
//! ```toml
//! # formloom.toml
//! id_prefix = "blk"
//! suppression = "container_drags"
//! journal_capacity = 256
//! starter_section = false
//! ```
//!
//! ```rust,ignore
//! let config = EditorConfig::from_toml_file("formloom.toml")?;
//! let config = EditorConfig::from_json_str(json)?;
//! ```
//!
//! `EditorConfig::default()` matches the behavior of a session built without
//! any configuration.

#[cfg(feature = "editor-config")]
use std::path::Path;

use serde::{Deserialize, Serialize};

use formloom_model::{DEFAULT_ID_PREFIX, DEFAULT_JOURNAL_CAPACITY};

pub use crate::drag::SuppressionPolicy;

/// Tunables for one [`EditorSession`](crate::session::EditorSession).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Prefix for generated block ids.
    pub id_prefix: String,
    /// Which palette drags disable field-edge drop zones.
    pub suppression: SuppressionPolicy,
    /// Edit journal rows kept; 0 disables the journal.
    pub journal_capacity: usize,
    /// Seed new sessions with a locked heading and paragraph section.
    pub starter_section: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            id_prefix: DEFAULT_ID_PREFIX.to_owned(),
            suppression: SuppressionPolicy::default(),
            journal_capacity: DEFAULT_JOURNAL_CAPACITY,
            starter_section: false,
        }
    }
}

impl EditorConfig {
    /// Load from a TOML string.
    #[cfg(feature = "editor-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, EditorConfigError> {
        toml::from_str::<Self>(s)
            .map_err(EditorConfigError::Toml)?
            .validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "editor-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, EditorConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(EditorConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "editor-config")]
    pub fn from_json_str(s: &str) -> Result<Self, EditorConfigError> {
        serde_json::from_str::<Self>(s)
            .map_err(EditorConfigError::Json)?
            .validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "editor-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EditorConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(EditorConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.id_prefix.is_empty() {
            errors.push("id_prefix must not be empty".into());
        }
        if self.id_prefix.chars().any(char::is_whitespace) {
            errors.push(format!(
                "id_prefix must not contain whitespace, got {:?}",
                self.id_prefix
            ));
        }
        errors
    }

    /// `self` if valid, otherwise [`EditorConfigError::Validation`].
    pub fn validated(self) -> Result<Self, EditorConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(EditorConfigError::Validation(errors))
        }
    }
}

/// Errors from loading an [`EditorConfig`].
#[derive(Debug)]
pub enum EditorConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "editor-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "editor-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for EditorConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "editor-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "editor-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for EditorConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "editor-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "editor-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
