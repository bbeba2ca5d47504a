//! Configuration system

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Loadable, savable configuration.
///
/// The on-disk format is chosen by file extension; TOML and RON are
/// supported.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a file.
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        match extension(path) {
            Some("toml") => {
                toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.to_string())),
        }
    }

    /// Save configuration to a file.
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = match extension(path) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_string())),
        };
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

fn extension(path: &str) -> Option<&str> {
    std::path::Path::new(path)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// Unsupported file format.
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Session behavior settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session name, used for log context.
    pub name: String,

    /// Scenes every newly created scene references automatically, by name.
    ///
    /// Shared definition libraries are registered in the session once and
    /// listed here so working scenes can resolve their content without
    /// wiring references by hand. Names not present in the session at
    /// creation time are skipped with a warning.
    pub implicit_references: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            implicit_references: Vec::new(),
        }
    }
}

impl Config for SessionConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(file: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("scene_runtime_{}_{file}", std::process::id()));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn toml_round_trip() {
        let config = SessionConfig {
            name: "lookdev".to_string(),
            implicit_references: vec!["stdlib".to_string()],
        };
        let path = temp_path("session.toml");
        config.save_to_file(&path).unwrap();
        let loaded = SessionConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn ron_round_trip() {
        let config = SessionConfig::default();
        let path = temp_path("session.ron");
        config.save_to_file(&path).unwrap();
        let loaded = SessionConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = SessionConfig::default()
            .save_to_file("session.yaml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
