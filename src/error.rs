//! Error types for ros-multilink.
//!
//! The synthesis core is total and never returns these; they cover the
//! surrounding layers that read topology documents and write scripts.

use std::io;

use thiserror::Error;

/// Result type alias for ros-multilink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ros-multilink.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    #[error("topology error: {0}")]
    Topology(#[from] TopologyError),

    // Serialization errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Shape problems found while validating a topology document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("{group} entry #{index} has an empty name")]
    EmptyName { group: String, index: usize },

    #[error("duplicate uplink name '{name}' in {group}")]
    DuplicateName { group: String, name: String },

    #[error("uplink '{name}' has priority 0 (priorities start at 1)")]
    ZeroPriority { name: String },

    #[error("uplink '{name}' has an empty interface name")]
    EmptyInterface { name: String },

    #[error("uplink '{name}' has invalid static gateway '{gateway}'")]
    InvalidGateway { name: String, gateway: String },

    #[error("routing mark must not be empty")]
    EmptyRoutingMark,
}

impl Error {
    /// Check if the error was caused by the input document rather than the
    /// environment (unreadable file, broken pipe).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::Topology(_) | Error::TomlParse(_) | Error::Json(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        assert!(Error::from(TopologyError::EmptyRoutingMark).is_user_error());
        assert!(Error::from(toml::from_str::<toml::Table>("= 1").unwrap_err()).is_user_error());
        assert!(!Error::Config("unreadable".into()).is_user_error());
        assert!(!Error::from(io::Error::new(io::ErrorKind::BrokenPipe, "pipe")).is_user_error());
    }
}
