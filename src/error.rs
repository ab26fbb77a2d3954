use std::io;

use crate::types::ViewLevel;

/// All error types for warehouse navigation and spatial data loading.
#[derive(thiserror::Error, Debug)]
pub enum NavError {
    #[error("Malformed record {id}: {reason}")]
    MalformedRecord { id: String, reason: String },
    #[error("Illegal transition from {from} to {to}")]
    IllegalTransition { from: ViewLevel, to: ViewLevel },
    #[error("Already at root view")]
    AlreadyAtRoot,
    #[error("Invalid camera pose: {0}")]
    InvalidPose(String),
    #[error("Input error: {0}")]
    Input(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl NavError {
    /// Shorthand for a [`NavError::MalformedRecord`].
    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        NavError::MalformedRecord {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NavError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_strings() {
        let e = NavError::malformed("R01-A-1", "size.x must be positive");
        assert_eq!(e.to_string(), "Malformed record R01-A-1: size.x must be positive");

        let e = NavError::IllegalTransition {
            from: ViewLevel::Building,
            to: ViewLevel::Rack,
        };
        assert_eq!(e.to_string(), "Illegal transition from building to rack");

        let e = NavError::AlreadyAtRoot;
        assert_eq!(e.to_string(), "Already at root view");

        let e = NavError::InvalidPose("both set".into());
        assert_eq!(e.to_string(), "Invalid camera pose: both set");

        let e = NavError::Input("bad file".into());
        assert_eq!(e.to_string(), "Input error: bad file");

        let e = NavError::Config("no buildings".into());
        assert_eq!(e.to_string(), "Configuration error: no buildings");
    }

    #[test]
    fn from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file missing");
        let e: NavError = io_err.into();
        assert!(matches!(e, NavError::Io(_)));
        assert!(e.to_string().contains("file missing"));
    }

    #[test]
    fn from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: NavError = json_err.into();
        assert!(matches!(e, NavError::Json(_)));
    }
}
