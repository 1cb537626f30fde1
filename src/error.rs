//! Error types
//!
//! Only configuration loading can fail. The simulation itself degrades instead of
//! erroring: a bad tunable skips the computation that needs it and logs a warning.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tunable `{field}` = {value}: {reason}")]
    Invalid {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, value: f32, reason: &'static str) -> Self {
        Self::Invalid {
            field,
            value,
            reason,
        }
    }
}
