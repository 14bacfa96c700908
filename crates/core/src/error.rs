use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("Duration must be between {min} and {max} minutes, got {got}")]
    InvalidDuration { got: u32, min: u32, max: u32 },

    #[error("Cloud AI API key is not configured.")]
    MissingApiKey,

    #[error("Local server URL is not provided.")]
    MissingEndpoint,

    #[error("Invalid local server URL {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Invalid config file {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    #[error(
        "Could not connect to local server at {url}. Please ensure it's running and accessible."
    )]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{backend} API error ({status}): {body}")]
    Backend {
        backend: &'static str,
        status: u16,
        body: String,
    },

    #[error("{backend} returned no script: {reason}")]
    EmptyResponse {
        backend: &'static str,
        reason: String,
    },

    #[error("{backend} response is not a valid JSON array: {reason}")]
    InvalidShape {
        backend: &'static str,
        reason: String,
    },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Coarse classification of a [`ScriptError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Configuration,
    Connectivity,
    Backend,
    Shape,
    Io,
}

impl ScriptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScriptError::EmptyField { .. } | ScriptError::InvalidDuration { .. } => {
                ErrorKind::Input
            }
            ScriptError::MissingApiKey
            | ScriptError::MissingEndpoint
            | ScriptError::InvalidEndpoint { .. }
            | ScriptError::InvalidConfig { .. } => ErrorKind::Configuration,
            ScriptError::Unreachable { .. } => ErrorKind::Connectivity,
            ScriptError::Backend { .. }
            | ScriptError::EmptyResponse { .. }
            | ScriptError::ApiError(_) => ErrorKind::Backend,
            ScriptError::InvalidShape { .. } => ErrorKind::Shape,
            ScriptError::IoError(_) | ScriptError::JsonError(_) => ErrorKind::Io,
        }
    }
}

/// The single failure surfaced by script generation.
#[derive(Error, Debug)]
#[error("Failed to generate script: {source}")]
pub struct GenerationError {
    #[from]
    source: ScriptError,
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    pub fn cause(&self) -> &ScriptError {
        &self.source
    }
}

pub type Result<T> = std::result::Result<T, ScriptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_error_prefixes_cause() {
        let err = GenerationError::from(ScriptError::MissingApiKey);
        assert_eq!(
            err.to_string(),
            "Failed to generate script: Cloud AI API key is not configured."
        );
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn backend_error_embeds_status_and_body() {
        let err = ScriptError::Backend {
            backend: "Local",
            status: 404,
            body: "model not found".to_string(),
        };
        assert_eq!(err.to_string(), "Local API error (404): model not found");
        assert_eq!(err.kind(), ErrorKind::Backend);
    }
}
