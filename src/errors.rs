use thiserror::Error;

/// Why a single queue record could not be unwrapped into S3 uploads.
#[derive(Debug, Error)]
pub enum UnwrapError {
    #[error("missing field '{0}'")]
    MissingField(String),

    #[error("record body is not a valid SNS envelope: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("SNS message is not valid JSON: {0}")]
    InvalidMessage(#[source] serde_json::Error),

    #[error("S3 event record is malformed: {0}")]
    InvalidSubEvent(#[source] serde_json::Error),

    #[error("unexpected payload shape: {0}")]
    UnexpectedShape(String),
}

impl UnwrapError {
    pub(crate) fn missing(path: &str) -> Self {
        UnwrapError::MissingField(path.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LOG_FORMAT must be 'json' or 'text', got '{0}'")]
    InvalidLogFormat(String),
}
