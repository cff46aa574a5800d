//! Error types for the Mascotte site backend.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Outbound mail errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail transport is not configured")]
    NotConfigured,

    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP send failed: {0}")]
    Send(String),
}

/// Object storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Failed to sign request: {0}")]
    Signing(String),

    #[error("Upload of {key} failed: {reason}")]
    UploadFailed { key: String, reason: String },
}

/// Contact request errors, surfaced to the submitting client.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Invalid request subject: {0}")]
    InvalidSubject(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Failed to deliver request: {0}")]
    Transport(#[from] MailError),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
