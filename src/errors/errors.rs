use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Errors {
    /// The initial connection to the server could not be established.
    #[error("could not connect to {host}:{port}: {reason}")]
    ConnectionFailure {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("invalid value for `{key}`: {reason}")]
    InvalidConfig { key: String, reason: String },

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to read configuration: {0}")]
    ConfigIo(#[from] io::Error),

    #[error("MongoDB error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("connection registry has already been initialized")]
    AlreadyInitialized,
}

impl Errors {
    /// Whether the deployment cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Errors::ConnectionFailure { .. })
    }
}
