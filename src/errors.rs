use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Malformed parameter: {0}")]
    MalformedParameter(String),

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl ServiceError {
    /// Map this error to an HTTP status code.
    ///
    /// Client-caused input problems are 400; everything on the store or
    /// process side is 500.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidIdentifier(_) | Self::MalformedParameter(_) | Self::FieldNotFound(_) => 400,
            Self::StoreUnavailable(_) | Self::Config(_) | Self::Io(_) => 500,
        }
    }

    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ServiceError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
