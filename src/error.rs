pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("offset {offset} out of range for sequence of length {length}")]
    OutOfRange { offset: u64, length: u64 },

    #[error("registry error: {0}")]
    Registry(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Short name of the error kind, used as a structured logging field.
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "NotFound",
            Error::InvalidInput(_) => "InvalidInput",
            Error::InvalidRange(_) => "InvalidRange",
            Error::OutOfRange { .. } => "OutOfRange",
            Error::Registry(_) => "RegistryError",
            Error::Io(_) | Error::Internal(_) => "InternalError",
        }
    }
}
