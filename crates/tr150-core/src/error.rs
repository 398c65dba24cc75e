use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Decoding errors
    #[error("{name} missing or wrong type")]
    InvalidArgument { name: String },

    #[error("{0}")]
    UnknownCommand(String),
}

impl Error {
    pub fn invalid_argument(name: impl Into<String>) -> Self {
        Self::InvalidArgument { name: name.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
