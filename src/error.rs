//! Error types for hrms

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Timed out connecting to database after {0}s")]
    ConnectTimeout(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Error::InvalidId(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}
