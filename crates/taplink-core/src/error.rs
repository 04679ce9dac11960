use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Session errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Session service has stopped")]
    ServiceStopped,

    // Input errors
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // NDEF errors
    #[error("Empty NDEF message")]
    EmptyMessage,

    #[error("Invalid NDEF record: {0}")]
    InvalidRecord(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
