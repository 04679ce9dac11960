//! Error types for platform reader operations.
//!
//! Every failure a platform NFC stack can report maps onto one of these
//! variants. The session layer converts them into event-contract error
//! codes at the boundary; nothing here crosses the command surface.

/// Result type alias for reader operations.
pub type Result<T> = std::result::Result<T, ReaderError>;

/// Errors reported by a platform reader or a tag operation.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// No foreground execution context is available to host a session.
    #[error("No foreground context available: {message}")]
    NoForeground { message: String },

    /// Session establishment failed at the platform layer.
    #[error("Session setup failed: {message}")]
    Setup { message: String },

    /// Connecting to a tag failed.
    #[error("Tag connection failed: {message}")]
    Connect { message: String },

    /// Reading an NDEF message from a tag failed.
    #[error("Tag read failed: {message}")]
    Read { message: String },

    /// Writing an NDEF message to a tag failed.
    #[error("Tag write failed: {message}")]
    Write { message: String },

    /// Formatting an unformatted tag failed.
    #[error("Tag format failed: {message}")]
    Format { message: String },

    /// The tag left the field mid-operation.
    #[error("Tag lost: {message}")]
    TagLost { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReaderError {
    /// Create a new no-foreground error.
    pub fn no_foreground(message: impl Into<String>) -> Self {
        Self::NoForeground {
            message: message.into(),
        }
    }

    /// Create a new session setup error.
    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup {
            message: message.into(),
        }
    }

    /// Create a new tag connection error.
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    /// Create a new tag read error.
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }

    /// Create a new tag write error.
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }

    /// Create a new tag format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create a new tag-lost error.
    pub fn tag_lost(message: impl Into<String>) -> Self {
        Self::TagLost {
            message: message.into(),
        }
    }
}
