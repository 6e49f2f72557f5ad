//! Error types for zero-mysql-cursor.

use thiserror::Error;

/// Result type for zero-mysql-cursor operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error reported by the server in an ERR packet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerError {
    /// MySQL error code (e.g. 1243 for ER_UNKNOWN_STMT_HANDLER)
    pub code: u16,
    /// SQLSTATE (5 characters), absent in pre-4.1 style ERR packets
    pub sql_state: Option<String>,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ERROR {}", self.code)?;
        if let Some(sql_state) = &self.sql_state {
            write!(f, " ({})", sql_state)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Error type for zero-mysql-cursor.
#[derive(Debug, Error)]
pub enum Error {
    /// Server error response
    #[error("MySQL error: {0}")]
    Server(ServerError),

    /// Protocol error (malformed packet, unexpected response, etc.)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be decoded from the wire
    #[error("Decode error: {0}")]
    Decode(String),

    /// The connection is released or invalidated and cannot be used
    #[error("bad connection")]
    BadConnection,

    /// The connection could not provide a write buffer; nothing reached the wire
    #[error("bad connection: no bytes written")]
    BadConnectionNoWrite,

    /// Invalid usage (e.g., zero fetch size)
    #[error("Invalid usage: {0}")]
    InvalidUsage(String),
}

impl Error {
    /// Returns true if the error indicates the connection is broken and cannot be reused.
    pub fn is_connection_broken(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::BadConnection | Error::BadConnectionNoWrite
        )
    }

    /// Get the SQLSTATE code if this is a server error.
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            Error::Server(err) => err.sql_state.as_deref(),
            _ => None,
        }
    }
}
