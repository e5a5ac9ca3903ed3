//! Socket Error Types
//!
//! One variant per failing OS call. No failure is retried internally; every
//! error propagates to the immediate caller. The payload is the OS's
//! human-readable message, not the numeric code. Callers wanting the code
//! query [`crate::sys::last_error_code`] after catching the error.

use std::fmt;
use std::io;

/// Errors raised by socket lifecycle and I/O operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketError {
    /// Descriptor allocation failed, or a client address could not be built.
    Creation(String),
    /// `SO_REUSEADDR` could not be applied.
    SetOption(String),
    /// The socket could not be bound to its address.
    Bind(String),
    /// The bound socket could not start listening.
    Listen(String),
    /// Accepting a pending connection failed.
    Accept(String),
    /// The TCP handshake was rejected, timed out, or could not be routed.
    Connect(String),
    /// The operation was invoked on the wrong socket role.
    Role(String),
    /// The OS write call failed.
    Send(String),
    /// The OS read call failed.
    Recv(String),
    /// Closing the descriptor failed.
    Close(String),
}

impl fmt::Display for SocketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Creation(msg) => write!(f, "error creating socket: {msg}"),
            Self::SetOption(msg) => write!(f, "error setting socket options: {msg}"),
            Self::Bind(msg) => write!(f, "error binding socket to ip/port: {msg}"),
            Self::Listen(msg) => write!(f, "error listening on socket: {msg}"),
            Self::Accept(msg) => write!(f, "error accepting connection: {msg}"),
            Self::Connect(msg) => write!(f, "error connecting to server: {msg}"),
            Self::Role(msg) => write!(f, "wrong socket role: {msg}"),
            Self::Send(msg) => write!(f, "error sending data: {msg}"),
            Self::Recv(msg) => write!(f, "error receiving data: {msg}"),
            Self::Close(msg) => write!(f, "error closing socket: {msg}"),
        }
    }
}

impl std::error::Error for SocketError {}

impl SocketError {
    pub(crate) fn creation(err: io::Error) -> Self {
        Self::Creation(err.to_string())
    }

    pub(crate) fn set_option(err: io::Error) -> Self {
        Self::SetOption(err.to_string())
    }

    pub(crate) fn bind(err: io::Error) -> Self {
        Self::Bind(err.to_string())
    }

    pub(crate) fn listen(err: io::Error) -> Self {
        Self::Listen(err.to_string())
    }

    pub(crate) fn accept(err: io::Error) -> Self {
        Self::Accept(err.to_string())
    }

    pub(crate) fn connect(err: io::Error) -> Self {
        Self::Connect(err.to_string())
    }

    pub(crate) fn send(err: io::Error) -> Self {
        Self::Send(err.to_string())
    }

    pub(crate) fn recv(err: io::Error) -> Self {
        Self::Recv(err.to_string())
    }

    pub(crate) fn close(err: io::Error) -> Self {
        Self::Close(err.to_string())
    }
}
