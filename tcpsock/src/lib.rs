//! tcpsock: Minimal Blocking TCP Sockets
//!
//! A small convenience wrapper over the OS TCP socket lifecycle (create,
//! bind, listen, accept, connect, send, receive, close) built on the
//! `socket2` crate.
//!
//! ## Overview
//!
//! Two collaborating types:
//! - [`Socket`]: a listening server or an unconnected client, chosen by
//!   [`Role`] at construction. Server construction creates, binds, and
//!   listens in one unretried step; client construction only creates the
//!   descriptor and defers the handshake to [`Socket::connect`].
//! - [`Node`]: one connected peer, produced by [`Socket::accept`] (owning
//!   its descriptor, closed on drop) or [`Socket::connect_ref`] (borrowing
//!   the client's descriptor, never closed here).
//!
//! All I/O is synchronous and blocking with no timeouts, no retries, and no
//! framing: `send` issues a single OS write, `recv` returns whatever one OS
//! read produced (empty on orderly peer shutdown), and callers loop for
//! anything larger than one buffer.
//!
//! ## Example
//!
//! ```no_run
//! use tcpsock::Socket;
//!
//! # fn main() -> Result<(), tcpsock::SocketError> {
//! let server = Socket::server(49110)?;
//! let peer = server.accept()?;
//! peer.send(b"Hello")?;
//! # Ok(())
//! # }
//! ```
//!
//! Errors carry the OS's message; the numeric platform code is available
//! separately through [`last_error_code`] right after a failure.

pub mod error;
pub mod node;
pub mod socket;
pub mod sys;

pub use error::SocketError;
pub use node::Node;
pub use socket::{Role, Socket};
pub use sys::{last_error_code, SockDesc, INVALID_DESC};

/// The wildcard address servers bind to.
pub const ANY_ADDR: &str = "0.0.0.0";

/// The loopback address, the default client target.
pub const LOCALHOST: &str = "127.0.0.1";

/// Size of the default receive buffer; one `recv` returns at most this many
/// bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Default listen backlog for server sockets.
pub const DEFAULT_BACKLOG: i32 = 10;
