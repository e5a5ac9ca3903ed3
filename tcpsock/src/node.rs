//! Node Module
//!
//! A [`Node`] is one connected peer: the descriptor accepted from a listener
//! or the descriptor a client connected through, together with the address
//! bookkeeping that came with it. Nodes are either *owning* (the descriptor
//! is closed when the node is dropped) or *borrowed* (the descriptor belongs
//! to someone else and is never closed here).

use std::io::{Read, Write};
use std::net::SocketAddr;

use crate::error::SocketError;
use crate::sys::{self, SockDesc, INVALID_DESC};
use crate::DEFAULT_BUFFER_SIZE;

/// One connected peer.
///
/// Produced by [`crate::Socket::accept`] (owning) and
/// [`crate::Socket::connect_ref`] (borrowed), or built directly from a raw
/// descriptor.
#[derive(Debug)]
pub struct Node {
    desc: SockDesc,
    ip: String,
    port: u16,
    peer: Option<SocketAddr>,
    close_on_drop: bool,
}

impl Node {
    /// Create an owning node from a raw descriptor.
    ///
    /// The descriptor is closed when the node is dropped.
    pub fn new(desc: SockDesc, ip: impl Into<String>, port: u16) -> Self {
        Self {
            desc,
            ip: ip.into(),
            port,
            peer: None,
            close_on_drop: true,
        }
    }

    /// Create a non-owning node from a raw descriptor.
    ///
    /// Dropping the node leaves the descriptor open; whoever handed it out
    /// stays responsible for closing it.
    pub fn borrowed(desc: SockDesc, ip: impl Into<String>, port: u16) -> Self {
        Self {
            desc,
            ip: ip.into(),
            port,
            peer: None,
            close_on_drop: false,
        }
    }

    pub(crate) fn accepted(desc: SockDesc, peer: SocketAddr, port: u16) -> Self {
        Self {
            desc,
            ip: peer.ip().to_string(),
            port,
            peer: Some(peer),
            close_on_drop: true,
        }
    }

    /// Send `data` with a single OS write call.
    ///
    /// Returns the number of bytes the OS actually accepted. Short writes are
    /// not detected or resent; the caller must loop if it needs more.
    pub fn send(&self, data: &[u8]) -> Result<usize, SocketError> {
        if self.desc == INVALID_DESC {
            return Err(SocketError::send(sys::bad_descriptor()));
        }
        let mut sock = sys::borrow_desc(self.desc);
        sock.write(data).map_err(SocketError::send)
    }

    /// Receive up to [`DEFAULT_BUFFER_SIZE`] bytes.
    ///
    /// Blocks until at least one byte arrives or the peer closes. An empty
    /// result means the peer shut down in an orderly way.
    pub fn recv(&self) -> Result<Vec<u8>, SocketError> {
        let mut buf = vec![0u8; DEFAULT_BUFFER_SIZE];
        let received = self.recv_into(&mut buf)?;
        buf.truncate(received);
        Ok(buf)
    }

    /// Receive into a caller-supplied buffer, returning the byte count.
    ///
    /// A count of zero means the peer closed the connection.
    pub fn recv_into(&self, buf: &mut [u8]) -> Result<usize, SocketError> {
        if self.desc == INVALID_DESC {
            return Err(SocketError::recv(sys::bad_descriptor()));
        }
        let mut sock = sys::borrow_desc(self.desc);
        sock.read(buf).map_err(SocketError::recv)
    }

    /// The raw OS descriptor.
    pub fn descriptor(&self) -> SockDesc {
        self.desc
    }

    /// The ip string this node was constructed with.
    pub fn ip(&self) -> &str {
        &self.ip
    }

    /// The peer's numeric address string, derived from the live address when
    /// one is known, otherwise the stored ip.
    pub fn peer_ip(&self) -> String {
        match self.peer {
            Some(addr) => addr.ip().to_string(),
            None => self.ip.clone(),
        }
    }

    /// The port this node reports (for accepted nodes, the listener's port).
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The live peer address, when the node was produced by `accept`.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        if !self.close_on_drop || self.desc == INVALID_DESC {
            return;
        }
        let _ = sys::close_desc(self.desc);
    }
}
