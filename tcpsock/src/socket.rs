//! Socket Module
//!
//! [`Socket`] is the process-level handle: constructed in server role it
//! creates, binds, and listens in one step; constructed in client role it
//! only creates the descriptor and defers the handshake to [`Socket::connect`]
//! or [`Socket::connect_ref`]. All I/O is synchronous and blocking; `accept`,
//! `connect`, and `recv` park the calling thread until the OS completes or
//! rejects the operation.

use std::io::{Read, Write};
use std::net::{Ipv4Addr, SocketAddr};

use socket2::{Domain, Protocol, SockAddr, Type};

use crate::error::SocketError;
use crate::node::Node;
use crate::sys::{self, SockDesc, INVALID_DESC};
use crate::{ANY_ADDR, DEFAULT_BACKLOG, DEFAULT_BUFFER_SIZE, LOCALHOST};

/// Whether a [`Socket`] listens for peers or connects to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Bound and listening; produces [`Node`]s via [`Socket::accept`].
    Server,
    /// Created but unconnected until [`Socket::connect`] succeeds.
    Client,
}

/// A TCP/IPv4 socket acting as either a listening server or a client.
///
/// Server construction performs create + `SO_REUSEADDR` + bind + listen with
/// no retries; any failing step aborts construction, so a partially
/// initialized server handle is never returned. The descriptor is closed on
/// drop unless [`Socket::close`] already released it.
#[derive(Debug)]
pub struct Socket {
    desc: SockDesc,
    ip: String,
    port: u16,
    addr: SocketAddr,
    role: Role,
    reuse_addr: bool,
    backlog: i32,
}

impl Socket {
    /// Create a socket with explicit settings.
    ///
    /// Server role binds the wildcard address and listens with `backlog`;
    /// the `ip` argument only matters for clients, where it names the peer
    /// to connect to. Binding port 0 asks the OS for an ephemeral port,
    /// which [`Socket::port`] then reports.
    ///
    /// # Errors
    ///
    /// * [`SocketError::Creation`] - descriptor allocation or client address
    ///   parse failed
    /// * [`SocketError::SetOption`] - `SO_REUSEADDR` could not be applied
    /// * [`SocketError::Bind`] - the address could not be bound
    /// * [`SocketError::Listen`] - the bound socket could not listen
    pub fn new(
        port: u16,
        ip: &str,
        role: Role,
        reuse_addr: bool,
        backlog: i32,
    ) -> Result<Self, SocketError> {
        let sock = socket2::Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
            .map_err(SocketError::creation)?;

        let addr: SocketAddr = match role {
            Role::Server => (Ipv4Addr::UNSPECIFIED, port).into(),
            Role::Client => {
                let peer: Ipv4Addr = ip
                    .parse()
                    .map_err(|_| SocketError::Creation(format!("invalid ipv4 address: {ip}")))?;
                (peer, port).into()
            }
        };

        let mut this = Self {
            desc: INVALID_DESC,
            ip: ip.to_string(),
            port,
            addr,
            role,
            reuse_addr,
            backlog,
        };

        if role == Role::Server {
            if reuse_addr {
                sock.set_reuse_address(true)
                    .map_err(SocketError::set_option)?;
            }
            sock.bind(&SockAddr::from(addr)).map_err(SocketError::bind)?;
            // Binding port 0 assigns an ephemeral port; pick it up so
            // accept() reports something usable.
            if let Ok(local) = sock.local_addr() {
                if let Some(local) = local.as_socket() {
                    this.port = local.port();
                    this.addr = local;
                }
            }
            sock.listen(backlog).map_err(SocketError::listen)?;
        }

        this.desc = sys::into_desc(sock);
        Ok(this)
    }

    /// Create a listening server on the wildcard address with defaults
    /// (`reuse_addr = true`, backlog 10).
    pub fn server(port: u16) -> Result<Self, SocketError> {
        Self::new(port, ANY_ADDR, Role::Server, true, DEFAULT_BACKLOG)
    }

    /// Create an unconnected client targeting loopback with defaults.
    pub fn client(port: u16) -> Result<Self, SocketError> {
        Self::new(port, LOCALHOST, Role::Client, true, DEFAULT_BACKLOG)
    }

    /// Block until a peer connects, returning an owning [`Node`] for it.
    ///
    /// The node carries the peer's numeric address and reports this
    /// listener's port.
    ///
    /// # Errors
    ///
    /// * [`SocketError::Role`] - called on a client socket
    /// * [`SocketError::Accept`] - the OS rejected the accept
    pub fn accept(&self) -> Result<Node, SocketError> {
        if self.role == Role::Client {
            return Err(SocketError::Role(
                "can't accept connections on a client socket".to_string(),
            ));
        }
        if self.desc == INVALID_DESC {
            return Err(SocketError::accept(sys::bad_descriptor()));
        }

        let sock = sys::borrow_desc(self.desc);
        let (accepted, peer) = sock.accept().map_err(SocketError::accept)?;
        let peer = peer
            .as_socket()
            .ok_or_else(|| SocketError::Accept("peer address is not an inet address".to_string()))?;

        Ok(Node::accepted(sys::into_desc(accepted), peer, self.port))
    }

    /// Block until the TCP handshake with the configured peer completes.
    ///
    /// # Errors
    ///
    /// * [`SocketError::Role`] - called on a server socket
    /// * [`SocketError::Connect`] - the handshake was rejected, timed out,
    ///   or could not be routed
    pub fn connect(&self) -> Result<(), SocketError> {
        if self.role == Role::Server {
            return Err(SocketError::Role(
                "can't connect on a server socket".to_string(),
            ));
        }
        if self.desc == INVALID_DESC {
            return Err(SocketError::connect(sys::bad_descriptor()));
        }

        let sock = sys::borrow_desc(self.desc);
        sock.connect(&SockAddr::from(self.addr))
            .map_err(SocketError::connect)
    }

    /// Like [`Socket::connect`], but also return a [`Node`] for the
    /// connection.
    ///
    /// The node borrows this socket's descriptor rather than owning it, so
    /// dropping the node leaves the descriptor open and this socket remains
    /// the single owner responsible for [`Socket::close`].
    pub fn connect_ref(&self) -> Result<Node, SocketError> {
        self.connect()?;
        Ok(Node::borrowed(self.desc, self.ip.clone(), self.port))
    }

    /// Send `data` on this socket's descriptor with a single OS write call.
    ///
    /// Returns the number of bytes the OS accepted; short writes are not
    /// detected or resent.
    pub fn send(&self, data: &[u8]) -> Result<usize, SocketError> {
        self.send_on(self.desc, data)
    }

    /// Send `data` on an arbitrary descriptor, e.g. one obtained from an
    /// accepted [`Node`].
    pub fn send_on(&self, desc: SockDesc, data: &[u8]) -> Result<usize, SocketError> {
        if desc == INVALID_DESC {
            return Err(SocketError::send(sys::bad_descriptor()));
        }
        let mut sock = sys::borrow_desc(desc);
        sock.write(data).map_err(SocketError::send)
    }

    /// Receive up to [`DEFAULT_BUFFER_SIZE`] bytes from this socket's
    /// descriptor.
    ///
    /// Blocks until at least one byte arrives or the peer closes; an empty
    /// result signals orderly peer shutdown. Payloads larger than the buffer
    /// arrive across multiple calls and the caller must loop.
    pub fn recv(&self) -> Result<Vec<u8>, SocketError> {
        self.recv_on(self.desc)
    }

    /// Receive from an arbitrary descriptor.
    pub fn recv_on(&self, desc: SockDesc) -> Result<Vec<u8>, SocketError> {
        if desc == INVALID_DESC {
            return Err(SocketError::recv(sys::bad_descriptor()));
        }
        let mut buf = vec![0u8; DEFAULT_BUFFER_SIZE];
        let mut sock = sys::borrow_desc(desc);
        let received = sock.read(&mut buf).map_err(SocketError::recv)?;
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

    /// Close the descriptor.
    ///
    /// After a successful close the handle holds the invalid-descriptor
    /// sentinel: closing again is a no-op, drop will not close twice, and
    /// further `send`/`recv` calls fail with [`SocketError::Send`] /
    /// [`SocketError::Recv`].
    ///
    /// # Errors
    ///
    /// * [`SocketError::Close`] - the OS rejected the close. On windows the
    ///   `closesocket` result is not observable through `socket2`'s owning
    ///   drop, so close always reports success there.
    pub fn close(&mut self) -> Result<(), SocketError> {
        if self.desc == INVALID_DESC {
            return Ok(());
        }
        let desc = std::mem::replace(&mut self.desc, INVALID_DESC);
        sys::close_desc(desc).map_err(SocketError::close)
    }

    /// The raw OS descriptor.
    pub fn descriptor(&self) -> SockDesc {
        self.desc
    }

    /// This socket's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The ip string this socket was constructed with.
    pub fn ip(&self) -> &str {
        &self.ip
    }

    /// The port: for servers the bound port (OS-assigned when constructed
    /// with port 0), for clients the target port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The address structure: the bound address for servers, the peer
    /// address for clients.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Whether `SO_REUSEADDR` was requested at construction.
    pub fn reuse_addr(&self) -> bool {
        self.reuse_addr
    }

    /// The listen backlog requested at construction.
    pub fn backlog(&self) -> i32 {
        self.backlog
    }
}

impl Drop for Socket {
    fn drop(&mut self) {
        if self.desc == INVALID_DESC {
            return;
        }
        let _ = sys::close_desc(self.desc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_construction_binds_and_listens() {
        let server = Socket::server(0).unwrap();
        assert_eq!(server.role(), Role::Server);
        assert_ne!(server.descriptor(), INVALID_DESC);
        // Port 0 was replaced by the OS-assigned ephemeral port.
        assert!(server.port() > 0);
        assert_eq!(server.addr().port(), server.port());
    }

    #[test]
    fn test_client_construction_defers_connect() {
        let client = Socket::client(49110).unwrap();
        assert_eq!(client.role(), Role::Client);
        assert_eq!(client.ip(), LOCALHOST);
        assert_eq!(client.port(), 49110);
        assert!(client.reuse_addr());
        assert_eq!(client.backlog(), DEFAULT_BACKLOG);
    }

    #[test]
    fn test_client_rejects_bad_address() {
        let result = Socket::new(49110, "not-an-ip", Role::Client, true, 10);
        assert!(matches!(result, Err(SocketError::Creation(_))));
    }

    #[test]
    fn test_accept_on_client_is_role_error() {
        let client = Socket::client(49110).unwrap();
        assert!(matches!(client.accept(), Err(SocketError::Role(_))));
    }

    #[test]
    fn test_connect_on_server_is_role_error() {
        let server = Socket::server(0).unwrap();
        assert!(matches!(server.connect(), Err(SocketError::Role(_))));
        assert!(matches!(server.connect_ref(), Err(SocketError::Role(_))));
    }

    #[test]
    fn test_rebinding_live_port_fails() {
        let first = Socket::server(0).unwrap();
        // SO_REUSEADDR does not allow two live listeners on one port.
        let second = Socket::new(first.port(), ANY_ADDR, Role::Server, false, 10);
        assert!(matches!(second, Err(SocketError::Bind(_))));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut server = Socket::server(0).unwrap();
        server.close().unwrap();
        assert_eq!(server.descriptor(), INVALID_DESC);
        server.close().unwrap();
    }

    #[test]
    fn test_io_after_close_fails() {
        let mut server = Socket::server(0).unwrap();
        server.close().unwrap();
        assert!(matches!(server.send(b"x"), Err(SocketError::Send(_))));
        assert!(matches!(server.recv(), Err(SocketError::Recv(_))));
        let mut buf = [0u8; 8];
        assert!(matches!(
            server.recv_into(&mut buf),
            Err(SocketError::Recv(_))
        ));
        assert!(matches!(server.accept(), Err(SocketError::Accept(_))));
    }

    #[test]
    fn test_connect_after_close_fails() {
        let mut client = Socket::client(49110).unwrap();
        client.close().unwrap();
        assert!(matches!(client.connect(), Err(SocketError::Connect(_))));
    }
}
