//! Platform Capability Layer
//!
//! Isolates every platform-dependent detail of descriptor handling behind one
//! internal surface: the descriptor type alias, the invalid-descriptor
//! sentinel, raw conversions to and from `socket2::Socket`, error-checked
//! close, and the last-error diagnostic. The unix and windows variants are
//! selected at build time with `cfg`; nothing above this module branches on
//! the platform.

use std::io;
use std::mem::ManuallyDrop;

use socket2::Socket;

#[cfg(unix)]
use std::os::unix::io::{FromRawFd, IntoRawFd, RawFd};
#[cfg(windows)]
use std::os::windows::io::{FromRawSocket, IntoRawSocket, RawSocket};

/// OS-level socket descriptor: an `int` on unix, a `SOCKET` handle on windows.
#[cfg(unix)]
pub type SockDesc = RawFd;
#[cfg(windows)]
pub type SockDesc = RawSocket;

/// Sentinel for "no descriptor" (`-1` on unix, `INVALID_SOCKET` on windows).
#[cfg(unix)]
pub const INVALID_DESC: SockDesc = -1;
#[cfg(windows)]
pub const INVALID_DESC: SockDesc = RawSocket::MAX;

/// Release ownership of `sock`, returning its raw descriptor.
pub(crate) fn into_desc(sock: Socket) -> SockDesc {
    #[cfg(unix)]
    {
        sock.into_raw_fd()
    }
    #[cfg(windows)]
    {
        sock.into_raw_socket()
    }
}

/// The OS error an I/O call on an invalid descriptor reports: `EBADF` on
/// unix, `WSAENOTSOCK` on windows.
#[cfg(unix)]
pub(crate) fn bad_descriptor() -> io::Error {
    io::Error::from_raw_os_error(nix::errno::Errno::EBADF as i32)
}
#[cfg(windows)]
pub(crate) fn bad_descriptor() -> io::Error {
    // WSAENOTSOCK
    io::Error::from_raw_os_error(10038)
}

/// Borrow `desc` as a [`Socket`] without taking ownership.
///
/// The returned handle is wrapped in [`ManuallyDrop`] so dropping it does not
/// close the descriptor. The caller must ensure `desc` is open and stays open
/// for the duration of the borrow; `socket2` rejects [`INVALID_DESC`], so
/// callers guard against it first and report [`bad_descriptor`] instead.
pub(crate) fn borrow_desc(desc: SockDesc) -> ManuallyDrop<Socket> {
    #[cfg(unix)]
    let sock = unsafe { Socket::from_raw_fd(desc) };
    #[cfg(windows)]
    let sock = unsafe { Socket::from_raw_socket(desc) };
    ManuallyDrop::new(sock)
}

/// Close `desc`, reporting the OS result.
///
/// The descriptor must not be used again after this call, whether or not it
/// succeeds.
#[cfg(unix)]
pub(crate) fn close_desc(desc: SockDesc) -> io::Result<()> {
    nix::unistd::close(desc).map_err(|e| io::Error::from_raw_os_error(e as i32))
}

/// Close `desc`, reporting the OS result.
///
/// Winsock's `closesocket` is reached through `socket2`'s owning drop; a
/// failure there is not observable, so this variant always reports success.
#[cfg(windows)]
pub(crate) fn close_desc(desc: SockDesc) -> io::Result<()> {
    drop(unsafe { Socket::from_raw_socket(desc) });
    Ok(())
}

/// The platform's last socket error code as a string.
///
/// `errno` on unix, the `WSAGetLastError` code on windows. Informational
/// only; the library never consults it itself.
pub fn last_error_code() -> String {
    match io::Error::last_os_error().raw_os_error() {
        Some(code) => code.to_string(),
        None => String::from("0"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use socket2::{Domain, Protocol, Type};

    #[test]
    fn test_borrow_does_not_close() {
        let sock = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP)).unwrap();
        let desc = into_desc(sock);

        {
            let borrowed = borrow_desc(desc);
            assert!(borrowed.local_addr().is_ok());
        }

        // Still open after the borrow went out of scope.
        {
            let borrowed = borrow_desc(desc);
            assert!(borrowed.local_addr().is_ok());
        }

        close_desc(desc).unwrap();
    }

    #[test]
    fn test_close_invalid_descriptor_fails() {
        #[cfg(unix)]
        assert!(close_desc(INVALID_DESC).is_err());
    }

    #[test]
    fn test_last_error_code_is_numeric() {
        let code = last_error_code();
        assert!(code.parse::<i64>().is_ok());
    }
}
