use std::io;
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use tracing::debug;

/// A connected datagram socket, valid for exactly one session.
///
/// Dropping the connection releases the descriptor, so every failure
/// path only needs to drop the value instead of closing explicitly.
#[derive(Debug)]
pub(crate) struct Connection {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl Connection {
    /// Create an IPv4 UDP socket, resolve the peer endpoint, and fix
    /// the default destination with a datagram `connect()`.
    ///
    /// The `connect()` only sets the peer filter; no packets are
    /// exchanged at the transport layer.
    pub(crate) fn open(address: &str) -> io::Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        let peer = resolve_ipv4(address)?;
        socket.connect(peer)?;
        socket.set_nonblocking(true)?;
        debug!(%peer, "datagram socket connected");
        Ok(Self { socket, peer })
    }

    pub(crate) fn socket(&self) -> &UdpSocket {
        &self.socket
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        debug!(peer = %self.peer, "closing datagram socket");
    }
}

/// Resolve a textual `host:port` endpoint into the first usable IPv4
/// socket address.
fn resolve_ipv4(address: &str) -> io::Result<SocketAddr> {
    address
        .to_socket_addrs()?
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("no usable IPv4 address for '{address}'"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_against_local_listener() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let conn = Connection::open(&addr.to_string()).unwrap();
        assert_eq!(conn.peer, addr);
    }

    #[test]
    fn unresolvable_address_fails() {
        assert!(Connection::open("definitely-not-a-host.invalid:1").is_err());
    }

    #[test]
    fn missing_port_fails() {
        assert!(Connection::open("127.0.0.1").is_err());
    }

    #[test]
    fn socket_is_nonblocking() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let conn = Connection::open(&addr.to_string()).unwrap();

        let mut buf = [0u8; 16];
        let err = conn.socket().recv(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
    }
}
