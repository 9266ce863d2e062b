use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::time::Instant;

use dgramrpc_wire::{encode_request, Document, DocumentBuffer, Request};
use tracing::{debug, error, info, warn};

use crate::config::SessionConfig;
use crate::connection::Connection;
use crate::error::{ClientError, Result};
use crate::readiness::wait_readable;

/// Upper bound on a single datagram read.
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// The readability poll waits for at most this fraction of the receive
/// budget per iteration, so the loop re-checks its deadline at least
/// twice per budget. Both quantities are millisecond `Duration`s.
const POLL_SLICES_PER_BUDGET: u32 = 2;

/// Resilient request/response client over a connected UDP socket.
///
/// The client starts disconnected. The first `send` (or `receive`)
/// lazily establishes the socket and performs the `initialize`
/// handshake, forwarding the full session option map to the peer. Any
/// transport failure or exhausted receive budget collapses the session
/// back to disconnected, and the next call reconnects from scratch.
///
/// One logical caller drives `send`/`receive` sequentially; the type is
/// not internally synchronized.
#[derive(Debug)]
pub struct UdpSessionClient {
    config: SessionConfig,
    conn: Option<Connection>,
    recv_buf: DocumentBuffer,
}

impl UdpSessionClient {
    /// Create a client from validated session options.
    ///
    /// No socket is created yet; connection is deferred to the first
    /// call that needs one.
    pub fn new(config: SessionConfig) -> Self {
        info!(address = config.address(), "creating udp session client");
        Self {
            config,
            conn: None,
            recv_buf: DocumentBuffer::new(),
        }
    }

    /// Validate a raw option map and create a client.
    pub fn from_options(options: BTreeMap<String, String>) -> Result<Self> {
        Ok(Self::new(SessionConfig::from_options(options)?))
    }

    /// The session configuration this client was built with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether a connected socket with a completed handshake is held.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Drop the connection and any partially accumulated response.
    pub fn disconnect(&mut self) {
        self.conn = None;
        self.recv_buf.clear();
    }

    /// (Re)establish the socket and run the initialize handshake if
    /// currently disconnected; no-op otherwise.
    ///
    /// Socket creation, address resolution, and `connect()` short-
    /// circuit on first failure and leave the client disconnected. The
    /// handshake sends `initialize` with the full option map and must
    /// see one parseable response within the receive budget.
    pub fn ensure_connected(&mut self) -> Result<()> {
        if self.conn.is_some() {
            return Ok(());
        }

        info!(address = self.config.address(), "reconnecting to backend");
        let conn = match Connection::open(self.config.address()) {
            Ok(conn) => conn,
            Err(err) => {
                error!(address = self.config.address(), %err, "cannot connect datagram socket");
                return Err(ClientError::Io(err));
            }
        };

        // Install the connection before the handshake so the send and
        // receive below operate on the new socket.
        self.conn = Some(conn);
        self.recv_buf.clear();

        let init = Request::initialize(self.config.options());
        if let Err(err) = self.send(&init) {
            // Transport failures already tore the connection down in
            // send; this also covers encode failures.
            self.disconnect();
            return Err(err);
        }

        match self.receive() {
            Ok(_) => Ok(()),
            Err(err) => {
                warn!(%err, "failed to initialize backend");
                self.disconnect();
                Err(err)
            }
        }
    }

    /// Encode one request and write it as a single datagram.
    ///
    /// Reconnects first if needed. A short write or write error tears
    /// the connection down. Returns the number of bytes written.
    pub fn send(&mut self, request: &Request) -> Result<usize> {
        self.ensure_connected()?;

        let bytes = encode_request(request)?;
        let written = self
            .conn
            .as_ref()
            .ok_or(ClientError::NotConnected)?
            .socket()
            .send(&bytes);

        match written {
            Ok(n) if n == bytes.len() => Ok(n),
            Ok(n) => {
                error!(written = n, expected = bytes.len(), "short datagram write");
                self.disconnect();
                Err(ClientError::Io(std::io::Error::other("short datagram write")))
            }
            Err(err) => {
                error!(%err, "datagram write failed");
                self.disconnect();
                Err(ClientError::Io(err))
            }
        }
    }

    /// Wait for one complete response document within the configured
    /// budget.
    ///
    /// Polls readability in sub-budget slices against a single
    /// monotonic deadline, accumulating datagram payloads until they
    /// parse as one document. Returns the document and the number of
    /// payload bytes it consumed.
    ///
    /// Exhausting the budget tears the connection down so the next call
    /// re-runs the handshake; poll and read errors surface immediately
    /// without that reset (a poll failure does not disconnect, a read
    /// failure disconnects via `read_chunk` itself).
    pub fn receive(&mut self) -> Result<(Document, usize)> {
        let budget = self.config.timeout();
        let slice = budget / POLL_SLICES_PER_BUDGET;
        let deadline = Instant::now() + budget;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            self.ensure_connected()?;
            let readable = {
                let conn = self.conn.as_ref().ok_or(ClientError::NotConnected)?;
                wait_readable(conn.socket(), slice.min(remaining)).map_err(ClientError::Poll)?
            };
            if !readable {
                continue;
            }

            if self.read_chunk()? == 0 {
                continue;
            }

            if let Some(document) = self.recv_buf.try_parse() {
                let consumed = self.recv_buf.len();
                self.recv_buf.clear();
                return Ok((document, consumed));
            }
            debug!(
                buffered = self.recv_buf.len(),
                "incomplete document, still accumulating"
            );
        }

        debug!(?budget, "receive budget exhausted, resetting connection");
        self.disconnect();
        Err(ClientError::Timeout(budget))
    }

    /// One read of up to [`READ_CHUNK_SIZE`] bytes into the
    /// accumulation buffer.
    ///
    /// Would-block is not an error and reports zero bytes; any other
    /// read error tears the connection down.
    fn read_chunk(&mut self) -> Result<usize> {
        self.ensure_connected()?;

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let read = self
            .conn
            .as_ref()
            .ok_or(ClientError::NotConnected)?
            .socket()
            .recv(&mut chunk);

        match read {
            Ok(n) => {
                self.recv_buf.extend(&chunk[..n]);
                Ok(n)
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => Ok(0),
            Err(err) => {
                error!(%err, "datagram read failed");
                self.disconnect();
                Err(ClientError::Io(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn starts_disconnected() {
        let client =
            UdpSessionClient::from_options(options(&[("address", "127.0.0.1:9999")])).unwrap();
        assert!(!client.is_connected());
    }

    #[test]
    fn from_options_propagates_config_errors() {
        let err = UdpSessionClient::from_options(options(&[("timeout", "500")])).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Config(crate::config::ConfigError::MissingAddress)
        ));
    }

    #[test]
    fn disconnect_is_idempotent() {
        let mut client =
            UdpSessionClient::from_options(options(&[("address", "127.0.0.1:9999")])).unwrap();
        client.disconnect();
        client.disconnect();
        assert!(!client.is_connected());
    }
}
