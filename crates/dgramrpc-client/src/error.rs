use std::io;
use std::time::Duration;

use crate::config::ConfigError;

/// Errors surfaced by session client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Session options were invalid at construction.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The connection could not be (re)established.
    #[error("not connected")]
    NotConnected,

    /// Request encoding failed.
    #[error("wire error: {0}")]
    Wire(#[from] dgramrpc_wire::WireError),

    /// A read or write on the datagram socket failed. The connection
    /// has been torn down; the next call reconnects.
    #[error("transport I/O error: {0}")]
    Io(#[source] io::Error),

    /// The readability poll itself failed. The connection is left in
    /// place; only budget exhaustion forces a reset.
    #[error("poll error: {0}")]
    Poll(#[source] io::Error),

    /// No parseable response arrived within the receive budget. The
    /// connection has been torn down to force a fresh handshake.
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, ClientError>;
