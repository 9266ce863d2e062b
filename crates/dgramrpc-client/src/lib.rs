//! Resilient UDP session client.
//!
//! Provides a reliable-feeling request/response abstraction over a
//! connectionless datagram socket: lazy (re)connection with an
//! `initialize` handshake, newline-delimited JSON messages, and a
//! receive loop bounded by a wall-clock budget. Any transport failure
//! collapses the session back to disconnected; the next call
//! re-establishes it.

pub mod client;
pub mod config;
pub mod error;

mod connection;
mod readiness;

pub use client::UdpSessionClient;
pub use config::{ConfigError, SessionConfig, DEFAULT_TIMEOUT};
pub use error::{ClientError, Result};
