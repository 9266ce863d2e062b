//! Newline-delimited JSON document codec for datagram RPC.
//!
//! Requests are `{"method": ..., "parameters": {...}}` objects, one per
//! datagram payload, terminated by a single `\n`. Responses are opaque
//! JSON documents whose shape is defined by the remote peer; this crate
//! only decides whether an accumulated byte buffer parses as one
//! complete document.

pub mod buffer;
pub mod error;
pub mod request;

pub use buffer::DocumentBuffer;
pub use error::{Result, WireError};
pub use request::{encode_request, Document, Request, INITIALIZE_METHOD};
