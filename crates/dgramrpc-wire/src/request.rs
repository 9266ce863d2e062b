use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A parsed response document.
///
/// The shape is defined entirely by the remote peer; callers only get
/// the guarantee "one complete JSON value".
pub type Document = serde_json::Value;

/// Method name of the session-setup request sent after every reconnect.
pub const INITIALIZE_METHOD: &str = "initialize";

/// A structured request: method name plus string parameters.
///
/// Parameters are kept in a `BTreeMap` so the wire encoding is
/// deterministic regardless of insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Request {
    /// Method name to invoke on the remote peer.
    pub method: String,
    /// String key/value parameters of the call.
    pub parameters: BTreeMap<String, String>,
}

impl Request {
    /// Create a request with no parameters.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Create a request with an explicit parameter map.
    pub fn with_parameters(method: impl Into<String>, parameters: BTreeMap<String, String>) -> Self {
        Self {
            method: method.into(),
            parameters,
        }
    }

    /// Add one parameter (builder style).
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Build the session-setup request carrying the full option map.
    ///
    /// Every option key/value is copied verbatim into the parameter
    /// object so backend-specific options pass through uninterpreted.
    pub fn initialize(options: &BTreeMap<String, String>) -> Self {
        Self::with_parameters(INITIALIZE_METHOD, options.clone())
    }
}

/// Encode a request into its wire form: compact JSON terminated by a
/// single `\n`. Messages are newline-delimited, not length-prefixed.
pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec(request)?;
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_appends_single_newline() {
        let bytes = encode_request(&Request::new("lookup")).unwrap();
        assert_eq!(bytes.last(), Some(&b'\n'));
        assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 1);
    }

    #[test]
    fn encode_shape_matches_wire_format() {
        let request = Request::new("lookup")
            .param("qtype", "SOA")
            .param("qname", "example.org");
        let bytes = encode_request(&request).unwrap();

        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            "{\"method\":\"lookup\",\"parameters\":{\"qname\":\"example.org\",\"qtype\":\"SOA\"}}\n"
        );
    }

    #[test]
    fn parameters_serialize_deterministically() {
        let a = Request::new("m").param("b", "2").param("a", "1");
        let b = Request::new("m").param("a", "1").param("b", "2");
        assert_eq!(encode_request(&a).unwrap(), encode_request(&b).unwrap());
    }

    #[test]
    fn initialize_carries_options_verbatim() {
        let mut options = BTreeMap::new();
        options.insert("address".to_string(), "127.0.0.1:5300".to_string());
        options.insert("timeout".to_string(), "500".to_string());
        options.insert("dnssec".to_string(), "yes".to_string());

        let request = Request::initialize(&options);
        assert_eq!(request.method, INITIALIZE_METHOD);
        assert_eq!(request.parameters, options);
    }

    #[test]
    fn request_roundtrips_through_json() {
        let request = Request::new("list").param("zone", "example.org");
        let bytes = encode_request(&request).unwrap();
        let decoded: Request = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, request);
    }
}
