use std::collections::BTreeMap;
use std::num::ParseIntError;
use std::time::Duration;

/// Receive budget used when no `timeout` option is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

/// Errors that can occur while validating session options.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The required `address` option is absent.
    #[error("missing required 'address' option")]
    MissingAddress,

    /// The `timeout` option is not a valid millisecond count.
    #[error("invalid 'timeout' value '{value}': {source}")]
    InvalidTimeout {
        value: String,
        source: ParseIntError,
    },
}

/// Session options supplied at construction, immutable afterwards.
///
/// `address` and `timeout` are consumed by the client itself; every
/// other key is opaque pass-through data forwarded verbatim to the
/// remote peer during the initialize handshake.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    address: String,
    timeout: Duration,
    options: BTreeMap<String, String>,
}

impl SessionConfig {
    /// Validate a raw option map.
    ///
    /// Fails if `address` is missing or `timeout` is non-numeric.
    pub fn from_options(options: BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let address = options
            .get("address")
            .cloned()
            .ok_or(ConfigError::MissingAddress)?;

        let timeout = match options.get("timeout") {
            Some(value) => {
                let millis: u64 =
                    value
                        .parse()
                        .map_err(|source| ConfigError::InvalidTimeout {
                            value: value.clone(),
                            source,
                        })?;
                Duration::from_millis(millis)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            address,
            timeout,
            options,
        })
    }

    /// The textual remote endpoint (`host:port`).
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Total receive budget per call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The full option map, as handed to the initialize handshake.
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    /// Look up a single option by key.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
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
    fn missing_address_rejected() {
        let err = SessionConfig::from_options(options(&[("timeout", "500")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingAddress));
    }

    #[test]
    fn missing_address_rejected_regardless_of_other_keys() {
        let err = SessionConfig::from_options(options(&[
            ("timeout", "500"),
            ("dnssec", "yes"),
            ("zone", "example.org"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingAddress));
    }

    #[test]
    fn non_numeric_timeout_rejected() {
        let err = SessionConfig::from_options(options(&[
            ("address", "127.0.0.1:5300"),
            ("timeout", "abc"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }));
    }

    #[test]
    fn explicit_timeout_parsed() {
        let config = SessionConfig::from_options(options(&[
            ("address", "127.0.0.1:5300"),
            ("timeout", "500"),
        ]))
        .unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(500));
    }

    #[test]
    fn timeout_defaults_to_two_seconds() {
        let config =
            SessionConfig::from_options(options(&[("address", "127.0.0.1:5300")])).unwrap();
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn passthrough_options_preserved() {
        let config = SessionConfig::from_options(options(&[
            ("address", "127.0.0.1:5300"),
            ("dnssec", "yes"),
        ]))
        .unwrap();
        assert_eq!(config.option("dnssec"), Some("yes"));
        assert_eq!(config.options().len(), 2);
        assert_eq!(config.address(), "127.0.0.1:5300");
    }
}
