// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use std::time::Duration;

/// Configuration required to create a [`crate::Client`] instance.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Sent as the `Name` field of the `IDENTIFY` handshake.
    pub name: String,
    /// Sent as the `Version` field of the `IDENTIFY` handshake (`0x0300` = 3.0).
    pub version: u16,
    /// Sample rate (Hz) used by [`crate::Client::start_subscription`].
    pub scan_rate: u16,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub retry_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 22222,
            name: "asap3-client".to_string(),
            version: 0x0300,
            scan_rate: 100,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Fluent builder for [`ClientConfig`].
#[derive(Clone, Debug, Default)]
pub struct ClientBuilder(ClientConfig);

impl ClientBuilder {
    pub fn new() -> Self {
        Self(ClientConfig::default())
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.0.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.0.port = port;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = name.into();
        self
    }

    pub fn version(mut self, version: u16) -> Self {
        self.0.version = version;
        self
    }

    pub fn scan_rate(mut self, scan_rate: u16) -> Self {
        self.0.scan_rate = scan_rate;
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.0.connect_timeout = connect_timeout;
        self
    }

    pub fn read_timeout(mut self, read_timeout: Duration) -> Self {
        self.0.read_timeout = read_timeout;
        self
    }

    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.0.retry_delay = retry_delay;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_the_protocol_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 22222);
        assert_eq!(config.version, 0x0300);
    }

    #[test]
    fn builder_overrides_only_what_is_set() {
        let config = ClientBuilder::new().host("10.0.0.5").port(9999).build();
        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.port, 9999);
        assert_eq!(config.version, 0x0300);
    }
}
