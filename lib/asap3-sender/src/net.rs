// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use std::time::Duration;

use log::info;
use tokio::net::TcpStream;
use tokio::time::timeout;

#[derive(Debug, Clone)]
pub struct ServerAddr {
    pub host: String,
    pub port: u16,
}

impl ServerAddr {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for ServerAddr {
    /// Matches the original implementation's default endpoint.
    fn default() -> Self {
        Self::new("127.0.0.1", 22222)
    }
}

/// Resolves `addr` (the `RESOLVING` state) and connects (the `CONNECTING`
/// state), returning the live socket. `TcpStream::connect` performs both
/// steps internally; the state machine still treats them as distinct phases
/// for logging and retry purposes. Fails with `ErrorKind::TimedOut` if
/// `connect_timeout` elapses first.
pub(crate) async fn resolve_and_connect(
    addr: &ServerAddr,
    connect_timeout: Duration,
) -> Result<TcpStream, std::io::Error> {
    info!("resolving and connecting to {}:{}", addr.host, addr.port);
    match timeout(connect_timeout, TcpStream::connect((addr.host.as_str(), addr.port))).await {
        Ok(result) => result,
        Err(_elapsed) => Err(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "connect timed out",
        )),
    }
}
