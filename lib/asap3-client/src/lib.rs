// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT

//! A high-level client for the ASAP3 measurement-and-calibration protocol.
//!
//! [`Client`] drives the identity handshake, parameter subscription, value
//! caches and service catalog over an [`asap3_sender`] connection.
//! [`ComTestClient`] wraps it to discover its own parameter list from the
//! server's `ComTest` service pair instead of requiring one upfront.

#![deny(unsafe_code)]

mod cache;
mod client;
mod comtest;
mod config;
mod error;
mod parameter;
mod service;

use std::sync::Arc;

use asap3_sender::{ListenSink, NullListenSink};
use tokio::task::JoinHandle;

pub use client::Client;
pub use comtest::ComTestClient;
pub use config::{ClientBuilder, ClientConfig};
pub use error::ClientError;
pub use parameter::{Parameter, ParameterList};
pub use service::{Service, ServiceCatalog};

/// Which client variant to build. The original ships two near-duplicate
/// factories (`BasicAsap3Client`, and `QueryCtParameters` /
/// `QueryComTestParameters` for the same ComTest-discovery variant); this
/// crate keeps a single spelling per variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Asap3ClientKind {
    /// A plain [`Client`] taking a caller-supplied parameter list.
    Basic,
    /// A [`ComTestClient`] that discovers its parameter list from the
    /// server's `ComTest` service pair.
    ComTestParameters,
}

/// The client [`build`] returns, wrapping whichever variant `kind` asked for.
pub enum Asap3Client {
    Basic(Client),
    ComTestParameters(ComTestClient),
}

impl Asap3Client {
    /// The underlying [`Client`] regardless of which variant this is.
    pub fn client(&self) -> &Client {
        match self {
            Self::Basic(client) => client,
            Self::ComTestParameters(comtest) => comtest.client(),
        }
    }
}

/// Connects and constructs the client variant named by `kind`, spawning the
/// reactor and dispatcher tasks. Does not perform the handshake: call
/// [`Client::start`] (via [`Asap3Client::client`]) or
/// [`ComTestClient::start`] once the tasks are running.
pub fn build(kind: Asap3ClientKind, config: ClientConfig) -> (Asap3Client, JoinHandle<()>, JoinHandle<()>) {
    build_with_listen_sink(kind, config, Arc::new(NullListenSink))
}

pub fn build_with_listen_sink(
    kind: Asap3ClientKind,
    config: ClientConfig,
    sink: Arc<dyn ListenSink>,
) -> (Asap3Client, JoinHandle<()>, JoinHandle<()>) {
    let (client, reactor_task, dispatcher_task) = Client::connect_with_listen_sink(config, sink);
    let client = match kind {
        Asap3ClientKind::Basic => Asap3Client::Basic(client),
        Asap3ClientKind::ComTestParameters => Asap3Client::ComTestParameters(ComTestClient::new(client)),
    };
    (client, reactor_task, dispatcher_task)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn build_dispatches_to_the_requested_variant() {
        let (client, reactor_task, dispatcher_task) = build(Asap3ClientKind::Basic, ClientConfig::default());
        assert!(matches!(client, Asap3Client::Basic(_)));
        reactor_task.abort();
        dispatcher_task.abort();

        let (client, reactor_task, dispatcher_task) =
            build(Asap3ClientKind::ComTestParameters, ClientConfig::default());
        assert!(matches!(client, Asap3Client::ComTestParameters(_)));
        reactor_task.abort();
        dispatcher_task.abort();
    }
}
