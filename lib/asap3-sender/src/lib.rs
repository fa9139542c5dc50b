// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT

//! Transport and dispatch layer for the ASAP3 client: the TCP connection
//! state machine (resolve/connect/read/retry) and the at-most-one-request
//! dispatcher that serializes telegrams onto the wire. Carries no protocol
//! semantics of its own beyond framing — that lives in `asap3-client`.

#![deny(unsafe_code)]

mod dispatcher;
mod error;
mod listen;
mod net;
mod reactor;

use std::sync::Arc;
use std::time::Duration;

use asap3_proto::Telegram;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use error::ReadError;
pub use listen::{ListenSink, NullListenSink};
pub use net::ServerAddr;
pub use reactor::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT, DEFAULT_RETRY_DELAY};

const QUEUE_CAPACITY: usize = 64;
const RESPONSE_CAPACITY: usize = 8;

/// Cheaply cloneable handle callers use to enqueue telegrams. Dropping every
/// clone is the sentinel that tells the reactor and dispatcher to stop.
#[derive(Clone)]
pub struct SenderHandle(mpsc::Sender<Telegram>);

impl SenderHandle {
    /// Enqueues a telegram. Fails only if the sender has already stopped.
    pub async fn send(&self, telegram: Telegram) -> Result<(), Telegram> {
        self.0.send(telegram).await.map_err(|err| err.0)
    }
}

/// Owns the reactor and dispatcher tasks. Call [`Sender::run`] once to start
/// both; the returned `JoinHandle`s resolve once `stop()`'s sentinel has
/// drained them.
pub struct Sender {
    addr: ServerAddr,
    queue_rx: mpsc::Receiver<Telegram>,
    sink: Arc<dyn ListenSink>,
    connect_timeout: Duration,
    read_timeout: Duration,
    retry_delay: Duration,
}

/// Creates the telegram queue and returns the (not-yet-running) `Sender`
/// alongside the handle used to feed it.
pub fn connect(addr: ServerAddr) -> (Sender, SenderHandle) {
    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
    (
        Sender {
            addr,
            queue_rx: rx,
            sink: Arc::new(NullListenSink),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
        },
        SenderHandle(tx),
    )
}

impl Sender {
    pub fn with_listen_sink(mut self, sink: Arc<dyn ListenSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Overrides the connect, per-body read, and reconnect-backoff
    /// durations the reactor otherwise defaults to.
    pub fn with_timing(mut self, connect_timeout: Duration, read_timeout: Duration, retry_delay: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.read_timeout = read_timeout;
        self.retry_delay = retry_delay;
        self
    }

    /// Spawns the reactor and dispatcher tasks and returns their join
    /// handles. Dropping every [`SenderHandle`] clone (or calling `stop()`
    /// on the client facade) closes the telegram queue, which is the
    /// sentinel that unwinds both tasks.
    pub fn run(self) -> (JoinHandle<()>, JoinHandle<()>) {
        let (outgoing_tx, outgoing_rx) = mpsc::channel(QUEUE_CAPACITY);
        let (incoming_tx, incoming_rx) = mpsc::channel(RESPONSE_CAPACITY);
        let (restart_tx, restart_rx) = mpsc::channel(1);

        let reactor = reactor::Reactor::new(
            self.addr,
            outgoing_rx,
            incoming_tx,
            restart_rx,
            self.sink.clone(),
            self.connect_timeout,
            self.read_timeout,
            self.retry_delay,
        );
        let dispatcher = dispatcher::Dispatcher::new(self.queue_rx, outgoing_tx, incoming_rx, restart_tx, self.sink);

        let reactor_handle = tokio::spawn(reactor.run());
        let dispatcher_handle = tokio::spawn(dispatcher.run());
        (reactor_handle, dispatcher_handle)
    }
}
