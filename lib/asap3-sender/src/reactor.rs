// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use std::sync::Arc;
use std::time::Duration;

use asap3_proto::Response;
use log::{debug, info, trace, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use crate::error::ReadError;
use crate::listen::ListenSink;
use crate::net::{resolve_and_connect, ServerAddr};

/// Default connect, per-body read, and reconnect-backoff durations, used
/// when the caller doesn't override them via [`crate::Sender::with_timing`].
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Owns the socket and runs the `RESOLVING → CONNECTING → READING_LENGTH ↔
/// READING_BODY → RETRY_WAIT` state machine. A second task, the
/// [`crate::dispatcher::Dispatcher`], drives what gets written and reacts to
/// what this task decodes; the two communicate only through
/// `outgoing`/`incoming`.
pub(crate) struct Reactor {
    addr: ServerAddr,
    outgoing: mpsc::Receiver<Vec<u8>>,
    incoming: mpsc::Sender<Response>,
    restart: mpsc::Receiver<()>,
    sink: Arc<dyn ListenSink>,
    connect_timeout: Duration,
    read_timeout: Duration,
    retry_delay: Duration,
}

impl Reactor {
    pub(crate) fn new(
        addr: ServerAddr,
        outgoing: mpsc::Receiver<Vec<u8>>,
        incoming: mpsc::Sender<Response>,
        restart: mpsc::Receiver<()>,
        sink: Arc<dyn ListenSink>,
        connect_timeout: Duration,
        read_timeout: Duration,
        retry_delay: Duration,
    ) -> Self {
        Self {
            addr,
            outgoing,
            incoming,
            restart,
            sink,
            connect_timeout,
            read_timeout,
            retry_delay,
        }
    }

    /// Runs until `outgoing`'s sender half is dropped (the sentinel stop
    /// signal) or the incoming channel's receiver is dropped.
    pub(crate) async fn run(mut self) {
        loop {
            match resolve_and_connect(&self.addr, self.connect_timeout).await {
                Ok(stream) => {
                    info!("connected to {}:{}", self.addr.host, self.addr.port);
                    match self.drive(stream).await {
                        Ok(()) => return,
                        Err(err) => warn!("connection lost, retrying in {:?}: {err}", self.retry_delay),
                    }
                }
                Err(err) => warn!("connect failed, retrying in {:?}: {err}", self.retry_delay),
            }
            if self.outgoing.is_closed() {
                return;
            }
            sleep(self.retry_delay).await;
        }
    }

    /// Drives one live connection until it errors out. `Ok(())` means the
    /// caller told us to stop (the outgoing channel closed); any `Err`
    /// sends the reactor back to `RETRY_WAIT`.
    async fn drive(&mut self, stream: TcpStream) -> Result<(), ReadError> {
        let (mut reader, mut writer) = stream.into_split();
        loop {
            tokio::select! {
                biased;
                frame = read_frame(&mut reader, self.read_timeout) => {
                    let response = frame?;
                    trace!("read response cmd={:?} status={:?}", response.cmd(), response.status());
                    self.sink.listen_response(&response);
                    if self.incoming.send(response).await.is_err() {
                        return Ok(());
                    }
                }
                outgoing = self.outgoing.recv() => {
                    match outgoing {
                        Some(bytes) => {
                            debug!("writing {} bytes", bytes.len());
                            writer.write_all(&bytes).await?;
                        }
                        None => return Ok(()),
                    }
                }
                _ = self.restart.recv() => {
                    return Err(ReadError::Restart);
                }
            }
        }
    }
}

async fn read_frame(reader: &mut (impl AsyncReadExt + Unpin), watchdog: Duration) -> Result<Response, ReadError> {
    let mut length_buf = [0u8; 2];
    reader.read_exact(&mut length_buf).await?;
    let length = u16::from_be_bytes(length_buf);
    if length < 8 {
        return Err(ReadError::ShortFrame(length));
    }

    let mut body = vec![0u8; length as usize - 2];
    timeout(watchdog, reader.read_exact(&mut body))
        .await
        .map_err(|_| ReadError::Watchdog)??;

    Ok(Response::from_body_without_length(&body))
}
