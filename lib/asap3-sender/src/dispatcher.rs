// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use std::sync::Arc;
use std::time::Duration;

use asap3_proto::{DispatchError, DispatchOutcome, Response, StatusCode, Telegram};
use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::listen::ListenSink;

/// One second per tick, 600 ticks: the ~10-minute cap on a single dispatch.
const TICK: Duration = Duration::from_secs(1);
const MAX_TICKS: u32 = 600;

/// Owns the telegram queue and enforces at-most-one-request-outstanding.
pub(crate) struct Dispatcher {
    queue: mpsc::Receiver<Telegram>,
    outgoing: mpsc::Sender<Vec<u8>>,
    incoming: mpsc::Receiver<Response>,
    restart: mpsc::Sender<()>,
    sink: Arc<dyn ListenSink>,
}

impl Dispatcher {
    pub(crate) fn new(
        queue: mpsc::Receiver<Telegram>,
        outgoing: mpsc::Sender<Vec<u8>>,
        incoming: mpsc::Receiver<Response>,
        restart: mpsc::Sender<()>,
        sink: Arc<dyn ListenSink>,
    ) -> Self {
        Self {
            queue,
            outgoing,
            incoming,
            restart,
            sink,
        }
    }

    /// Runs until the queue's sender half is dropped, i.e. until `stop()`.
    pub(crate) async fn run(mut self) {
        while let Some(telegram) = self.queue.recv().await {
            self.dispatch(telegram).await;
        }
    }

    async fn dispatch(&mut self, telegram: Telegram) {
        let expected_cmd = telegram.request().cmd();
        let body = telegram.request().create_body();
        self.sink.listen_request(telegram.request());

        if self.outgoing.send(body.clone()).await.is_err() {
            telegram.complete(DispatchOutcome::Failed(DispatchError::Disconnected));
            return;
        }

        for _tick in 0..MAX_TICKS {
            match timeout(TICK, self.incoming.recv()).await {
                Ok(Some(response)) => match response.status() {
                    StatusCode::Ack => continue,
                    StatusCode::RepeatCmd => {
                        debug!("REPEAT_CMD, retransmitting current request");
                        if self.outgoing.send(body.clone()).await.is_err() {
                            telegram.complete(DispatchOutcome::Failed(DispatchError::Disconnected));
                            return;
                        }
                    }
                    StatusCode::NotProcessed => {
                        warn!("NOT_PROCESSED, connection will restart");
                        let _ = self.restart.send(()).await;
                        telegram.complete(DispatchOutcome::Failed(DispatchError::Disconnected));
                        return;
                    }
                    StatusCode::Error => {
                        let response = narrow_to(response, expected_cmd);
                        telegram.complete(DispatchOutcome::Response(response));
                        return;
                    }
                    _ => {
                        let response = narrow_to(response, expected_cmd);
                        telegram.complete(DispatchOutcome::Response(response));
                        return;
                    }
                },
                Ok(None) => {
                    telegram.complete(DispatchOutcome::Failed(DispatchError::Disconnected));
                    return;
                }
                Err(_elapsed) => continue,
            }
        }

        warn!("dispatch exceeded the 600-tick cap, giving up on this telegram");
        telegram.complete(DispatchOutcome::Failed(DispatchError::Timeout));
    }
}

/// A response whose `cmd` doesn't match the telegram currently being served
/// is still acted on for its status, but its payload must not reach the
/// caller as if it belonged to their request.
fn narrow_to(response: Response, expected_cmd: asap3_proto::CommandCode) -> Response {
    if response.cmd() == expected_cmd {
        response
    } else {
        response.without_data()
    }
}
