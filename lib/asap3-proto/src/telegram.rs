// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use tokio::sync::oneshot;

use crate::error::ProtoError;
use crate::request::Request;
use crate::response::Response;

/// The outcome the sender delivers back to whoever queued a [`Request`]:
/// either the server's response, or a transport/protocol-level failure
/// (reconnect-triggering `NOT_PROCESSED`, the 10-minute dispatch timeout,
/// a checksum mismatch, or a `STATUS_ERROR` payload).
#[derive(Debug)]
pub enum DispatchOutcome {
    Response(Response),
    Failed(DispatchError),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DispatchError {
    /// The connection dropped, or the server replied `NOT_PROCESSED`, before
    /// a usable response arrived; the caller's telegram was not completed.
    Disconnected,
    /// The telegram sat in the dispatcher for 600 one-second ticks without
    /// completing.
    Timeout,
    Proto(ProtoError),
}

/// One request paired with the channel its eventual outcome is delivered
/// through. Built by the caller, handed to the sender's telegram queue, and
/// consumed by the dispatcher: the completion side (`tx`) lives with the
/// dispatcher, the observing side (`rx`) lives with the caller.
pub struct Telegram {
    request: Request,
    complete: oneshot::Sender<DispatchOutcome>,
}

impl Telegram {
    /// Builds a telegram and returns it paired with the receiver its caller
    /// awaits for the outcome.
    pub fn new(request: Request) -> (Self, oneshot::Receiver<DispatchOutcome>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                request,
                complete: tx,
            },
            rx,
        )
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Consumes the telegram, delivering `outcome` to whoever is awaiting
    /// its receiver. A dropped receiver (the caller gave up) is not an
    /// error here; there is nothing left to notify.
    pub fn complete(self, outcome: DispatchOutcome) {
        let _ = self.complete.send(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::init_request;

    #[tokio::test]
    async fn completing_a_telegram_delivers_the_outcome_to_its_receiver() {
        let (telegram, rx) = Telegram::new(init_request());
        telegram.complete(DispatchOutcome::Failed(DispatchError::Timeout));
        let outcome = rx.await.expect("sender side was not dropped");
        assert!(matches!(
            outcome,
            DispatchOutcome::Failed(DispatchError::Timeout)
        ));
    }

    #[tokio::test]
    async fn dropping_the_receiver_does_not_panic_on_complete() {
        let (telegram, rx) = Telegram::new(init_request());
        drop(rx);
        telegram.complete(DispatchOutcome::Failed(DispatchError::Disconnected));
    }
}
