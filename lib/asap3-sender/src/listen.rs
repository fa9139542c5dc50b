// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use asap3_proto::{Request, Response};

/// An injected, per-telegram trace facility layered on top of (not a
/// replacement for) the `log` crate. Log levels: `0` shows everything in
/// plain text, `1` hides cyclic `GET_ONLINE_VALUE(_EV2)` traffic, `2` shows
/// only that cyclic traffic, `3` is a raw hex dump.
pub trait ListenSink: Send + Sync {
    fn log_level(&self) -> u8 {
        0
    }

    fn listen_request(&self, _req: &Request) {}

    fn listen_response(&self, _resp: &Response) {}
}

/// The default sink: observes nothing.
pub struct NullListenSink;

impl ListenSink for NullListenSink {}
