// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT

//! Request/response framing for the ASAP3 measurement-and-calibration
//! protocol: command and status codes, the `Request`/`Response` types and
//! their wire layout, and the `Telegram` pairing used to hand a request to
//! the sender and later collect its outcome.

mod command;
mod error;
mod request;
mod response;
mod telegram;

pub use command::{CharType, CommandCode, StatusCode, ValueType};
pub use error::ProtoError;
pub use request::{exit_request, identify_request, init_request, Request};
pub use response::Response;
pub use telegram::{DispatchError, DispatchOutcome, Telegram};
