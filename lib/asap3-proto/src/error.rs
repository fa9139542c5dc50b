// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use std::fmt;

/// Errors surfaced directly to a caller awaiting a telegram, as opposed to
/// the transport-level reconnect/retry handled entirely inside the sender.
#[derive(Clone, Debug, PartialEq)]
pub enum ProtoError {
    /// The server reported `STATUS_ERROR`; carries the decoded
    /// `(ErrorCode, ErrorText)` payload.
    Server { code: u16, text: String },
    /// The response's checksum did not match its declared `sum`.
    InvalidChecksum,
}

impl std::error::Error for ProtoError {}

impl fmt::Display for ProtoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server { code, text } => write!(f, "server error {code:#06x}: {text}"),
            Self::InvalidChecksum => write!(f, "response failed checksum validation"),
        }
    }
}
