// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use std::fmt;
use std::io;

/// Errors that can stop the reactor's current connection attempt or its
/// currently active socket; all of them fall back to `RETRY_WAIT`, so they
/// never reach a caller directly.
#[derive(Debug)]
pub enum ReadError {
    Io(io::Error),
    /// `length < 8` in a frame the reactor was about to read.
    ShortFrame(u16),
    /// The 10-second per-body watchdog fired before the body finished.
    Watchdog,
    /// The dispatcher saw `NOT_PROCESSED` and asked for the connection to be
    /// torn down and rebuilt.
    Restart,
}

impl std::error::Error for ReadError {}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "read error, IO failed: {err}"),
            Self::ShortFrame(length) => write!(f, "read error, frame length {length} is below the minimum of 8"),
            Self::Watchdog => write!(f, "read error, body read exceeded the 10-second watchdog"),
            Self::Restart => write!(f, "read error, restart requested after NOT_PROCESSED"),
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}
