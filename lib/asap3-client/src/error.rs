// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use std::fmt;

use asap3_proto::{DispatchError, ProtoError};

#[derive(Clone, Debug, PartialEq)]
pub enum ClientError {
    /// `start_subscription` was called with no parameters configured.
    NoParametersConfigured,
    /// The server advertises neither of the two services `ComTestClient`
    /// needs (`"Get Number of Parameters"` / `"Get Parameter Configuration"`).
    MissingService(String),
    Proto(ProtoError),
    Disconnected,
    Timeout,
}

impl std::error::Error for ClientError {}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoParametersConfigured => write!(f, "no parameters configured for subscription"),
            Self::MissingService(name) => write!(f, "server does not advertise required service: {name}"),
            Self::Proto(err) => write!(f, "{err}"),
            Self::Disconnected => write!(f, "connection was lost before a response arrived"),
            Self::Timeout => write!(f, "dispatch exceeded its 10-minute cap"),
        }
    }
}

impl From<DispatchError> for ClientError {
    fn from(error: DispatchError) -> Self {
        match error {
            DispatchError::Disconnected => Self::Disconnected,
            DispatchError::Timeout => Self::Timeout,
            DispatchError::Proto(err) => Self::Proto(err),
        }
    }
}

impl From<ProtoError> for ClientError {
    fn from(error: ProtoError) -> Self {
        Self::Proto(error)
    }
}
