// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use asap3_codec::{checksum, data_list_size, data_list_to_body, encode_u16, DataList, Value};

use crate::command::CommandCode;

/// `{cmd, data}` — immutable once built. [`Request::create_body`] produces
/// the on-wire frame `[length][cmd][data][sum]` (no `status` field; that
/// only appears in responses).
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    cmd: CommandCode,
    data: DataList,
}

impl Request {
    pub fn new(cmd: CommandCode, data: DataList) -> Self {
        Self { cmd, data }
    }

    pub fn cmd(&self) -> CommandCode {
        self.cmd
    }

    pub fn data(&self) -> &DataList {
        &self.data
    }

    /// Returns the `i`-th payload value coerced to `T`. Out of range or type
    /// mismatch yields `T::default()`, never panics — callers never need to
    /// handle a missing-field error for what is effectively an optional
    /// positional argument.
    pub fn get_u16(&self, index: usize) -> u16 {
        self.data.get(index).map(|v| v.value.as_u16()).unwrap_or_default()
    }

    pub fn get_string(&self, index: usize) -> String {
        self.data
            .get(index)
            .map(|v| v.value.as_string())
            .unwrap_or_default()
    }

    /// Builds the full frame: `BE16(length) || BE16(cmd) || data || BE16(sum)`.
    pub fn create_body(&self) -> Vec<u8> {
        let length = 2 + 2 + data_list_size(&self.data) + 2;
        let mut body = Vec::with_capacity(length);
        encode_u16(&mut body, length as u16);
        encode_u16(&mut body, self.cmd.code());
        data_list_to_body(&self.data, &mut body);
        // Reserve the sum slot, compute over everything before it, then fill it in.
        body.extend_from_slice(&[0, 0]);
        let sum = checksum(&body);
        let len = body.len();
        body[len - 2..].copy_from_slice(&sum.to_be_bytes());
        body
    }
}

/// Convenience constructors for the handful of zero/short-payload requests
/// the handshake and dispatcher send directly.
pub fn init_request() -> Request {
    Request::new(CommandCode::Init, Vec::new())
}

pub fn exit_request() -> Request {
    Request::new(CommandCode::Exit, Vec::new())
}

pub fn identify_request(version: u16, name: &str) -> Request {
    Request::new(
        CommandCode::Identify,
        vec![
            asap3_codec::DataValue::new("Version", Value::UInt16(version)),
            asap3_codec::DataValue::new("Name", Value::String(name.to_string())),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use asap3_codec::DataValue;

    #[test]
    fn s2_init_request_has_no_payload() {
        let body = init_request().create_body();
        assert_eq!(body.len(), 8);
        assert_eq!(&body[0..2], &[0x00, 0x08]);
        assert_eq!(&body[2..4], &[0x00, 0x02]);
        let sum = u16::from_be_bytes([body[6], body[7]]);
        assert_eq!(sum, 8u16.wrapping_add(2));
    }

    #[test]
    fn s1_identify_request_matches_literal_scenario() {
        let body = identify_request(0x0300, "OLLE").create_body();
        assert_eq!(body.len(), 14);
        assert_eq!(&body[0..2], &[0x00, 0x0E]);
        assert_eq!(&body[2..4], &[0x00, 0x14]);
        assert_eq!(&body[4..6], &[0x03, 0x00]);
        assert_eq!(&body[6..8], &[0x00, 0x04]);
        assert_eq!(&body[8..12], b"OLLE");
        let expected_sum = 14u16
            .wrapping_add(0x14)
            .wrapping_add(0x0300)
            .wrapping_add(4)
            .wrapping_add(u16::from_be_bytes([b'O', b'L']))
            .wrapping_add(u16::from_be_bytes([b'L', b'E']));
        let sum = u16::from_be_bytes([body[12], body[13]]);
        assert_eq!(sum, expected_sum);
    }

    #[test]
    fn produced_frames_are_even_and_at_least_eight_bytes() {
        for req in [
            init_request(),
            exit_request(),
            identify_request(0x0300, "X"),
            Request::new(
                CommandCode::ExecuteService,
                vec![
                    DataValue::new("Service", Value::String("A".into())),
                    DataValue::new("Input", Value::String("".into())),
                ],
            ),
        ] {
            let body = req.create_body();
            assert_eq!(body.len() % 2, 0);
            assert!(body.len() >= 8);
        }
    }
}
