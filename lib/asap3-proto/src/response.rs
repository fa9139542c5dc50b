// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use asap3_codec::{body_to_data_list, checksum, DataList, DataType, DataValue};

use crate::command::{CommandCode, StatusCode};

fn error_schema() -> DataList {
    vec![
        DataValue::schema("ErrorCode", DataType::UInt16),
        DataValue::schema("ErrorText", DataType::String),
    ]
}

fn identify_schema() -> DataList {
    vec![
        DataValue::schema("Version", DataType::UInt16),
        DataValue::schema("Name", DataType::String),
    ]
}

fn define_desc_file_schema() -> DataList {
    vec![
        DataValue::schema("LUN", DataType::UInt16),
        DataValue::schema("DescriptionFile", DataType::String),
        DataValue::schema("BinaryFile", DataType::String),
        DataValue::schema("CalibrationFile", DataType::String),
    ]
}

fn select_desc_file_schema() -> DataList {
    vec![DataValue::schema("LUN", DataType::UInt16)]
}

fn query_available_service_schema(body: &[u8], offset: usize) -> DataList {
    let mut schema = vec![DataValue::schema("Services", DataType::UInt16)];
    if offset + 2 <= body.len() {
        let count = u16::from_be_bytes([body[offset], body[offset + 1]]);
        for i in 0..count {
            schema.push(DataValue::schema(format!("Service {}", i + 1), DataType::String));
        }
    }
    schema
}

fn get_user_defined_value_list_schema(body: &[u8], offset: usize) -> DataList {
    let mut schema = vec![DataValue::schema("Values", DataType::UInt16)];
    if offset + 2 <= body.len() {
        let count = u16::from_be_bytes([body[offset], body[offset + 1]]);
        for i in 0..count {
            schema.push(DataValue::schema(format!("LUN {}", i + 1), DataType::UInt16));
            schema.push(DataValue::schema(format!("Value {}", i + 1), DataType::String));
        }
    }
    schema
}

fn execute_service_schema() -> DataList {
    vec![DataValue::schema("Output", DataType::String)]
}

fn get_service_information_schema() -> DataList {
    vec![DataValue::schema("Service Info", DataType::String)]
}

fn get_calpage_info_schema(body: &[u8], offset: usize) -> DataList {
    let mut schema = vec![DataValue::schema("Pages", DataType::UInt16)];
    if offset + 2 <= body.len() {
        let pages = u16::from_be_bytes([body[offset], body[offset + 1]]);
        for page in 0..pages {
            let label = format!("Page {} ", page + 1);
            schema.push(DataValue::schema(format!("{label}Index"), DataType::UInt16));
            schema.push(DataValue::schema(format!("{label}Name"), DataType::String));
            schema.push(DataValue::schema(
                format!("{label}Properties"),
                DataType::UInt16,
            ));
        }
    }
    schema
}

/// Commands whose payload is delivered as raw bytes to the client's value
/// caches rather than expanded into `Response::data` — the caller (the
/// client facade) is expected to know, from `cmd`, to call
/// [`Response::raw_payload`] instead of [`Response::data`].
fn is_raw_payload_command(cmd: CommandCode) -> bool {
    matches!(
        cmd,
        CommandCode::GetOnlineValue | CommandCode::GetOnlineValueEv2 | CommandCode::GetUserDefinedValue
    )
}

fn schema_for(cmd: CommandCode, body: &[u8], offset: usize) -> DataList {
    match cmd {
        CommandCode::Identify => identify_schema(),
        CommandCode::DefineDescriptionFileAndBinaryFile => define_desc_file_schema(),
        CommandCode::SelectDescriptionFileAndBinaryFile => select_desc_file_schema(),
        CommandCode::GetCalpageInfo => get_calpage_info_schema(body, offset),
        CommandCode::GetUserDefinedValueList => get_user_defined_value_list_schema(body, offset),
        CommandCode::QueryAvailableService => query_available_service_schema(body, offset),
        CommandCode::GetServiceInformation => get_service_information_schema(),
        CommandCode::ExecuteService => execute_service_schema(),
        _ => Vec::new(),
    }
}

/// `{length, cmd, status, data, sum, invalid_checksum}`. Built from the body
/// the transport already stripped the 2-byte length prefix from.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    length: u16,
    cmd: CommandCode,
    status: StatusCode,
    data: DataList,
    sum: u16,
    invalid_checksum: bool,
    /// The bytes of the data-list payload, kept around so commands whose
    /// payload is delivered raw (see [`is_raw_payload_command`]) can be
    /// handed to the client's cache-mutating decoders unchanged.
    raw_payload: Vec<u8>,
}

impl Response {
    /// `body_without_length` excludes the 2-byte length prefix the reactor
    /// already consumed while framing the message.
    pub fn from_body_without_length(body_without_length: &[u8]) -> Self {
        let length = body_without_length.len() as u16 + 2;
        if length < 8 {
            return Self {
                length,
                cmd: CommandCode::Unknown(0),
                status: StatusCode::Unknown(0),
                data: Vec::new(),
                sum: 0,
                invalid_checksum: true,
                raw_payload: Vec::new(),
            };
        }

        let cmd = CommandCode::from_code(u16::from_be_bytes([
            body_without_length[0],
            body_without_length[1],
        ]));
        let status = StatusCode::from_code(u16::from_be_bytes([
            body_without_length[2],
            body_without_length[3],
        ]));

        const PAYLOAD_OFFSET: usize = 4;
        let payload_end = body_without_length.len() - 2;
        let raw_payload = if payload_end > PAYLOAD_OFFSET {
            body_without_length[PAYLOAD_OFFSET..payload_end].to_vec()
        } else {
            Vec::new()
        };

        let data = if length <= 8 {
            Vec::new()
        } else if !status.is_ok_or_success() && status != StatusCode::Error {
            // ACK/REPEAT_CMD/NOT_PROCESSED/MEASURING_DATA_CHANGED/RESERVED/CMD_NOT_AVAILABLE
            Vec::new()
        } else if status == StatusCode::Error {
            body_to_data_list(body_without_length, PAYLOAD_OFFSET, &error_schema())
        } else if is_raw_payload_command(cmd) {
            Vec::new()
        } else {
            let schema = schema_for(cmd, body_without_length, PAYLOAD_OFFSET);
            body_to_data_list(body_without_length, PAYLOAD_OFFSET, &schema)
        };

        let sum = u16::from_be_bytes([
            body_without_length[body_without_length.len() - 2],
            body_without_length[body_without_length.len() - 1],
        ]);
        let computed = (length as u32 + checksum(body_without_length) as u32) as u16;
        let invalid_checksum = computed != sum;

        Self {
            length,
            cmd,
            status,
            data,
            sum,
            invalid_checksum,
            raw_payload,
        }
    }

    pub fn length(&self) -> u16 {
        self.length
    }

    pub fn cmd(&self) -> CommandCode {
        self.cmd
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn data(&self) -> &DataList {
        &self.data
    }

    pub fn sum(&self) -> u16 {
        self.sum
    }

    pub fn invalid_checksum(&self) -> bool {
        self.invalid_checksum
    }

    /// The raw payload bytes, valid for any command (used directly by
    /// `GET_ONLINE_VALUE(_EV2)`/`GET_USER_DEFINED_VALUE`, which never get a
    /// `data()` schema expansion).
    pub fn raw_payload(&self) -> &[u8] {
        &self.raw_payload
    }

    pub fn get_u16(&self, index: usize) -> u16 {
        self.data.get(index).map(|v| v.value.as_u16()).unwrap_or_default()
    }

    pub fn get_string(&self, index: usize) -> String {
        self.data
            .get(index)
            .map(|v| v.value.as_string())
            .unwrap_or_default()
    }

    /// A copy with `data` cleared. Used by the dispatcher when a response's
    /// `cmd` does not match the telegram it is currently serving: the
    /// status-driven reaction still applies, but the mismatched payload is
    /// not handed to the caller.
    pub fn without_data(&self) -> Self {
        Self {
            data: Vec::new(),
            raw_payload: Vec::new(),
            ..self.clone()
        }
    }

    /// Reconstructs the error payload as `(code, text)` when `status` is
    /// `Error`; used by the dispatcher to build [`crate::ProtoError::Server`].
    pub fn error_payload(&self) -> Option<(u16, String)> {
        if self.status != StatusCode::Error {
            return None;
        }
        Some((self.get_u16(0), self.get_string(1)))
    }
}
