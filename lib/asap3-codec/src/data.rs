// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
//! The self-describing `DataValue`/`DataList` payload model.
use crate::cursor::Cursor;
use crate::primitive::*;

/// Closed enumeration of primitive wire kinds. Numeric codes match the
/// protocol exactly (see the crate's top-level docs); they are never
/// transmitted per-value, only used to select per-command schemas.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DataType {
    Float32,
    Float64,
    String,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    NoType,
}

impl DataType {
    pub fn code(self) -> u16 {
        match self {
            Self::Float32 => 0,
            Self::Float64 => 1,
            Self::String => 2,
            Self::Int16 => 3,
            Self::UInt16 => 4,
            Self::Int32 => 5,
            Self::UInt32 => 6,
            Self::Int64 => 7,
            Self::UInt64 => 8,
            Self::NoType => 0xFF,
        }
    }

    pub fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Float32,
            1 => Self::Float64,
            2 => Self::String,
            3 => Self::Int16,
            4 => Self::UInt16,
            5 => Self::Int32,
            6 => Self::UInt32,
            7 => Self::Int64,
            8 => Self::UInt64,
            _ => Self::NoType,
        }
    }
}

/// A dynamically-typed payload value. The variant always matches the
/// `DataType` of the enclosing `DataValue`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Float32(f32),
    Float64(f64),
    String(String),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    None,
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Float32(_) => DataType::Float32,
            Self::Float64(_) => DataType::Float64,
            Self::String(_) => DataType::String,
            Self::Int16(_) => DataType::Int16,
            Self::UInt16(_) => DataType::UInt16,
            Self::Int32(_) => DataType::Int32,
            Self::UInt32(_) => DataType::UInt32,
            Self::Int64(_) => DataType::Int64,
            Self::UInt64(_) => DataType::UInt64,
            Self::None => DataType::NoType,
        }
    }

    /// The zero/empty value for `data_type`, used to build response schemas
    /// before their actual contents are decoded from the wire.
    pub fn default_for(data_type: DataType) -> Self {
        match data_type {
            DataType::Float32 => Self::Float32(0.0),
            DataType::Float64 => Self::Float64(0.0),
            DataType::String => Self::String(String::new()),
            DataType::Int16 => Self::Int16(0),
            DataType::UInt16 => Self::UInt16(0),
            DataType::Int32 => Self::Int32(0),
            DataType::UInt32 => Self::UInt32(0),
            DataType::Int64 => Self::Int64(0),
            DataType::UInt64 => Self::UInt64(0),
            DataType::NoType => Self::None,
        }
    }

    fn wire_size(&self) -> usize {
        match self {
            Self::Float32(_) => 4,
            Self::Float64(_) => 8,
            Self::String(s) => string_wire_size(s),
            Self::Int16(_) | Self::UInt16(_) => 2,
            Self::Int32(_) | Self::UInt32(_) => 4,
            Self::Int64(_) | Self::UInt64(_) => 8,
            Self::None => 0,
        }
    }

    fn encode(&self, buf: &mut Vec<u8>) -> usize {
        match self {
            Self::Float32(v) => encode_f32(buf, *v),
            Self::Float64(v) => encode_f64(buf, *v),
            Self::String(s) => encode_string(buf, s),
            Self::Int16(v) => encode_i16(buf, *v),
            Self::UInt16(v) => encode_u16(buf, *v),
            Self::Int32(v) => encode_i32(buf, *v),
            Self::UInt32(v) => encode_u32(buf, *v),
            Self::Int64(v) => encode_i64(buf, *v),
            Self::UInt64(v) => encode_u64(buf, *v),
            Self::None => 0,
        }
    }

    fn decode(cur: &mut Cursor, data_type: DataType) -> Self {
        match data_type {
            DataType::Float32 => Self::Float32(decode_f32(cur)),
            DataType::Float64 => Self::Float64(decode_f64(cur)),
            DataType::String => Self::String(decode_string(cur)),
            DataType::Int16 => Self::Int16(decode_i16(cur)),
            DataType::UInt16 => Self::UInt16(decode_u16(cur)),
            DataType::Int32 => Self::Int32(decode_i32(cur)),
            DataType::UInt32 => Self::UInt32(decode_u32(cur)),
            DataType::Int64 => Self::Int64(decode_i64(cur)),
            DataType::UInt64 => Self::UInt64(decode_u64(cur)),
            DataType::NoType => Self::None,
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            Self::UInt16(v) => *v,
            Self::Int16(v) => *v as u16,
            Self::UInt32(v) => *v as u16,
            Self::Int32(v) => *v as u16,
            _ => 0,
        }
    }

    pub fn as_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            _ => String::new(),
        }
    }

    pub fn as_f32(&self) -> f32 {
        match self {
            Self::Float32(v) => *v,
            Self::Float64(v) => *v as f32,
            _ => 0.0,
        }
    }
}

/// `(name, type, value)` — `name` never appears on the wire, it exists for
/// logging and schema lookup. `value`'s variant always matches `data_type`.
#[derive(Clone, Debug, PartialEq)]
pub struct DataValue {
    pub name: String,
    pub data_type: DataType,
    pub value: Value,
}

impl DataValue {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        let data_type = value.data_type();
        Self {
            name: name.into(),
            data_type,
            value,
        }
    }

    /// An empty placeholder of the given type and name, used to build the
    /// schemas that drive `DataList::decode`.
    pub fn schema(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            value: Value::default_for(data_type),
        }
    }

    fn wire_size(&self) -> usize {
        self.value.wire_size()
    }
}

/// Ordered heterogeneous payload. On the wire only the `value`s appear, in
/// order; the schema (a `DataList` of the right types, usually built via
/// [`DataValue::schema`]) is shared implicitly by both peers per command.
pub type DataList = Vec<DataValue>;

/// Sum of the wire size of every entry. Fixes a bug present in the protocol
/// this crate is based on, which always counted string fields as exactly 2
/// bytes regardless of their actual padded length.
pub fn data_list_size(list: &DataList) -> usize {
    list.iter().map(DataValue::wire_size).sum()
}

/// Appends every value's wire encoding, in order, to `buf`.
pub fn data_list_to_body(list: &DataList, buf: &mut Vec<u8>) {
    for entry in list {
        entry.value.encode(buf);
    }
}

/// The number of wire bytes `data_type`'s next value needs, given what's
/// left in `cur`. For `String` this peeks the 2-byte length prefix (padded
/// to even); if even that prefix isn't fully present, 2 is reported so the
/// caller's remaining-length check still fails and treats the field as
/// absent, matching the original's `text_length` staying zero in that case.
fn needed_wire_size(cur: &Cursor, data_type: DataType) -> usize {
    match data_type {
        DataType::Float32 => 4,
        DataType::Float64 => 8,
        DataType::Int16 | DataType::UInt16 => 2,
        DataType::Int32 | DataType::UInt32 => 4,
        DataType::Int64 | DataType::UInt64 => 8,
        DataType::NoType => 0,
        DataType::String => match cur.peek(2) {
            Some(bytes) => {
                let len = u16::from_be_bytes([bytes[0], bytes[1]]) as usize + 2;
                if len % 2 == 1 { len + 1 } else { len }
            }
            None => 2,
        },
    }
}

/// Decodes `body[offset..]` into `schema`, producing a same-length `DataList`
/// with each entry's value replaced by what was read. A field that doesn't
/// fully fit in the remaining bytes stops the walk entirely: it and every
/// entry after it in `schema` keep their default (zero) value, matching the
/// protocol's "decoding halts silently" rule for the whole remaining schema,
/// not just the one straddling field.
pub fn body_to_data_list(body: &[u8], offset: usize, schema: &DataList) -> DataList {
    let mut cur = Cursor::new(&body[offset.min(body.len())..]);
    let mut out = Vec::with_capacity(schema.len());
    let mut truncated = false;

    for entry in schema {
        if !truncated && entry.data_type != DataType::NoType && cur.remaining() < needed_wire_size(&cur, entry.data_type) {
            truncated = true;
        }

        if truncated {
            out.push(entry.clone());
            continue;
        }

        let value = Value::decode(&mut cur, entry.data_type);
        out.push(DataValue {
            name: entry.name.clone(),
            data_type: entry.data_type,
            value,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_list_size_fixes_original_string_undercount() {
        // The original helper this is based on always counted a STRING field
        // as exactly 2 bytes. A real encoded "OLLE" field is 2 + 4 = 6.
        let list = vec![DataValue::new("Name", Value::String("OLLE".into()))];
        let original_buggy_size = 2usize; // what the source's helper would report
        assert_eq!(data_list_size(&list), 6);
        assert_ne!(data_list_size(&list), original_buggy_size);
    }

    #[test]
    fn round_trips_a_heterogeneous_list() {
        let schema = vec![
            DataValue::schema("Version", DataType::UInt16),
            DataValue::schema("Name", DataType::String),
        ];
        let list = vec![
            DataValue::new("Version", Value::UInt16(0x0300)),
            DataValue::new("Name", Value::String("OLLE".into())),
        ];
        let mut buf = Vec::new();
        data_list_to_body(&list, &mut buf);
        let decoded = body_to_data_list(&buf, 0, &schema);
        assert_eq!(decoded, list);
    }

    #[test]
    fn field_straddling_the_body_end_defaults_itself_and_everything_after() {
        let schema = vec![
            DataValue::schema("A", DataType::UInt16),
            DataValue::schema("B", DataType::UInt32),
            DataValue::schema("C", DataType::UInt16),
        ];
        // "A" fully fits (2 bytes). "B" needs 4 bytes but only 1 remains.
        let body = [0x00, 0x01, 0xFF];
        let decoded = body_to_data_list(&body, 0, &schema);
        assert_eq!(decoded[0].value, Value::UInt16(0x0001));
        assert_eq!(decoded[1].value, Value::UInt32(0));
        assert_eq!(decoded[2].value, Value::UInt16(0));
    }

    #[test]
    fn truncated_body_keeps_remaining_schema_defaults() {
        let schema = vec![
            DataValue::schema("Version", DataType::UInt16),
            DataValue::schema("Name", DataType::String),
        ];
        // Only the first two bytes (Version) are present.
        let body = [0x03, 0x00];
        let decoded = body_to_data_list(&body, 0, &schema);
        assert_eq!(decoded[0].value, Value::UInt16(0x0300));
        assert_eq!(decoded[1].value, Value::String(String::new()));
    }
}
