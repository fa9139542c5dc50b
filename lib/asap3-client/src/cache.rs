// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use asap3_codec::{body_to_data_list, decode_string, decode_u16, Cursor, DataList, DataValue, Value};

/// Online-value, output-value and user-defined-value caches, keyed by
/// position rather than name — [`crate::Parameter::value_index`] is the
/// lookup key into the matching list.
#[derive(Clone, Debug, Default)]
pub struct ValueCache {
    pub online_values: DataList,
    pub output_values: DataList,
    pub user_defined: DataList,
}

impl ValueCache {
    pub fn set_online_data(&mut self, body: &[u8], offset: usize, schema: &DataList) {
        self.online_values = body_to_data_list(body, offset, schema);
    }

    pub fn set_output_data(&mut self, body: &[u8], offset: usize, schema: &DataList) {
        self.output_values = body_to_data_list(body, offset, schema);
    }

    /// `[count:u16]` then `count` records of `[lun:u16, name:string]` — the
    /// LUN is read to advance the cursor and then discarded, matching the
    /// original. The resulting schema keeps the leading `Values` count
    /// entry (as `UInt16`) ahead of one `Float32(NaN)` placeholder per
    /// name, since `GET_USER_DEFINED_VALUE`'s raw payload is later decoded
    /// against this exact list via [`ValueCache::set_user_defined_data`].
    pub fn define_user_defined_data(&mut self, body: &[u8], offset: usize) {
        let mut cur = Cursor::new(&body[offset.min(body.len())..]);
        let count = decode_u16(&mut cur);
        let mut list = Vec::with_capacity(count as usize + 1);
        list.push(DataValue::new("Values", Value::UInt16(count)));
        for _ in 0..count {
            let _lun = decode_u16(&mut cur);
            let name = decode_string(&mut cur);
            list.push(DataValue::new(name, Value::Float32(f32::NAN)));
        }
        self.user_defined = list;
    }

    pub fn set_user_defined_data(&mut self, body: &[u8], offset: usize, schema: &DataList) {
        self.user_defined = body_to_data_list(body, offset, schema);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asap3_codec::{encode_string, encode_u16};

    #[test]
    fn define_user_defined_data_discards_the_lun_and_seeds_nan() {
        let mut body = Vec::new();
        encode_u16(&mut body, 2);
        encode_u16(&mut body, 0x10);
        encode_string(&mut body, "Rpm");
        encode_u16(&mut body, 0x11);
        encode_string(&mut body, "Torque");

        let mut cache = ValueCache::default();
        cache.define_user_defined_data(&body, 0);

        assert_eq!(cache.user_defined.len(), 3);
        assert_eq!(cache.user_defined[0].name, "Values");
        assert_eq!(cache.user_defined[0].value, Value::UInt16(2));
        assert_eq!(cache.user_defined[1].name, "Rpm");
        assert!(matches!(cache.user_defined[1].value, Value::Float32(v) if v.is_nan()));
        assert_eq!(cache.user_defined[2].name, "Torque");
    }
}
