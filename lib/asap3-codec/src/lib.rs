// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT

//! Big-endian wire codec for the ASAP3 measurement-and-calibration
//! protocol's self-describing "data list" payloads.
//!
//! Every integer and float on the wire is big-endian. Strings are
//! length-prefixed and padded to an even total field size. A `DataList` is
//! an ordered, heterogeneous sequence of named, typed values whose layout
//! (the "schema") is negotiated implicitly per command rather than
//! transmitted.

mod checksum;
mod cursor;
mod data;
mod primitive;

pub use checksum::checksum;
pub use cursor::Cursor;
pub use data::{data_list_size, data_list_to_body, body_to_data_list, DataList, DataType, DataValue, Value};
pub use primitive::*;
