// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use asap3_codec::DataType;

/// A single subscribable measurement or calibration point. `set_point`
/// distinguishes calibration (written-to) parameters from measurement
/// (read-only) ones; each kind gets its own cache and its own index space.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub unit: String,
    /// Test equipment reference.
    pub device: String,
    /// Signal or channel name.
    pub signal: String,
    pub identity: String,
    pub data_type: DataType,
    pub max: f64,
    pub min: f64,
    pub set_point: bool,
    pub nof_decimals: u8,
    /// Cycle time in milliseconds.
    pub cycle_time: i32,
    pub lun: u16,
    /// Forced to `true` by [`crate::Client::set_parameter_list`] regardless
    /// of what the caller passed in, matching the original setter.
    pub exist: bool,
    /// Position of this parameter's value within its cache
    /// (`output_values` if `set_point`, else `online_values`). Assigned by
    /// [`crate::Client::start_subscription`].
    pub value_index: usize,
}

impl Parameter {
    pub fn new(name: impl Into<String>, data_type: DataType, set_point: bool) -> Self {
        Self {
            name: name.into(),
            display_name: String::new(),
            description: String::new(),
            unit: String::new(),
            device: String::new(),
            signal: String::new(),
            identity: String::new(),
            data_type,
            max: 0.0,
            min: 0.0,
            set_point,
            nof_decimals: 2,
            cycle_time: 0,
            lun: 0,
            exist: true,
            value_index: 0,
        }
    }
}

pub type ParameterList = Vec<Parameter>;
