// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT

/// The full ASAP3 command set (`u16`, values preserved exactly from the
/// protocol). Most commands beyond the handful this client actively drives
/// (identity, service catalog, subscription, calibration-page query) still
/// round-trip through the codec and the default (empty) response schema.
///
/// `Unknown` catches any code this enum doesn't name, so decoding a response
/// never fails just because the server spoke a command this client doesn't
/// recognize.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CommandCode {
    RepeatRequest,
    Emergency,
    Init,
    SelectDescriptionFileAndBinaryFile,
    CopyBinaryFile,
    ChangeBinaryFile,
    SelectLookupTable,
    PutLookupTable,
    GetLookupTable,
    IncreaseLookupTable,
    ParameterForValueAcquisition,
    SwitchingOfflineOnline,
    GetParameter,
    SetParameter,
    SetGraphicMode,
    ResetDevice,
    SetFormat,
    GetOnlineValue,
    Identify,
    GetUserDefinedValue,
    GetUserDefinedValueList,
    DefineDescriptionFileAndBinaryFile,
    DefineRecorderParameters,
    DefineTriggerCondition,
    ActivateRecorder,
    GetRecorderStatus,
    GetRecorderResultHeader,
    GetRecorderResults,
    SaveRecorderFile,
    LoadRecorderFile,
    Exit,
    SetCaseSensitiveLabels,
    PutLookupTableEv2,
    GetLookupTableEv2,
    IncreaseLookupTableEv2,
    SelectLookupTableEv2,
    ParameterForValueAcquisitionEv2,
    GetParameterEv2,
    SetParameterEv2,
    GetOnlineValueEv2,
    GetRecorderResultsEv2,
    GetRecorderResultDataEv2,
    GetCalpageInfo,
    GetCurrentCalpage,
    GetMeasurementInfo,
    GetRasterOverview,
    GetCharacteristicInfo,
    ReadCharacteristic,
    ReadCellValues,
    WriteCharacteristic,
    WriteCellValues,
    SelectCharacteristic,
    QueryAvailableService,
    GetServiceInformation,
    ExecuteService,
    /// Any code not named above. Still encodes/decodes fine: the raw value
    /// is preserved exactly.
    Unknown(u16),
}

impl CommandCode {
    pub fn code(self) -> u16 {
        match self {
            Self::RepeatRequest => 0x00,
            Self::Emergency => 0x01,
            Self::Init => 0x02,
            Self::SelectDescriptionFileAndBinaryFile => 0x03,
            Self::CopyBinaryFile => 0x04,
            Self::ChangeBinaryFile => 0x05,
            Self::SelectLookupTable => 0x06,
            Self::PutLookupTable => 0x07,
            Self::GetLookupTable => 0x08,
            Self::IncreaseLookupTable => 0x0A,
            Self::ParameterForValueAcquisition => 0x0C,
            Self::SwitchingOfflineOnline => 0x0D,
            Self::GetParameter => 0x0E,
            Self::SetParameter => 0x0F,
            Self::SetGraphicMode => 0x10,
            Self::ResetDevice => 0x11,
            Self::SetFormat => 0x12,
            Self::GetOnlineValue => 0x13,
            Self::Identify => 0x14,
            Self::GetUserDefinedValue => 0x15,
            Self::GetUserDefinedValueList => 0x16,
            Self::DefineDescriptionFileAndBinaryFile => 0x1E,
            Self::DefineRecorderParameters => 0x29,
            Self::DefineTriggerCondition => 0x2A,
            Self::ActivateRecorder => 0x2B,
            Self::GetRecorderStatus => 0x2C,
            Self::GetRecorderResultHeader => 0x2D,
            Self::GetRecorderResults => 0x2E,
            Self::SaveRecorderFile => 0x2F,
            Self::LoadRecorderFile => 0x30,
            Self::Exit => 0x32,
            Self::SetCaseSensitiveLabels => 0x3D,
            Self::PutLookupTableEv2 => 0x6B,
            Self::GetLookupTableEv2 => 0x6D,
            Self::IncreaseLookupTableEv2 => 0x6E,
            Self::SelectLookupTableEv2 => 0x6F,
            Self::ParameterForValueAcquisitionEv2 => 0x70,
            Self::GetParameterEv2 => 0x72,
            Self::SetParameterEv2 => 0x73,
            Self::GetOnlineValueEv2 => 0x77,
            Self::GetRecorderResultsEv2 => 0x92,
            Self::GetRecorderResultDataEv2 => 0x95,
            Self::GetCalpageInfo => 0xA0,
            Self::GetCurrentCalpage => 0xA1,
            Self::GetMeasurementInfo => 0xA3,
            Self::GetRasterOverview => 0xA4,
            Self::GetCharacteristicInfo => 0xA5,
            Self::ReadCharacteristic => 0xA6,
            Self::ReadCellValues => 0xA7,
            Self::WriteCharacteristic => 0xA8,
            Self::WriteCellValues => 0xA9,
            Self::SelectCharacteristic => 0xAA,
            Self::QueryAvailableService => 0xC8,
            Self::GetServiceInformation => 0xC9,
            Self::ExecuteService => 0xCA,
            Self::Unknown(code) => code,
        }
    }

    pub fn from_code(code: u16) -> Self {
        match code {
            0x00 => Self::RepeatRequest,
            0x01 => Self::Emergency,
            0x02 => Self::Init,
            0x03 => Self::SelectDescriptionFileAndBinaryFile,
            0x04 => Self::CopyBinaryFile,
            0x05 => Self::ChangeBinaryFile,
            0x06 => Self::SelectLookupTable,
            0x07 => Self::PutLookupTable,
            0x08 => Self::GetLookupTable,
            0x0A => Self::IncreaseLookupTable,
            0x0C => Self::ParameterForValueAcquisition,
            0x0D => Self::SwitchingOfflineOnline,
            0x0E => Self::GetParameter,
            0x0F => Self::SetParameter,
            0x10 => Self::SetGraphicMode,
            0x11 => Self::ResetDevice,
            0x12 => Self::SetFormat,
            0x13 => Self::GetOnlineValue,
            0x14 => Self::Identify,
            0x15 => Self::GetUserDefinedValue,
            0x16 => Self::GetUserDefinedValueList,
            0x1E => Self::DefineDescriptionFileAndBinaryFile,
            0x29 => Self::DefineRecorderParameters,
            0x2A => Self::DefineTriggerCondition,
            0x2B => Self::ActivateRecorder,
            0x2C => Self::GetRecorderStatus,
            0x2D => Self::GetRecorderResultHeader,
            0x2E => Self::GetRecorderResults,
            0x2F => Self::SaveRecorderFile,
            0x30 => Self::LoadRecorderFile,
            0x32 => Self::Exit,
            0x3D => Self::SetCaseSensitiveLabels,
            0x6B => Self::PutLookupTableEv2,
            0x6D => Self::GetLookupTableEv2,
            0x6E => Self::IncreaseLookupTableEv2,
            0x6F => Self::SelectLookupTableEv2,
            0x70 => Self::ParameterForValueAcquisitionEv2,
            0x72 => Self::GetParameterEv2,
            0x73 => Self::SetParameterEv2,
            0x77 => Self::GetOnlineValueEv2,
            0x92 => Self::GetRecorderResultsEv2,
            0x95 => Self::GetRecorderResultDataEv2,
            0xA0 => Self::GetCalpageInfo,
            0xA1 => Self::GetCurrentCalpage,
            0xA3 => Self::GetMeasurementInfo,
            0xA4 => Self::GetRasterOverview,
            0xA5 => Self::GetCharacteristicInfo,
            0xA6 => Self::ReadCharacteristic,
            0xA7 => Self::ReadCellValues,
            0xA8 => Self::WriteCharacteristic,
            0xA9 => Self::WriteCellValues,
            0xAA => Self::SelectCharacteristic,
            0xC8 => Self::QueryAvailableService,
            0xC9 => Self::GetServiceInformation,
            0xCA => Self::ExecuteService,
            other => Self::Unknown(other),
        }
    }
}

/// The ASAP3 status set (`u16`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StatusCode {
    Ok,
    Success,
    NotProcessed,
    MeasuringDataChanged,
    Reserved,
    CmdNotAvailable,
    Ack,
    RepeatCmd,
    Error,
    Unknown(u16),
}

impl StatusCode {
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 0x0000,
            Self::Success => 0x1232,
            Self::NotProcessed => 0x2343,
            Self::MeasuringDataChanged => 0x2344,
            Self::Reserved => 0x3454,
            Self::CmdNotAvailable => 0x5656,
            Self::Ack => 0xAAAA,
            Self::RepeatCmd => 0xEEEE,
            Self::Error => 0xFFFF,
            Self::Unknown(code) => code,
        }
    }

    pub fn from_code(code: u16) -> Self {
        match code {
            0x0000 => Self::Ok,
            0x1232 => Self::Success,
            0x2343 => Self::NotProcessed,
            0x2344 => Self::MeasuringDataChanged,
            0x3454 => Self::Reserved,
            0x5656 => Self::CmdNotAvailable,
            0xAAAA => Self::Ack,
            0xEEEE => Self::RepeatCmd,
            0xFFFF => Self::Error,
            other => Self::Unknown(other),
        }
    }

    pub fn is_ok_or_success(self) -> bool {
        matches!(self, Self::Ok | Self::Success)
    }
}

/// Supplemental enums present in the original protocol header but not
/// currently dispatched on by this client; carried for API completeness.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ValueType {
    Value,
    Constant,
    Offset,
    Factor,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CharType {
    Value,
    Curve,
    Map,
    Cube3d,
    Cube4d,
    Cube5d,
    ValueBlock1d,
    ValueBlock2d,
    ValueBlock3d,
    ValueBlock4d,
    ValueBlock5d,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_codes_match_the_protocol_table() {
        assert_eq!(CommandCode::Init.code(), 0x02);
        assert_eq!(CommandCode::Identify.code(), 0x14);
        assert_eq!(CommandCode::Exit.code(), 0x32);
        assert_eq!(CommandCode::QueryAvailableService.code(), 0xC8);
        assert_eq!(CommandCode::ExecuteService.code(), 0xCA);
        assert_eq!(CommandCode::GetOnlineValueEv2.code(), 0x77);
        assert_eq!(
            CommandCode::ParameterForValueAcquisitionEv2.code(),
            0x70
        );
    }

    #[test]
    fn unknown_command_round_trips_its_raw_code() {
        assert_eq!(CommandCode::from_code(0x4242).code(), 0x4242);
    }

    #[test]
    fn status_codes_match_the_protocol_table() {
        assert_eq!(StatusCode::Ok.code(), 0x0000);
        assert_eq!(StatusCode::Success.code(), 0x1232);
        assert_eq!(StatusCode::NotProcessed.code(), 0x2343);
        assert_eq!(StatusCode::Ack.code(), 0xAAAA);
        assert_eq!(StatusCode::RepeatCmd.code(), 0xEEEE);
        assert_eq!(StatusCode::Error.code(), 0xFFFF);
        assert!(StatusCode::Success.is_ok_or_success());
        assert!(!StatusCode::Ack.is_ok_or_success());
    }
}
