//! NAL unit header and byte stream framing.
//!
//! ## Header Layout
//!
//! One byte, MSB first:
//!
//! | bits | element              |
//! |------|----------------------|
//! | 1    | `forbidden_zero_bit` |
//! | 2    | `nal_ref_idc`        |
//! | 5    | `nal_unit_type`      |
//!
//! ## Start Codes
//!
//! Annex B byte streams prefix each unit with `00 00 01`. Parameter sets and
//! the first unit of an access unit conventionally use the four-byte form
//! `00 00 00 01` (a `zero_byte` followed by the three-byte prefix).

use std::fmt;

use anyhow::{Result, bail};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::structs::field::FieldCode;
use crate::utils::errors::ParameterSetError;

pub const START_CODE_PREFIX: [u8; 3] = [0x00, 0x00, 0x01];
pub const START_CODE_PREFIX_LONG: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// `nal_unit_type` codes from Table 7-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NalUnitType {
    Unspecified = 0,
    SliceNonIdr = 1,
    SliceDataPartitionA = 2,
    SliceDataPartitionB = 3,
    SliceDataPartitionC = 4,
    SliceIdr = 5,
    Sei = 6,
    Sps = 7,
    Pps = 8,
    AccessUnitDelimiter = 9,
    EndOfSequence = 10,
    EndOfStream = 11,
    FillerData = 12,
    SpsExtension = 13,
    PrefixNalUnit = 14,
    SubsetSps = 15,
    DepthParameterSet = 16,
    Reserved17 = 17,
    Reserved18 = 18,
    SliceAuxiliary = 19,
    SliceExtension = 20,
    SliceExtensionDepthView = 21,
    Reserved22 = 22,
    Reserved23 = 23,
    Unspecified24 = 24,
    Unspecified25 = 25,
    Unspecified26 = 26,
    Unspecified27 = 27,
    Unspecified28 = 28,
    Unspecified29 = 29,
    Unspecified30 = 30,
    Unspecified31 = 31,
}

impl NalUnitType {
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Units that must not carry `nal_ref_idc == 0`.
    pub const fn requires_reference(self) -> bool {
        matches!(
            self,
            Self::Sps | Self::Pps | Self::SpsExtension | Self::SubsetSps | Self::SliceIdr
        )
    }
}

impl TryFrom<u8> for NalUnitType {
    type Error = anyhow::Error;

    fn try_from(code: u8) -> Result<Self> {
        use NalUnitType::*;

        Ok(match code {
            0 => Unspecified,
            1 => SliceNonIdr,
            2 => SliceDataPartitionA,
            3 => SliceDataPartitionB,
            4 => SliceDataPartitionC,
            5 => SliceIdr,
            6 => Sei,
            7 => Sps,
            8 => Pps,
            9 => AccessUnitDelimiter,
            10 => EndOfSequence,
            11 => EndOfStream,
            12 => FillerData,
            13 => SpsExtension,
            14 => PrefixNalUnit,
            15 => SubsetSps,
            16 => DepthParameterSet,
            17 => Reserved17,
            18 => Reserved18,
            19 => SliceAuxiliary,
            20 => SliceExtension,
            21 => SliceExtensionDepthView,
            22 => Reserved22,
            23 => Reserved23,
            24 => Unspecified24,
            25 => Unspecified25,
            26 => Unspecified26,
            27 => Unspecified27,
            28 => Unspecified28,
            29 => Unspecified29,
            30 => Unspecified30,
            31 => Unspecified31,
            _ => bail!(ParameterSetError::InvalidFieldValue {
                field: "nal_unit_type",
                value: code as i64,
                reason: "must fit in 5 bits",
            }),
        })
    }
}

impl fmt::Display for NalUnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SliceNonIdr => "coded slice (non-IDR)",
            Self::SliceDataPartitionA => "slice data partition A",
            Self::SliceDataPartitionB => "slice data partition B",
            Self::SliceDataPartitionC => "slice data partition C",
            Self::SliceIdr => "coded slice (IDR)",
            Self::Sei => "SEI",
            Self::Sps => "SPS",
            Self::Pps => "PPS",
            Self::AccessUnitDelimiter => "access unit delimiter",
            Self::EndOfSequence => "end of sequence",
            Self::EndOfStream => "end of stream",
            Self::FillerData => "filler data",
            Self::SpsExtension => "SPS extension",
            Self::PrefixNalUnit => "prefix NAL unit",
            Self::SubsetSps => "subset SPS",
            Self::DepthParameterSet => "depth parameter set",
            Self::SliceAuxiliary => "auxiliary coded slice",
            Self::SliceExtension => "coded slice extension",
            Self::SliceExtensionDepthView => "coded slice extension (depth view)",
            Self::Reserved17 | Self::Reserved18 => "reserved",
            Self::Reserved22 | Self::Reserved23 => "reserved",
            _ => "unspecified",
        };

        write!(f, "{name} ({})", self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StartCode {
    /// `00 00 01`
    Short,
    /// `00 00 00 01`
    #[default]
    Long,
}

impl StartCode {
    pub const fn bytes(self) -> &'static [u8] {
        match self {
            Self::Short => &START_CODE_PREFIX,
            Self::Long => &START_CODE_PREFIX_LONG,
        }
    }
}

/// Framing settings shared by every NAL unit a builder emits.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NalConfig {
    pub nal_ref_idc: u8,
    pub start_code: StartCode,
    /// Insert `0x03` bytes so the payload never imitates a start code.
    pub emulation_prevention: bool,
}

impl Default for NalConfig {
    fn default() -> Self {
        Self {
            nal_ref_idc: 3,
            start_code: StartCode::Long,
            emulation_prevention: false,
        }
    }
}

/// `nal_unit( )` header, clause 7.3.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NalHeader {
    forbidden_zero_bit: bool,
    nal_ref_idc: u8,
    nal_unit_type: NalUnitType,
}

impl NalHeader {
    pub fn new(nal_ref_idc: u8, nal_unit_type: NalUnitType) -> Result<Self> {
        if nal_ref_idc > 3 {
            bail!(ParameterSetError::InvalidFieldValue {
                field: "nal_ref_idc",
                value: nal_ref_idc as i64,
                reason: "must fit in 2 bits",
            });
        }

        Ok(Self {
            forbidden_zero_bit: false,
            nal_ref_idc,
            nal_unit_type,
        })
    }

    pub fn nal_ref_idc(&self) -> u8 {
        self.nal_ref_idc
    }

    pub fn nal_unit_type(&self) -> NalUnitType {
        self.nal_unit_type
    }

    pub fn to_byte(&self) -> u8 {
        let forbidden = (self.forbidden_zero_bit as u8) << 7;
        forbidden | (self.nal_ref_idc << 5) | self.nal_unit_type.code()
    }

    pub fn fields(&self) -> [(&'static str, FieldCode); 3] {
        let nal_ref_idc = self.nal_ref_idc as u32;
        let nal_unit_type = self.nal_unit_type.code() as u32;

        [
            ("forbidden_zero_bit", FieldCode::flag(self.forbidden_zero_bit)),
            ("nal_ref_idc", FieldCode::u(2, nal_ref_idc)),
            ("nal_unit_type", FieldCode::u(5, nal_unit_type)),
        ]
    }
}
