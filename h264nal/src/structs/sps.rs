//! Sequence parameter set, `seq_parameter_set_rbsp( )` (clause 7.3.2.1).
//!
//! ## Supported Subset
//!
//! - Frame coding only (`frame_mbs_only_flag = 1`)
//! - `pic_order_cnt_type` 0 and 2
//! - High-family chroma/bit-depth header without scaling matrices
//! - No frame cropping, no VUI
//!
//! Anything outside the subset is rejected at export with
//! [`ParameterSetError::UnsupportedFeature`].

use anyhow::{Result, anyhow, bail};
use log::Level::Warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::log_or_err;
use crate::process::export::WriteRbsp;
use crate::process::write::NalUnitWriter;
use crate::structs::nal_header::{NalConfig, NalUnitType};
use crate::structs::{MB_SIZE, check_range, mbs_minus1};
use crate::utils::errors::{ConformanceWarning, ParameterSetError};

pub const PROFILE_BASELINE: u8 = 66;
pub const PROFILE_MAIN: u8 = 77;
pub const PROFILE_EXTENDED: u8 = 88;
pub const PROFILE_HIGH: u8 = 100;

/// Profiles whose SPS carries `chroma_format_idc` and the bit depth fields.
pub const HIGH_FAMILY_PROFILES: [u8; 13] =
    [100, 110, 122, 244, 44, 83, 86, 118, 128, 138, 139, 134, 135];

pub const KNOWN_PROFILES: [u8; 16] = [
    66, 77, 88, 100, 110, 122, 244, 44, 83, 86, 118, 128, 138, 139, 134, 135,
];

/// `level_idc` values listed in Table A-1 (9 is level 1b in High profiles).
pub const KNOWN_LEVELS: [u8; 20] = [
    9, 10, 11, 12, 13, 20, 21, 22, 30, 31, 32, 40, 41, 42, 50, 51, 52, 60, 61, 62,
];

const SEPARATE_PLANES_WITHOUT_444: ParameterSetError = ParameterSetError::InvalidFieldValue {
    field: "separate_colour_plane_flag",
    value: 1,
    reason: "requires chroma_format_idc 3",
};

/// Field values for a [`SeqParameterSet`].
///
/// Picture dimensions are given in luma samples and converted to macroblock
/// counts when written.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpsConfig {
    pub profile_idc: u8,
    pub constraint_set0_flag: bool,
    pub constraint_set1_flag: bool,
    pub constraint_set2_flag: bool,
    pub level_idc: u8,
    pub seq_parameter_set_id: u32,

    pub chroma_format_idc: u32,
    pub separate_colour_plane_flag: bool,
    pub bit_depth_luma_minus8: u32,
    pub bit_depth_chroma_minus8: u32,
    pub qpprime_y_zero_transform_bypass_flag: bool,
    pub seq_scaling_matrix_present_flag: bool,

    pub log2_max_frame_num_minus4: u32,
    pub pic_order_cnt_type: u32,
    pub log2_max_pic_order_cnt_lsb_minus4: u32,
    pub num_ref_frames: u32,
    pub gaps_in_frame_num_value_allowed_flag: bool,
    pub width: u32,
    pub height: u32,
    pub frame_mbs_only_flag: bool,
    pub direct_8x8_inference_flag: bool,
    pub frame_cropping_flag: bool,
    pub vui_parameters_present_flag: bool,
}

impl Default for SpsConfig {
    fn default() -> Self {
        Self {
            profile_idc: PROFILE_HIGH,
            constraint_set0_flag: false,
            constraint_set1_flag: false,
            constraint_set2_flag: false,
            level_idc: 10,
            seq_parameter_set_id: 0,

            chroma_format_idc: 1,
            separate_colour_plane_flag: false,
            bit_depth_luma_minus8: 0,
            bit_depth_chroma_minus8: 0,
            qpprime_y_zero_transform_bypass_flag: false,
            seq_scaling_matrix_present_flag: false,

            log2_max_frame_num_minus4: 0,
            pic_order_cnt_type: 0,
            log2_max_pic_order_cnt_lsb_minus4: 0,
            num_ref_frames: 0,
            gaps_in_frame_num_value_allowed_flag: false,
            width: MB_SIZE,
            height: MB_SIZE,
            frame_mbs_only_flag: true,
            direct_8x8_inference_flag: false,
            frame_cropping_flag: false,
            vui_parameters_present_flag: false,
        }
    }
}

impl SpsConfig {
    /// Checks every value against its legal range.
    pub fn check(&self) -> Result<()> {
        check_range(
            "seq_parameter_set_id",
            self.seq_parameter_set_id,
            0..=31,
            "expected 0..=31",
        )?;
        check_range(
            "chroma_format_idc",
            self.chroma_format_idc,
            0..=3,
            "expected 0..=3",
        )?;
        check_range(
            "bit_depth_luma_minus8",
            self.bit_depth_luma_minus8,
            0..=6,
            "expected 0..=6",
        )?;
        check_range(
            "bit_depth_chroma_minus8",
            self.bit_depth_chroma_minus8,
            0..=6,
            "expected 0..=6",
        )?;
        check_range(
            "log2_max_frame_num_minus4",
            self.log2_max_frame_num_minus4,
            0..=12,
            "expected 0..=12",
        )?;
        check_range(
            "pic_order_cnt_type",
            self.pic_order_cnt_type,
            0..=2,
            "expected 0..=2",
        )?;
        check_range(
            "log2_max_pic_order_cnt_lsb_minus4",
            self.log2_max_pic_order_cnt_lsb_minus4,
            0..=12,
            "expected 0..=12",
        )?;
        check_range(
            "num_ref_frames",
            self.num_ref_frames,
            0..=16,
            "expected 0..=16",
        )?;
        mbs_minus1("pic_width_in_mbs_minus1", self.width)?;
        mbs_minus1("pic_height_in_map_units_minus1", self.height)?;

        if self.separate_colour_plane_flag && self.chroma_format_idc != 3 {
            bail!(SEPARATE_PLANES_WITHOUT_444);
        }

        Ok(())
    }
}

/// Sequence parameter set builder.
///
/// Setters may be called in any order; [`WriteRbsp::export`] writes the
/// fields in syntax table order. A rejected setter leaves the previous
/// value in place.
///
/// # Example
///
/// ```rust
/// use h264nal::process::EXAMPLE_SPS;
/// use h264nal::process::export::WriteRbsp;
/// use h264nal::structs::sps::SeqParameterSet;
///
/// let mut sps = SeqParameterSet::default();
/// sps.set_profile_idc(66);
/// sps.set_level(3)?;
/// sps.set_seq_parameter_set_id(0)?;
/// sps.set_num_ref_frames(10)?;
/// sps.set_pic_width_in_mbs_minus_1(512)?;
/// sps.set_pic_height_in_map_units_minus_1(512)?;
/// sps.set_direct_8x8_inference_flag(true);
///
/// let mut out = Vec::new();
/// sps.export(&mut out)?;
/// assert_eq!(out, EXAMPLE_SPS);
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SeqParameterSet {
    nal: NalConfig,
    fields: SpsConfig,
    pub fail_level: log::Level,
}

impl Default for SeqParameterSet {
    fn default() -> Self {
        Self {
            nal: NalConfig::default(),
            fields: SpsConfig::default(),
            fail_level: log::Level::Error,
        }
    }
}

impl SeqParameterSet {
    pub fn with_config(nal: NalConfig, fields: SpsConfig) -> Result<Self> {
        fields.check()?;

        Ok(Self {
            nal,
            fields,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &SpsConfig {
        &self.fields
    }

    /// Sets the failure level for conformance warnings.
    ///
    /// - `log::Level::Error`: warnings are only logged (default)
    /// - `log::Level::Warn`: warnings abort the export (strict mode)
    pub fn set_fail_level(&mut self, level: log::Level) {
        self.fail_level = level;
    }

    pub fn set_profile_idc(&mut self, profile_idc: u8) {
        self.fields.profile_idc = profile_idc;
    }

    pub fn set_constraint_set_flags(&mut self, set0: bool, set1: bool, set2: bool) {
        self.fields.constraint_set0_flag = set0;
        self.fields.constraint_set1_flag = set1;
        self.fields.constraint_set2_flag = set2;
    }

    /// Sets `level_idc` to `level_number * 10`.
    pub fn set_level(&mut self, level_number: u8) -> Result<()> {
        check_range(
            "level_number",
            level_number,
            1..=25,
            "level_idc = level_number * 10 must be 10..=250",
        )?;
        self.fields.level_idc = level_number * 10;
        Ok(())
    }

    /// Sets `level_idc` directly, e.g. 31 for level 3.1.
    pub fn set_level_idc(&mut self, level_idc: u8) {
        self.fields.level_idc = level_idc;
    }

    pub fn set_seq_parameter_set_id(&mut self, id: u32) -> Result<()> {
        check_range("seq_parameter_set_id", id, 0..=31, "expected 0..=31")?;
        self.fields.seq_parameter_set_id = id;
        Ok(())
    }

    pub fn set_chroma_format_idc(&mut self, chroma_format_idc: u32) -> Result<()> {
        check_range(
            "chroma_format_idc",
            chroma_format_idc,
            0..=3,
            "expected 0..=3",
        )?;
        if chroma_format_idc != 3 && self.fields.separate_colour_plane_flag {
            bail!(SEPARATE_PLANES_WITHOUT_444);
        }
        self.fields.chroma_format_idc = chroma_format_idc;
        Ok(())
    }

    /// Only legal with 4:4:4 sampling (`chroma_format_idc == 3`).
    pub fn set_separate_colour_plane_flag(&mut self, value: bool) -> Result<()> {
        if value && self.fields.chroma_format_idc != 3 {
            bail!(SEPARATE_PLANES_WITHOUT_444);
        }
        self.fields.separate_colour_plane_flag = value;
        Ok(())
    }

    pub fn set_bit_depth_minus8(&mut self, luma: u32, chroma: u32) -> Result<()> {
        check_range("bit_depth_luma_minus8", luma, 0..=6, "expected 0..=6")?;
        check_range("bit_depth_chroma_minus8", chroma, 0..=6, "expected 0..=6")?;
        self.fields.bit_depth_luma_minus8 = luma;
        self.fields.bit_depth_chroma_minus8 = chroma;
        Ok(())
    }

    pub fn set_log2_max_frame_num_minus4(&mut self, value: u32) -> Result<()> {
        check_range(
            "log2_max_frame_num_minus4",
            value,
            0..=12,
            "expected 0..=12",
        )?;
        self.fields.log2_max_frame_num_minus4 = value;
        Ok(())
    }

    /// Type 1 is accepted here but cannot be exported.
    pub fn set_pic_order_cnt_type(&mut self, value: u32) -> Result<()> {
        check_range("pic_order_cnt_type", value, 0..=2, "expected 0..=2")?;
        self.fields.pic_order_cnt_type = value;
        Ok(())
    }

    /// Only written when `pic_order_cnt_type == 0`.
    pub fn set_log2_max_pic_order_cnt_lsb_minus4(&mut self, value: u32) -> Result<()> {
        check_range(
            "log2_max_pic_order_cnt_lsb_minus4",
            value,
            0..=12,
            "expected 0..=12",
        )?;
        self.fields.log2_max_pic_order_cnt_lsb_minus4 = value;
        Ok(())
    }

    pub fn set_num_ref_frames(&mut self, value: u32) -> Result<()> {
        check_range("num_ref_frames", value, 0..=16, "expected 0..=16")?;
        self.fields.num_ref_frames = value;
        Ok(())
    }

    pub fn set_gaps_in_frame_num_value_allowed_flag(&mut self, value: bool) {
        self.fields.gaps_in_frame_num_value_allowed_flag = value;
    }

    /// Sets the picture width from a luma sample count (multiple of 16).
    pub fn set_pic_width_in_mbs_minus_1(&mut self, pixel_width: u32) -> Result<()> {
        mbs_minus1("pic_width_in_mbs_minus1", pixel_width)?;
        self.fields.width = pixel_width;
        Ok(())
    }

    /// Sets the picture height from a luma sample count (multiple of 16).
    pub fn set_pic_height_in_map_units_minus_1(&mut self, pixel_height: u32) -> Result<()> {
        mbs_minus1("pic_height_in_map_units_minus1", pixel_height)?;
        self.fields.height = pixel_height;
        Ok(())
    }

    pub fn set_frame_mbs_only_flag(&mut self, value: bool) {
        self.fields.frame_mbs_only_flag = value;
    }

    pub fn set_direct_8x8_inference_flag(&mut self, value: bool) {
        self.fields.direct_8x8_inference_flag = value;
    }

    pub fn set_frame_cropping_flag(&mut self, value: bool) {
        self.fields.frame_cropping_flag = value;
    }

    pub fn set_vui_parameters_present_flag(&mut self, value: bool) {
        self.fields.vui_parameters_present_flag = value;
    }

    pub fn pic_width_in_mbs_minus1(&self) -> u32 {
        self.fields.width / MB_SIZE - 1
    }

    pub fn pic_height_in_map_units_minus1(&self) -> u32 {
        self.fields.height / MB_SIZE - 1
    }

    pub fn is_high_family(&self) -> bool {
        HIGH_FAMILY_PROFILES.contains(&self.fields.profile_idc)
    }
}

impl WriteRbsp for SeqParameterSet {
    fn nal_unit_type(&self) -> NalUnitType {
        NalUnitType::Sps
    }

    fn nal_config(&self) -> &NalConfig {
        &self.nal
    }

    fn fail_level(&self) -> log::Level {
        self.fail_level
    }

    fn validate(&self) -> Result<()> {
        let f = &self.fields;

        if f.pic_order_cnt_type == 1 {
            bail!(ParameterSetError::UnsupportedFeature(
                "pic_order_cnt_type 1 (reference frame offset cycle)"
            ));
        }

        if !f.frame_mbs_only_flag {
            bail!(ParameterSetError::UnsupportedFeature(
                "field coding (frame_mbs_only_flag = 0, mb_adaptive_frame_field_flag)"
            ));
        }

        if f.frame_cropping_flag {
            bail!(ParameterSetError::UnsupportedFeature(
                "frame cropping offsets"
            ));
        }

        if f.vui_parameters_present_flag {
            bail!(ParameterSetError::UnsupportedFeature("VUI parameters"));
        }

        if self.is_high_family() && f.seq_scaling_matrix_present_flag {
            bail!(ParameterSetError::UnsupportedFeature(
                "sequence scaling matrices"
            ));
        }

        if !KNOWN_PROFILES.contains(&f.profile_idc) {
            log_or_err!(
                self,
                Warn,
                anyhow!(ConformanceWarning::UnknownProfile(f.profile_idc))
            );
        }

        if !KNOWN_LEVELS.contains(&f.level_idc) {
            log_or_err!(
                self,
                Warn,
                anyhow!(ConformanceWarning::UnknownLevel(f.level_idc))
            );
        }

        Ok(())
    }

    fn write_rbsp(&self, writer: &mut NalUnitWriter) -> Result<()> {
        let f = &self.fields;

        writer.append_u("profile_idc", 8, f.profile_idc as u32)?;
        writer.append_flag("constraint_set0_flag", f.constraint_set0_flag)?;
        writer.append_flag("constraint_set1_flag", f.constraint_set1_flag)?;
        writer.append_flag("constraint_set2_flag", f.constraint_set2_flag)?;
        writer.append_u("reserved_zero_5bits", 5, 0)?;
        writer.append_u("level_idc", 8, f.level_idc as u32)?;
        writer.append_ue("seq_parameter_set_id", f.seq_parameter_set_id)?;

        if self.is_high_family() {
            writer.append_ue("chroma_format_idc", f.chroma_format_idc)?;
            if f.chroma_format_idc == 3 {
                writer.append_flag("separate_colour_plane_flag", f.separate_colour_plane_flag)?;
            }
            writer.append_ue("bit_depth_luma_minus8", f.bit_depth_luma_minus8)?;
            writer.append_ue("bit_depth_chroma_minus8", f.bit_depth_chroma_minus8)?;
            writer.append_flag(
                "qpprime_y_zero_transform_bypass_flag",
                f.qpprime_y_zero_transform_bypass_flag,
            )?;
            writer.append_flag(
                "seq_scaling_matrix_present_flag",
                f.seq_scaling_matrix_present_flag,
            )?;
        }

        writer.append_ue("log2_max_frame_num_minus4", f.log2_max_frame_num_minus4)?;
        writer.append_ue("pic_order_cnt_type", f.pic_order_cnt_type)?;

        match f.pic_order_cnt_type {
            0 => writer.append_ue(
                "log2_max_pic_order_cnt_lsb_minus4",
                f.log2_max_pic_order_cnt_lsb_minus4,
            )?,
            1 => bail!(ParameterSetError::UnsupportedFeature(
                "pic_order_cnt_type 1 (reference frame offset cycle)"
            )),
            _ => {}
        }

        writer.append_ue("num_ref_frames", f.num_ref_frames)?;
        writer.append_flag(
            "gaps_in_frame_num_value_allowed_flag",
            f.gaps_in_frame_num_value_allowed_flag,
        )?;
        writer.append_ue("pic_width_in_mbs_minus1", self.pic_width_in_mbs_minus1())?;
        writer.append_ue(
            "pic_height_in_map_units_minus1",
            self.pic_height_in_map_units_minus1(),
        )?;
        writer.append_flag("frame_mbs_only_flag", f.frame_mbs_only_flag)?;
        writer.append_flag("direct_8x8_inference_flag", f.direct_8x8_inference_flag)?;
        writer.append_flag("frame_cropping_flag", f.frame_cropping_flag)?;
        writer.append_flag("vui_parameters_present_flag", f.vui_parameters_present_flag)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::EXAMPLE_SPS;
    use crate::utils::bitstream_io::test_reader::ExpGolombReader;

    fn baseline_512() -> SeqParameterSet {
        let mut sps = SeqParameterSet::default();
        sps.set_profile_idc(PROFILE_BASELINE);
        sps.set_level(3).unwrap();
        sps.set_seq_parameter_set_id(0).unwrap();
        sps.set_log2_max_frame_num_minus4(0).unwrap();
        sps.set_pic_order_cnt_type(0).unwrap();
        sps.set_num_ref_frames(10).unwrap();
        sps.set_gaps_in_frame_num_value_allowed_flag(false);
        sps.set_pic_width_in_mbs_minus_1(512).unwrap();
        sps.set_pic_height_in_map_units_minus_1(512).unwrap();
        sps.set_frame_mbs_only_flag(true);
        sps.set_direct_8x8_inference_flag(true);
        sps.set_frame_cropping_flag(false);
        sps.set_vui_parameters_present_flag(false);
        sps
    }

    fn unsupported(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<ParameterSetError>(),
            Some(ParameterSetError::UnsupportedFeature(_))
        )
    }

    #[test]
    fn baseline_sps_bytes() -> Result<()> {
        let sps = baseline_512();
        assert_eq!(sps.pic_width_in_mbs_minus1(), 31);
        assert_eq!(sps.pic_height_in_map_units_minus1(), 31);

        let mut out = Vec::new();
        sps.export(&mut out)?;

        assert_eq!(&out[..5], &[0x00, 0x00, 0x00, 0x01, 0x67]);
        assert_eq!(out, EXAMPLE_SPS);
        Ok(())
    }

    #[test]
    fn export_is_repeatable() -> Result<()> {
        let sps = baseline_512();

        let mut first = Vec::new();
        let mut second = Vec::new();
        sps.export(&mut first)?;
        sps.export(&mut second)?;

        assert_eq!(first, second);
        assert_eq!(baseline_512().to_bytes()?, first);
        Ok(())
    }

    #[test]
    fn setter_order_does_not_matter() -> Result<()> {
        let mut sps = SeqParameterSet::default();
        sps.set_direct_8x8_inference_flag(true);
        sps.set_pic_height_in_map_units_minus_1(512)?;
        sps.set_num_ref_frames(10)?;
        sps.set_pic_width_in_mbs_minus_1(512)?;
        sps.set_level(3)?;
        sps.set_profile_idc(PROFILE_BASELINE);

        assert_eq!(sps.to_bytes()?, EXAMPLE_SPS);
        Ok(())
    }

    #[test]
    fn fields_decode_in_order() -> Result<()> {
        let mut sps = baseline_512();
        sps.set_pic_order_cnt_type(2)?;
        sps.set_log2_max_frame_num_minus4(4)?;
        sps.set_seq_parameter_set_id(7)?;
        sps.set_pic_width_in_mbs_minus_1(1920)?;
        sps.set_pic_height_in_map_units_minus_1(1088)?;

        let bytes = sps.to_bytes()?;
        let mut reader = ExpGolombReader::new(&bytes[5..]);

        assert_eq!(reader.get_n(8)?, 66);
        assert_eq!(reader.get_n(8)?, 0);
        assert_eq!(reader.get_n(8)?, 30);
        assert_eq!(reader.get_ue()?, 7);
        assert_eq!(reader.get_ue()?, 4);
        assert_eq!(reader.get_ue()?, 2);
        assert_eq!(reader.get_ue()?, 10);
        assert!(!reader.get()?);
        assert_eq!(reader.get_ue()?, 119);
        assert_eq!(reader.get_ue()?, 67);
        assert!(reader.get()?);
        assert!(reader.get()?);
        assert!(!reader.get()?);
        assert!(!reader.get()?);
        assert!(reader.get()?, "rbsp_stop_one_bit");

        Ok(())
    }

    #[test]
    fn high_profile_writes_chroma_fields() -> Result<()> {
        let mut sps = SeqParameterSet::default();
        sps.set_level_idc(40);
        sps.set_bit_depth_minus8(2, 2)?;

        let bytes = sps.to_bytes()?;
        let mut reader = ExpGolombReader::new(&bytes[5..]);

        assert_eq!(reader.get_n(8)?, 100);
        assert_eq!(reader.get_n(8)?, 0);
        assert_eq!(reader.get_n(8)?, 40);
        assert_eq!(reader.get_ue()?, 0, "seq_parameter_set_id");
        assert_eq!(reader.get_ue()?, 1, "chroma_format_idc");
        assert_eq!(reader.get_ue()?, 2, "bit_depth_luma_minus8");
        assert_eq!(reader.get_ue()?, 2, "bit_depth_chroma_minus8");
        assert!(!reader.get()?, "qpprime_y_zero_transform_bypass_flag");
        assert!(!reader.get()?, "seq_scaling_matrix_present_flag");
        assert_eq!(reader.get_ue()?, 0, "log2_max_frame_num_minus4");
        assert_eq!(reader.get_ue()?, 0, "pic_order_cnt_type");
        assert_eq!(reader.get_ue()?, 0, "log2_max_pic_order_cnt_lsb_minus4");

        Ok(())
    }

    #[test]
    fn width_must_be_macroblock_aligned() {
        let mut sps = baseline_512();

        let err = sps.set_pic_width_in_mbs_minus_1(500).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ParameterSetError>(),
            Some(ParameterSetError::InvalidFieldValue { value: 500, .. })
        ));
        assert!(sps.set_pic_height_in_map_units_minus_1(0).is_err());

        assert_eq!(sps.pic_width_in_mbs_minus1(), 31);
        assert_eq!(sps.pic_height_in_map_units_minus1(), 31);
    }

    #[test]
    fn rejected_setters_keep_previous_values() {
        let mut sps = baseline_512();

        assert!(sps.set_level(0).is_err());
        assert!(sps.set_level(26).is_err());
        assert!(sps.set_seq_parameter_set_id(32).is_err());
        assert!(sps.set_pic_order_cnt_type(3).is_err());
        assert!(sps.set_log2_max_frame_num_minus4(13).is_err());
        assert!(sps.set_num_ref_frames(17).is_err());
        assert!(sps.set_bit_depth_minus8(0, 7).is_err());

        let config = sps.config();
        assert_eq!(config.level_idc, 30);
        assert_eq!(config.seq_parameter_set_id, 0);
        assert_eq!(config.pic_order_cnt_type, 0);
        assert_eq!(config.num_ref_frames, 10);
        assert_eq!(config.bit_depth_luma_minus8, 0);
    }

    #[test]
    fn unsupported_branches_write_nothing() {
        let cases: [fn(&mut SeqParameterSet); 4] = [
            |sps| sps.set_pic_order_cnt_type(1).unwrap(),
            |sps| sps.set_frame_cropping_flag(true),
            |sps| sps.set_frame_mbs_only_flag(false),
            |sps| sps.set_vui_parameters_present_flag(true),
        ];

        for configure in cases {
            let mut sps = baseline_512();
            configure(&mut sps);

            let mut out = Vec::new();
            let err = sps.export(&mut out).unwrap_err();
            assert!(unsupported(&err), "{err}");
            assert!(out.is_empty());
        }
    }

    #[test]
    fn scaling_matrix_only_matters_for_high_profiles() -> Result<()> {
        let mut fields = SpsConfig {
            seq_scaling_matrix_present_flag: true,
            ..Default::default()
        };

        let sps = SeqParameterSet::with_config(NalConfig::default(), fields.clone())?;
        assert!(unsupported(&sps.to_bytes().unwrap_err()));

        fields.profile_idc = PROFILE_MAIN;
        let sps = SeqParameterSet::with_config(NalConfig::default(), fields)?;
        assert!(sps.to_bytes().is_ok());

        Ok(())
    }

    #[test]
    fn strict_mode_rejects_unknown_level() {
        let mut sps = baseline_512();
        sps.set_level_idc(35);
        assert!(sps.to_bytes().is_ok());

        sps.set_fail_level(log::Level::Warn);
        let err = sps.to_bytes().unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConformanceWarning>(),
            Some(&ConformanceWarning::UnknownLevel(35))
        );
    }

    #[test]
    fn config_is_checked() {
        let fields = SpsConfig {
            width: 1000,
            ..Default::default()
        };
        let result = SeqParameterSet::with_config(NalConfig::default(), fields);
        assert!(result.is_err());

        let result = SeqParameterSet::with_config(NalConfig::default(), SpsConfig::default());
        assert!(result.is_ok());
    }

    #[test]
    fn separate_colour_planes_need_444() -> Result<()> {
        let mut sps = SeqParameterSet::default();

        let err = sps.set_separate_colour_plane_flag(true).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ParameterSetError>(),
            Some(&SEPARATE_PLANES_WITHOUT_444)
        );
        assert!(!sps.config().separate_colour_plane_flag);

        sps.set_chroma_format_idc(3)?;
        sps.set_separate_colour_plane_flag(true)?;
        assert!(sps.set_chroma_format_idc(1).is_err());
        assert_eq!(sps.config().chroma_format_idc, 3);

        let bytes = sps.to_bytes()?;
        let mut reader = ExpGolombReader::new(&bytes[5..]);
        reader.get_n(24)?;
        assert_eq!(reader.get_ue()?, 0, "seq_parameter_set_id");
        assert_eq!(reader.get_ue()?, 3, "chroma_format_idc");
        assert!(reader.get()?, "separate_colour_plane_flag");

        let fields = SpsConfig {
            separate_colour_plane_flag: true,
            ..Default::default()
        };
        let result = SeqParameterSet::with_config(NalConfig::default(), fields);
        assert!(result.is_err());

        Ok(())
    }
}
