//! Picture parameter set, `pic_parameter_set_rbsp( )` (clause 7.3.2.2).
//!
//! Slice groups (FMO) are not supported; `num_slice_groups_minus1 > 0`
//! fails at export.

use anyhow::{Result, bail};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::process::export::WriteRbsp;
use crate::process::write::NalUnitWriter;
use crate::structs::check_range;
use crate::structs::nal_header::{NalConfig, NalUnitType};
use crate::utils::errors::ParameterSetError;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PpsConfig {
    pub pic_parameter_set_id: u32,
    pub seq_parameter_set_id: u32,
    pub entropy_coding_mode_flag: bool,
    pub pic_order_present_flag: bool,
    pub num_slice_groups_minus1: u32,
    pub num_ref_idx_l0_active_minus1: u32,
    pub num_ref_idx_l1_active_minus1: u32,
    pub weighted_pred_flag: bool,
    pub weighted_bipred_idc: u32,
    pub pic_init_qp_minus26: i32,
    pub pic_init_qs_minus26: i32,
    pub chroma_qp_index_offset: i32,
    pub deblocking_filter_control_present_flag: bool,
    pub constrained_intra_pred_flag: bool,
    pub redundant_pic_cnt_present_flag: bool,
}

impl Default for PpsConfig {
    fn default() -> Self {
        Self {
            pic_parameter_set_id: 0,
            seq_parameter_set_id: 0,
            entropy_coding_mode_flag: false,
            pic_order_present_flag: false,
            num_slice_groups_minus1: 0,
            num_ref_idx_l0_active_minus1: 9,
            num_ref_idx_l1_active_minus1: 9,
            weighted_pred_flag: false,
            weighted_bipred_idc: 0,
            pic_init_qp_minus26: 0,
            pic_init_qs_minus26: 0,
            chroma_qp_index_offset: 0,
            deblocking_filter_control_present_flag: false,
            constrained_intra_pred_flag: false,
            redundant_pic_cnt_present_flag: false,
        }
    }
}

impl PpsConfig {
    pub fn check(&self) -> Result<()> {
        check_range(
            "pic_parameter_set_id",
            self.pic_parameter_set_id,
            0..=255,
            "expected 0..=255",
        )?;
        check_range(
            "seq_parameter_set_id",
            self.seq_parameter_set_id,
            0..=31,
            "expected 0..=31",
        )?;
        check_range(
            "num_slice_groups_minus1",
            self.num_slice_groups_minus1,
            0..=7,
            "expected 0..=7",
        )?;
        check_range(
            "num_ref_idx_l0_active_minus1",
            self.num_ref_idx_l0_active_minus1,
            0..=31,
            "expected 0..=31",
        )?;
        check_range(
            "num_ref_idx_l1_active_minus1",
            self.num_ref_idx_l1_active_minus1,
            0..=31,
            "expected 0..=31",
        )?;
        check_range(
            "weighted_bipred_idc",
            self.weighted_bipred_idc,
            0..=2,
            "expected 0..=2",
        )?;
        check_range(
            "pic_init_qp_minus26",
            self.pic_init_qp_minus26,
            -26..=25,
            "expected -26..=25",
        )?;
        check_range(
            "pic_init_qs_minus26",
            self.pic_init_qs_minus26,
            -26..=25,
            "expected -26..=25",
        )?;
        check_range(
            "chroma_qp_index_offset",
            self.chroma_qp_index_offset,
            -12..=12,
            "expected -12..=12",
        )?;

        Ok(())
    }
}

/// Picture parameter set builder.
///
/// ```rust
/// use h264nal::process::EXAMPLE_PPS;
/// use h264nal::process::export::WriteRbsp;
/// use h264nal::structs::pps::PicParameterSet;
///
/// let pps = PicParameterSet::default();
/// assert_eq!(pps.to_bytes()?, EXAMPLE_PPS);
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PicParameterSet {
    nal: NalConfig,
    fields: PpsConfig,
    pub fail_level: log::Level,
}

impl Default for PicParameterSet {
    fn default() -> Self {
        Self {
            nal: NalConfig::default(),
            fields: PpsConfig::default(),
            fail_level: log::Level::Error,
        }
    }
}

impl PicParameterSet {
    pub fn with_config(nal: NalConfig, fields: PpsConfig) -> Result<Self> {
        fields.check()?;

        Ok(Self {
            nal,
            fields,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &PpsConfig {
        &self.fields
    }

    pub fn set_fail_level(&mut self, level: log::Level) {
        self.fail_level = level;
    }

    pub fn set_pic_parameter_set_id(&mut self, id: u32) -> Result<()> {
        check_range("pic_parameter_set_id", id, 0..=255, "expected 0..=255")?;
        self.fields.pic_parameter_set_id = id;
        Ok(())
    }

    /// Id of the SPS this picture parameter set refers to.
    pub fn set_seq_parameter_set_id(&mut self, id: u32) -> Result<()> {
        check_range("seq_parameter_set_id", id, 0..=31, "expected 0..=31")?;
        self.fields.seq_parameter_set_id = id;
        Ok(())
    }

    pub fn set_entropy_coding_mode_flag(&mut self, value: bool) {
        self.fields.entropy_coding_mode_flag = value;
    }

    pub fn set_pic_order_present_flag(&mut self, value: bool) {
        self.fields.pic_order_present_flag = value;
    }

    /// Values above 0 pass here but cannot be exported.
    pub fn set_num_slice_groups_minus1(&mut self, value: u32) -> Result<()> {
        check_range("num_slice_groups_minus1", value, 0..=7, "expected 0..=7")?;
        self.fields.num_slice_groups_minus1 = value;
        Ok(())
    }

    pub fn set_num_ref_idx_active_minus1(&mut self, l0: u32, l1: u32) -> Result<()> {
        check_range(
            "num_ref_idx_l0_active_minus1",
            l0,
            0..=31,
            "expected 0..=31",
        )?;
        check_range(
            "num_ref_idx_l1_active_minus1",
            l1,
            0..=31,
            "expected 0..=31",
        )?;
        self.fields.num_ref_idx_l0_active_minus1 = l0;
        self.fields.num_ref_idx_l1_active_minus1 = l1;
        Ok(())
    }

    pub fn set_weighted_pred_flag(&mut self, value: bool) {
        self.fields.weighted_pred_flag = value;
    }

    pub fn set_weighted_bipred_idc(&mut self, value: u32) -> Result<()> {
        check_range("weighted_bipred_idc", value, 0..=2, "expected 0..=2")?;
        self.fields.weighted_bipred_idc = value;
        Ok(())
    }

    pub fn set_pic_init_qp_minus26(&mut self, value: i32) -> Result<()> {
        check_range("pic_init_qp_minus26", value, -26..=25, "expected -26..=25")?;
        self.fields.pic_init_qp_minus26 = value;
        Ok(())
    }

    pub fn set_pic_init_qs_minus26(&mut self, value: i32) -> Result<()> {
        check_range("pic_init_qs_minus26", value, -26..=25, "expected -26..=25")?;
        self.fields.pic_init_qs_minus26 = value;
        Ok(())
    }

    pub fn set_chroma_qp_index_offset(&mut self, value: i32) -> Result<()> {
        check_range(
            "chroma_qp_index_offset",
            value,
            -12..=12,
            "expected -12..=12",
        )?;
        self.fields.chroma_qp_index_offset = value;
        Ok(())
    }

    pub fn set_deblocking_filter_control_present_flag(&mut self, value: bool) {
        self.fields.deblocking_filter_control_present_flag = value;
    }

    pub fn set_constrained_intra_pred_flag(&mut self, value: bool) {
        self.fields.constrained_intra_pred_flag = value;
    }

    pub fn set_redundant_pic_cnt_present_flag(&mut self, value: bool) {
        self.fields.redundant_pic_cnt_present_flag = value;
    }
}

impl WriteRbsp for PicParameterSet {
    fn nal_unit_type(&self) -> NalUnitType {
        NalUnitType::Pps
    }

    fn nal_config(&self) -> &NalConfig {
        &self.nal
    }

    fn fail_level(&self) -> log::Level {
        self.fail_level
    }

    fn validate(&self) -> Result<()> {
        if self.fields.num_slice_groups_minus1 > 0 {
            bail!(ParameterSetError::UnsupportedFeature(
                "slice groups (num_slice_groups_minus1 > 0)"
            ));
        }

        Ok(())
    }

    fn write_rbsp(&self, writer: &mut NalUnitWriter) -> Result<()> {
        let f = &self.fields;

        writer.append_ue("pic_parameter_set_id", f.pic_parameter_set_id)?;
        writer.append_ue("seq_parameter_set_id", f.seq_parameter_set_id)?;
        writer.append_flag("entropy_coding_mode_flag", f.entropy_coding_mode_flag)?;
        writer.append_flag("pic_order_present_flag", f.pic_order_present_flag)?;
        writer.append_ue("num_slice_groups_minus1", f.num_slice_groups_minus1)?;
        writer.append_ue(
            "num_ref_idx_l0_active_minus1",
            f.num_ref_idx_l0_active_minus1,
        )?;
        writer.append_ue(
            "num_ref_idx_l1_active_minus1",
            f.num_ref_idx_l1_active_minus1,
        )?;
        writer.append_flag("weighted_pred_flag", f.weighted_pred_flag)?;
        writer.append_u("weighted_bipred_idc", 2, f.weighted_bipred_idc)?;
        writer.append_se("pic_init_qp_minus26", f.pic_init_qp_minus26)?;
        writer.append_se("pic_init_qs_minus26", f.pic_init_qs_minus26)?;
        writer.append_se("chroma_qp_index_offset", f.chroma_qp_index_offset)?;
        writer.append_flag(
            "deblocking_filter_control_present_flag",
            f.deblocking_filter_control_present_flag,
        )?;
        writer.append_flag("constrained_intra_pred_flag", f.constrained_intra_pred_flag)?;
        writer.append_flag(
            "redundant_pic_cnt_present_flag",
            f.redundant_pic_cnt_present_flag,
        )?;

        Ok(())
    }
}
