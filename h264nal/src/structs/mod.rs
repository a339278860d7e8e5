//! Data structures representing H.264 syntax structures.
//!
//! Contains the typed syntax element representation, the NAL unit header and
//! the two parameter set builders.

use std::ops::RangeInclusive;

use anyhow::{Result, bail};

use crate::utils::errors::ParameterSetError;

pub mod field;
pub mod nal_header;
pub mod pps;
pub mod sps;

/// Width and height of a macroblock in luma samples.
pub const MB_SIZE: u32 = 16;

pub(crate) fn check_range<T>(
    field: &'static str,
    value: T,
    range: RangeInclusive<T>,
    reason: &'static str,
) -> Result<()>
where
    T: PartialOrd + Into<i64> + Copy,
{
    if !range.contains(&value) {
        bail!(ParameterSetError::InvalidFieldValue {
            field,
            value: value.into(),
            reason,
        });
    }

    Ok(())
}

/// Converts a luma dimension to a `*_minus1` count of macroblocks.
pub(crate) fn mbs_minus1(field: &'static str, pixels: u32) -> Result<u32> {
    if pixels == 0 || pixels % MB_SIZE != 0 {
        bail!(ParameterSetError::InvalidFieldValue {
            field,
            value: pixels as i64,
            reason: "must be a positive multiple of 16",
        });
    }

    Ok(pixels / MB_SIZE - 1)
}

#[test]
fn macroblock_dimensions() {
    assert_eq!(mbs_minus1("width", 512).unwrap(), 31);
    assert_eq!(mbs_minus1("width", 16).unwrap(), 0);
    assert_eq!(mbs_minus1("width", 1920).unwrap(), 119);

    for pixels in [0, 8, 500, 1080] {
        let err = mbs_minus1("width", pixels).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ParameterSetError>(),
            Some(ParameterSetError::InvalidFieldValue { field: "width", .. })
        ));
    }
}
