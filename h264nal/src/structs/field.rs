//! Typed syntax element values.
//!
//! Every element written into an RBSP carries its descriptor from the
//! syntax tables (clause 7.2): `u(n)`, `ue(v)` or `se(v)`.

use std::fmt;

use crate::utils::bitstream_io::{exp_golomb_len, se_code_num};

/// A syntax element value together with its coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCode {
    /// Fixed-width unsigned integer, `u(n)`.
    U { width: u32, value: u32 },
    /// Unsigned Exp-Golomb, `ue(v)`.
    Ue(u32),
    /// Signed Exp-Golomb, `se(v)`.
    Se(i32),
}

impl FieldCode {
    #[inline(always)]
    pub const fn u(width: u32, value: u32) -> Self {
        Self::U { width, value }
    }

    #[inline(always)]
    pub const fn flag(value: bool) -> Self {
        Self::U {
            width: 1,
            value: value as u32,
        }
    }

    /// Number of bits this element occupies once written.
    pub const fn bit_len(&self) -> u32 {
        match *self {
            Self::U { width, .. } => width,
            Self::Ue(value) => exp_golomb_len(value as u64),
            Self::Se(value) => exp_golomb_len(se_code_num(value)),
        }
    }

    pub fn descriptor(&self) -> String {
        match self {
            Self::U { width, .. } => format!("u({width})"),
            Self::Ue(_) => "ue(v)".to_string(),
            Self::Se(_) => "se(v)".to_string(),
        }
    }

    pub const fn value(&self) -> i64 {
        match *self {
            Self::U { value, .. } => value as i64,
            Self::Ue(value) => value as i64,
            Self::Se(value) => value as i64,
        }
    }
}

impl fmt::Display for FieldCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.descriptor(), self.value())
    }
}

/// Where a syntax element landed in the NAL unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTrace {
    pub name: &'static str,
    pub code: FieldCode,
    /// Offset of the first bit, counted from the start code.
    pub bit_offset: u64,
    pub bit_len: u32,
}

impl fmt::Display for FieldTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<42} {:<6} {:>8} @{:<5} +{}",
            self.name,
            self.code.descriptor(),
            self.code.value(),
            self.bit_offset,
            self.bit_len
        )
    }
}

#[test]
fn field_lengths() {
    assert_eq!(FieldCode::flag(true).bit_len(), 1);
    assert_eq!(FieldCode::u(8, 66).bit_len(), 8);
    assert_eq!(FieldCode::Ue(0).bit_len(), 1);
    assert_eq!(FieldCode::Ue(9).bit_len(), 7);
    assert_eq!(FieldCode::Se(-1).bit_len(), 3);
    assert_eq!(FieldCode::Se(-26).bit_len(), 11);

    assert_eq!(FieldCode::u(2, 1).descriptor(), "u(2)");
    assert_eq!(format!("{}", FieldCode::Se(-3)), "se(v) -3");
}
