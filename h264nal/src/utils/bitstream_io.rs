//! Bitstream output utilities for NAL unit construction.
//!
//! Provides an append-only, MSB-first bit writer with fixed-width and
//! Exp-Golomb coding on top of `bitstream_io`.

use std::fmt;

use anyhow::{Result, bail};
use bitstream_io::{BigEndian, BitWrite, BitWriter};

use crate::structs::field::FieldCode;
use crate::utils::errors::EmitError;

/// Largest code number `ue(v)` can carry with a 32-bit prefix.
pub const MAX_CODE_NUM: u64 = 1 << 32;

/// Maps a signed value onto its Exp-Golomb code number (clause 9.1.1).
#[inline(always)]
pub const fn se_code_num(value: i32) -> u64 {
    let magnitude = value.unsigned_abs() as u64;
    if value <= 0 {
        magnitude << 1
    } else {
        (magnitude << 1) - 1
    }
}

/// Number of leading zero bits in the Exp-Golomb code for `code_num`.
#[inline(always)]
pub const fn exp_golomb_prefix_len(code_num: u64) -> u32 {
    63 - (code_num + 1).leading_zeros()
}

/// Total length in bits of the Exp-Golomb code for `code_num`.
#[inline(always)]
pub const fn exp_golomb_len(code_num: u64) -> u32 {
    2 * exp_golomb_prefix_len(code_num) + 1
}

/// Append-only bit buffer.
///
/// Bits are packed most significant first. The buffer only grows; byte
/// serialization is permitted once the bit length is a multiple of 8.
pub struct BitstreamIoWriter {
    bs: BitWriter<Vec<u8>, BigEndian>,
    len: u64,
}

impl BitstreamIoWriter {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bs: BitWriter::new(Vec::with_capacity(capacity)),
            len: 0,
        }
    }

    #[inline(always)]
    pub fn put(&mut self, bit: bool) -> Result<()> {
        self.bs.write_bit(bit)?;
        self.len += 1;

        Ok(())
    }

    /// Appends the low `width` bits of `value`, most significant first.
    ///
    /// Fails with [`EmitError::InvalidWidth`] when `width` exceeds 32 or
    /// `value` needs more than `width` bits.
    #[inline(always)]
    pub fn put_n(&mut self, value: u32, width: u32) -> Result<()> {
        if width > u32::BITS {
            bail!(EmitError::InvalidWidth {
                width,
                value: value as u64
            });
        }

        self.put_raw(value as u64, width)
    }

    /// Appends `value` as `ue(v)`.
    #[inline(always)]
    pub fn put_ue(&mut self, value: u32) -> Result<()> {
        self.put_code_num(value as u64)
    }

    /// Appends `value` as `se(v)`.
    #[inline(always)]
    pub fn put_se(&mut self, value: i32) -> Result<()> {
        self.put_code_num(se_code_num(value))
    }

    pub fn put_field(&mut self, field: &FieldCode) -> Result<()> {
        match *field {
            FieldCode::U { width, value } => self.put_n(value, width),
            FieldCode::Ue(value) => self.put_ue(value),
            FieldCode::Se(value) => self.put_se(value),
        }
    }

    /// Appends whole bytes. The buffer does not need to be byte aligned.
    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if self.is_byte_aligned() {
            self.bs.write_bytes(bytes)?;
            self.len += (bytes.len() as u64) << 3;
        } else {
            for &byte in bytes {
                self.put_raw(byte as u64, 8)?;
            }
        }

        Ok(())
    }

    #[inline(always)]
    pub fn bit_len(&self) -> u64 {
        self.len
    }

    #[inline(always)]
    pub fn is_byte_aligned(&self) -> bool {
        self.len & 7 == 0
    }

    /// Consumes the buffer and returns the packed bytes.
    ///
    /// Fails with [`EmitError::NotByteAligned`] if a partial byte is pending.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        if !self.is_byte_aligned() {
            bail!(EmitError::NotByteAligned(self.len));
        }

        Ok(self.bs.into_writer())
    }

    fn put_code_num(&mut self, code_num: u64) -> Result<()> {
        if code_num > MAX_CODE_NUM {
            bail!(EmitError::InvalidFieldValue(code_num));
        }

        // leading zeros, then the marker bit followed by the info bits
        let prefix_len = exp_golomb_prefix_len(code_num);
        self.put_raw(0, prefix_len)?;
        self.put_raw(code_num + 1, prefix_len + 1)
    }

    fn put_raw(&mut self, value: u64, width: u32) -> Result<()> {
        if width < u64::BITS && value >> width != 0 {
            bail!(EmitError::InvalidWidth { width, value });
        }

        if width == 0 {
            return Ok(());
        }

        self.bs.write_unsigned_var(width, value)?;
        self.len += width as u64;

        Ok(())
    }
}

impl fmt::Debug for BitstreamIoWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitstreamIoWriter")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl Default for BitstreamIoWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod test_reader {
    use std::io;

    use bitstream_io::{BigEndian, BitRead, BitReader};

    /// Minimal Exp-Golomb reader used to check the writer in tests.
    pub struct ExpGolombReader<'a> {
        bs: BitReader<io::Cursor<&'a [u8]>, BigEndian>,
    }

    impl<'a> ExpGolombReader<'a> {
        pub fn new(buf: &'a [u8]) -> Self {
            Self {
                bs: BitReader::new(io::Cursor::new(buf)),
            }
        }

        pub fn get(&mut self) -> io::Result<bool> {
            self.bs.read_bit()
        }

        pub fn get_n(&mut self, n: u32) -> io::Result<u32> {
            if n == 0 {
                return Ok(0);
            }
            self.bs.read_unsigned_var(n)
        }

        pub fn get_code_num(&mut self) -> io::Result<u64> {
            let mut leading_zeros = 0;
            while !self.bs.read_bit()? {
                leading_zeros += 1;
            }

            let info: u64 = if leading_zeros == 0 {
                0
            } else {
                self.bs.read_unsigned_var(leading_zeros)?
            };

            Ok((1u64 << leading_zeros) - 1 + info)
        }

        pub fn get_ue(&mut self) -> io::Result<u32> {
            self.get_code_num().map(|k| k as u32)
        }

        pub fn get_se(&mut self) -> io::Result<i32> {
            let k = self.get_code_num()? as i64;
            let magnitude = (k + 1) >> 1;
            let value = if k & 1 == 1 { magnitude } else { -magnitude };
            Ok(value as i32)
        }
    }
}
