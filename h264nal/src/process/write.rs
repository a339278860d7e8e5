use std::io::Write;

use anyhow::{Result, bail};
use log::{debug, trace};

use crate::structs::field::{FieldCode, FieldTrace};
use crate::structs::nal_header::{NalConfig, NalHeader, NalUnitType};
use crate::utils::bitstream_io::BitstreamIoWriter;
use crate::utils::emulation::insert_emulation_prevention;
use crate::utils::errors::NalWriterError;

#[derive(Debug)]
enum WriterState {
    /// Accepting RBSP bits.
    Open(BitstreamIoWriter),
    /// Trailing bits applied; holds the framed bytes.
    Finalized(Vec<u8>),
    Flushed,
}

impl WriterState {
    fn name(&self) -> &'static str {
        match self {
            Self::Open(_) => "open",
            Self::Finalized(_) => "finalized",
            Self::Flushed => "flushed",
        }
    }
}

/// Builds one byte stream NAL unit.
///
/// Construction writes the start code prefix and the header. Payload
/// elements are appended while the unit is open; [`finalize`](Self::finalize)
/// appends `rbsp_trailing_bits( )` and [`flush`](Self::flush) hands the bytes
/// to a sink exactly once.
///
/// # Example
///
/// ```rust
/// use h264nal::process::write::NalUnitWriter;
/// use h264nal::structs::nal_header::{NalConfig, NalUnitType};
///
/// let mut writer = NalUnitWriter::new(NalUnitType::AccessUnitDelimiter, &NalConfig::default())?;
/// writer.append_u("primary_pic_type", 3, 0)?;
/// writer.finalize()?;
///
/// let mut out = Vec::new();
/// writer.flush(&mut out)?;
/// assert_eq!(out, [0x00, 0x00, 0x00, 0x01, 0x69, 0x10]);
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct NalUnitWriter {
    header: NalHeader,
    emulation_prevention: bool,
    /// Start code plus header byte.
    prefix_len: usize,
    state: WriterState,
    trace: Vec<FieldTrace>,
}

impl NalUnitWriter {
    pub fn new(nal_unit_type: NalUnitType, config: &NalConfig) -> Result<Self> {
        let header = NalHeader::new(config.nal_ref_idc, nal_unit_type)?;
        let start_code = config.start_code.bytes();

        let mut bs = BitstreamIoWriter::with_capacity(64);
        bs.put_bytes(start_code)?;

        let mut writer = Self {
            header,
            emulation_prevention: config.emulation_prevention,
            prefix_len: start_code.len() + 1,
            state: WriterState::Open(bs),
            trace: Vec::with_capacity(32),
        };

        for (name, code) in header.fields() {
            writer.append(name, code)?;
        }

        Ok(writer)
    }

    pub fn header(&self) -> &NalHeader {
        &self.header
    }

    /// Appends one syntax element to the RBSP.
    pub fn append(&mut self, name: &'static str, code: FieldCode) -> Result<()> {
        let bs = match &mut self.state {
            WriterState::Open(bs) => bs,
            state => bail!(NalWriterError::InvalidState {
                operation: "append",
                state: state.name(),
            }),
        };

        let bit_offset = bs.bit_len();
        bs.put_field(&code)?;
        let bit_len = (bs.bit_len() - bit_offset) as u32;

        trace!("{name} = {code} ({bit_len} bits at {bit_offset})");

        self.trace.push(FieldTrace {
            name,
            code,
            bit_offset,
            bit_len,
        });

        Ok(())
    }

    #[inline(always)]
    pub fn append_flag(&mut self, name: &'static str, value: bool) -> Result<()> {
        self.append(name, FieldCode::flag(value))
    }

    #[inline(always)]
    pub fn append_u(&mut self, name: &'static str, width: u32, value: u32) -> Result<()> {
        self.append(name, FieldCode::u(width, value))
    }

    #[inline(always)]
    pub fn append_ue(&mut self, name: &'static str, value: u32) -> Result<()> {
        self.append(name, FieldCode::Ue(value))
    }

    #[inline(always)]
    pub fn append_se(&mut self, name: &'static str, value: i32) -> Result<()> {
        self.append(name, FieldCode::Se(value))
    }

    /// Appends `rbsp_trailing_bits( )` (clause 7.3.2.11) and closes the unit.
    ///
    /// The stop bit always occupies the final byte; alignment zero bits only
    /// fill the remainder of that byte.
    pub fn finalize(&mut self) -> Result<()> {
        if !matches!(self.state, WriterState::Open(_)) {
            bail!(NalWriterError::InvalidState {
                operation: "finalize",
                state: self.state.name(),
            });
        }

        self.append_flag("rbsp_stop_one_bit", true)?;

        let pad = (8 - (self.bit_len() & 7) as u32) & 7;
        if pad > 0 {
            self.append_u("rbsp_alignment_zero_bits", pad, 0)?;
        }

        let WriterState::Open(bs) = std::mem::replace(&mut self.state, WriterState::Flushed) else {
            unreachable!("state checked above");
        };

        let mut bytes = bs.into_bytes()?;

        if self.emulation_prevention {
            let (escaped, inserted) = insert_emulation_prevention(&bytes[self.prefix_len..]);
            if inserted > 0 {
                debug!("Inserted {inserted} emulation prevention byte(s)");
            }
            bytes.truncate(self.prefix_len);
            bytes.extend_from_slice(&escaped);
        }

        debug!(
            "Finalized {} NAL unit: {} bytes",
            self.header.nal_unit_type(),
            bytes.len()
        );

        self.state = WriterState::Finalized(bytes);

        Ok(())
    }

    /// Writes the finalized unit to `sink`.
    ///
    /// Only legal once, and only after [`finalize`](Self::finalize). The unit
    /// counts as flushed as soon as the write is attempted, even if `sink`
    /// fails partway.
    pub fn flush<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<usize> {
        let bytes = match std::mem::replace(&mut self.state, WriterState::Flushed) {
            WriterState::Finalized(bytes) => bytes,
            WriterState::Flushed => bail!(NalWriterError::AlreadyFlushed),
            state @ WriterState::Open(_) => {
                self.state = state;
                bail!(NalWriterError::InvalidState {
                    operation: "flush",
                    state: "open",
                })
            }
        };

        sink.write_all(&bytes)?;

        Ok(bytes.len())
    }

    /// Consumes a finalized unit and returns its bytes without a sink.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self.state {
            WriterState::Finalized(bytes) => Ok(bytes),
            WriterState::Flushed => bail!(NalWriterError::AlreadyFlushed),
            WriterState::Open(_) => bail!(NalWriterError::InvalidState {
                operation: "into_bytes",
                state: "open",
            }),
        }
    }

    /// Length in bits, including the start code and any inserted
    /// emulation prevention bytes once finalized.
    pub fn bit_len(&self) -> u64 {
        match &self.state {
            WriterState::Open(bs) => bs.bit_len(),
            WriterState::Finalized(bytes) => (bytes.len() as u64) << 3,
            WriterState::Flushed => 0,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, WriterState::Open(_))
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.state, WriterState::Finalized(_))
    }

    /// Syntax elements in the order they were written.
    pub fn trace(&self) -> &[FieldTrace] {
        &self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::nal_header::StartCode;
    use crate::utils::errors::EmitError;

    fn sps_writer() -> NalUnitWriter {
        NalUnitWriter::new(NalUnitType::Sps, &NalConfig::default()).unwrap()
    }

    #[test]
    fn header_follows_start_code() -> Result<()> {
        let mut writer = sps_writer();
        assert_eq!(writer.bit_len(), 40);
        writer.finalize()?;

        assert_eq!(
            writer.into_bytes()?,
            vec![0x00, 0x00, 0x00, 0x01, 0x67, 0x80]
        );
        Ok(())
    }

    #[test]
    fn short_start_code() -> Result<()> {
        let config = NalConfig {
            nal_ref_idc: 1,
            start_code: StartCode::Short,
            ..Default::default()
        };
        let mut writer = NalUnitWriter::new(NalUnitType::Pps, &config)?;
        writer.append_ue("pic_parameter_set_id", 0)?;
        writer.finalize()?;

        assert_eq!(writer.into_bytes()?, vec![0x00, 0x00, 0x01, 0x28, 0xC0]);
        Ok(())
    }

    #[test]
    fn trailing_bits_align_every_length() -> Result<()> {
        for payload_bits in 0..24u32 {
            let mut writer = sps_writer();
            for _ in 0..payload_bits {
                writer.append_flag("bit", false)?;
            }
            writer.finalize()?;

            assert_eq!(writer.bit_len() % 8, 0);

            let expected_len = 5 + (payload_bits as usize + 1).div_ceil(8);
            let bytes = writer.into_bytes()?;
            assert_eq!(bytes.len(), expected_len, "payload_bits = {payload_bits}");

            let last = *bytes.last().unwrap();
            assert_ne!(last, 0);
            assert_eq!(last, 1 << (7 - payload_bits % 8));
        }

        Ok(())
    }

    #[test]
    fn aligned_payload_gets_a_full_stop_byte() -> Result<()> {
        let mut writer = sps_writer();
        writer.append_u("profile_idc", 8, 66)?;
        writer.finalize()?;

        let trace = writer.trace();
        assert_eq!(trace[trace.len() - 2].name, "rbsp_stop_one_bit");
        assert_eq!(trace[trace.len() - 1].bit_len, 7);

        assert_eq!(
            writer.into_bytes()?,
            vec![0x00, 0x00, 0x00, 0x01, 0x67, 0x42, 0x80]
        );
        Ok(())
    }

    #[test]
    fn append_after_finalize_is_rejected() -> Result<()> {
        let mut writer = sps_writer();
        writer.finalize()?;

        let err = writer.append_flag("late", true).unwrap_err();
        assert_eq!(
            err.downcast_ref::<NalWriterError>(),
            Some(&NalWriterError::InvalidState {
                operation: "append",
                state: "finalized"
            })
        );

        let err = writer.finalize().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NalWriterError>(),
            Some(NalWriterError::InvalidState { .. })
        ));

        Ok(())
    }

    #[test]
    fn flush_requires_finalize_and_happens_once() -> Result<()> {
        let mut writer = sps_writer();
        let mut sink = Vec::new();

        let err = writer.flush(&mut sink).unwrap_err();
        assert_eq!(
            err.downcast_ref::<NalWriterError>(),
            Some(&NalWriterError::InvalidState {
                operation: "flush",
                state: "open"
            })
        );
        assert!(sink.is_empty());

        writer.finalize()?;
        assert_eq!(writer.flush(&mut sink)?, 6);

        let err = writer.flush(&mut sink).unwrap_err();
        assert_eq!(
            err.downcast_ref::<NalWriterError>(),
            Some(&NalWriterError::AlreadyFlushed)
        );
        assert_eq!(sink.len(), 6);

        let err = writer.append_flag("late", true).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NalWriterError>(),
            Some(NalWriterError::InvalidState {
                state: "flushed",
                ..
            })
        ));

        Ok(())
    }

    #[test]
    fn oversized_field_leaves_writer_open() -> Result<()> {
        let mut writer = sps_writer();
        let err = writer.append_u("weighted_bipred_idc", 2, 4).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EmitError>(),
            Some(EmitError::InvalidWidth { width: 2, value: 4 })
        ));
        assert!(writer.is_open());
        assert_eq!(writer.bit_len(), 40);

        Ok(())
    }

    #[test]
    fn emulation_prevention_is_opt_in() -> Result<()> {
        let build = |emulation_prevention| -> Result<Vec<u8>> {
            let config = NalConfig {
                emulation_prevention,
                ..Default::default()
            };
            let mut writer = NalUnitWriter::new(NalUnitType::FillerData, &config)?;
            writer.append_u("payload", 24, 0x00_00_01)?;
            writer.finalize()?;
            writer.into_bytes()
        };

        assert_eq!(
            build(false)?,
            vec![0x00, 0x00, 0x00, 0x01, 0x6C, 0x00, 0x00, 0x01, 0x80]
        );
        assert_eq!(
            build(true)?,
            vec![0x00, 0x00, 0x00, 0x01, 0x6C, 0x00, 0x00, 0x03, 0x01, 0x80]
        );

        Ok(())
    }

    /// Accepts `limit` bytes, then fails.
    struct ShortSink {
        written: Vec<u8>,
        limit: usize,
    }

    impl Write for ShortSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let room = self.limit - self.written.len();
            if room == 0 {
                return Err(std::io::Error::other("sink full"));
            }
            let n = room.min(buf.len());
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_flush_is_not_repeated() -> Result<()> {
        let mut writer = sps_writer();
        writer.finalize()?;

        let mut sink = ShortSink {
            written: Vec::new(),
            limit: 3,
        };
        assert!(writer.flush(&mut sink).is_err());
        assert_eq!(sink.written, [0x00, 0x00, 0x00]);

        sink.limit = 64;
        let err = writer.flush(&mut sink).unwrap_err();
        assert_eq!(
            err.downcast_ref::<NalWriterError>(),
            Some(&NalWriterError::AlreadyFlushed)
        );
        assert_eq!(sink.written.len(), 3);

        Ok(())
    }
}
