use std::io::Write;

use anyhow::{Result, anyhow};
use log::Level::Warn;
use log::info;

use crate::log_or_err;
use crate::process::write::NalUnitWriter;
use crate::structs::nal_header::{NalConfig, NalUnitType};
use crate::utils::errors::ConformanceWarning;

struct ExportState {
    fail_level: log::Level,
}

/// A syntax structure that can be serialized as the RBSP of one NAL unit.
///
/// Implementors describe their unit type and fields; the provided methods
/// own the [`NalUnitWriter`] lifecycle.
pub trait WriteRbsp {
    fn nal_unit_type(&self) -> NalUnitType;

    fn nal_config(&self) -> &NalConfig;

    fn fail_level(&self) -> log::Level {
        log::Level::Error
    }

    /// Rejects configurations that cannot be written. Runs before any bits
    /// are produced.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Appends the RBSP fields in syntax order, without trailing bits.
    fn write_rbsp(&self, writer: &mut NalUnitWriter) -> Result<()>;

    /// Validates and writes a complete, finalized NAL unit.
    fn build(&self) -> Result<NalUnitWriter> {
        self.validate()?;

        let nal_unit_type = self.nal_unit_type();
        let config = self.nal_config();

        if config.nal_ref_idc == 0 && nal_unit_type.requires_reference() {
            let state = ExportState {
                fail_level: self.fail_level(),
            };
            let name = match nal_unit_type {
                NalUnitType::Sps => "SPS",
                NalUnitType::Pps => "PPS",
                NalUnitType::SliceIdr => "IDR slice",
                _ => "parameter set",
            };
            log_or_err!(
                state,
                Warn,
                anyhow!(ConformanceWarning::ZeroRefIdcOnParameterSet(name))
            );
        }

        let mut writer = NalUnitWriter::new(nal_unit_type, config)?;
        self.write_rbsp(&mut writer)?;
        writer.finalize()?;

        Ok(writer)
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        self.build()?.into_bytes()
    }

    /// Writes the NAL unit to `sink` and returns the number of bytes written.
    ///
    /// Nothing reaches the sink unless the whole unit was built.
    fn export<W: Write + ?Sized>(&self, sink: &mut W) -> Result<usize> {
        let mut writer = self.build()?;
        let written = writer.flush(sink)?;

        info!("Wrote {} NAL unit ({written} bytes)", self.nal_unit_type());

        Ok(written)
    }
}

/// Exports several units in order, returning the total byte count.
///
/// Every unit is built before the first byte is written, so a rejected
/// unit leaves `sink` untouched.
pub fn export_all(units: &[&dyn WriteRbspDyn], sink: &mut dyn Write) -> Result<usize> {
    let mut writers = units
        .iter()
        .map(|unit| unit.build_dyn())
        .collect::<Result<Vec<_>>>()?;

    let mut total = 0;
    for writer in &mut writers {
        total += writer.flush(&mut *sink)?;
        info!("Wrote {} NAL unit", writer.header().nal_unit_type());
    }

    Ok(total)
}

/// Object-safe view of [`WriteRbsp`].
pub trait WriteRbspDyn {
    fn build_dyn(&self) -> Result<NalUnitWriter>;

    fn export_dyn(&self, sink: &mut dyn Write) -> Result<usize>;
}

impl<T: WriteRbsp> WriteRbspDyn for T {
    fn build_dyn(&self) -> Result<NalUnitWriter> {
        self.build()
    }

    fn export_dyn(&self, sink: &mut dyn Write) -> Result<usize> {
        self.export(sink)
    }
}
