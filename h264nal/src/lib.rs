//! Bit-exact writer for H.264 (ISO/IEC 14496-10) parameter set NAL units.
//!
//! ## Technical Overview
//!
//! ### Byte Stream Framing
//!
//! Each unit is a start code prefix, a one-byte NAL header and the RBSP
//! (raw byte sequence payload) terminated by `rbsp_trailing_bits( )`.
//!
//! ### Syntax Elements
//!
//! - `u(n)`: fixed-width unsigned, MSB first
//! - `ue(v)`: unsigned Exp-Golomb
//! - `se(v)`: signed Exp-Golomb
//!
//! ### Parameter Sets
//!
//! - Sequence parameter set (SPS), `nal_unit_type` 7
//! - Picture parameter set (PPS), `nal_unit_type` 8
//!
//! Both builders validate every setter against the legal range of its
//! syntax element and write their fields in syntax table order regardless of
//! the order the setters were called in.
//!
//! ## Quick Start
//!
//! 1. Configure a [`structs::sps::SeqParameterSet`] and a
//!    [`structs::pps::PicParameterSet`]
//! 2. Export them through [`process::export::WriteRbsp`] into any
//!    [`std::io::Write`] sink
//!
//! ```rust
//! use h264nal::process::export::WriteRbsp;
//! use h264nal::structs::{pps::PicParameterSet, sps::SeqParameterSet};
//!
//! let mut sps = SeqParameterSet::default();
//! sps.set_profile_idc(66);
//! sps.set_level(3)?;
//! sps.set_pic_width_in_mbs_minus_1(1280)?;
//! sps.set_pic_height_in_map_units_minus_1(720)?;
//!
//! let pps = PicParameterSet::default();
//!
//! let mut stream = Vec::new();
//! sps.export(&mut stream)?;
//! pps.export(&mut stream)?;
//!
//! assert_eq!(&stream[..5], &[0x00, 0x00, 0x00, 0x01, 0x67]);
//! # Ok::<(), anyhow::Error>(())
//! ```

/// NAL unit writing and parameter set export.
///
/// 1. **Writing** ([`process::write`]): start code, header, fields and
///    trailing bits for a single unit.
///
/// 2. **Export** ([`process::export`]): validation and the writer lifecycle
///    for anything implementing `WriteRbsp`.
pub mod process;

/// Data structures representing H.264 syntax structures.
///
/// - **Fields** ([`structs::field`]): Typed syntax element values
/// - **NAL Header** ([`structs::nal_header`]): Unit types and framing
/// - **SPS** ([`structs::sps`]): Sequence parameter set
/// - **PPS** ([`structs::pps`]): Picture parameter set
pub mod structs;

/// Utility functions and supporting infrastructure.
///
/// - **Bitstream I/O** ([`utils::bitstream_io`]): Bit-level writing
/// - **Emulation Prevention** ([`utils::emulation`]): Start code escaping
/// - **Error Handling** ([`utils::errors`]): Error types
pub mod utils;
