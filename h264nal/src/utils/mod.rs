//! Utility functions and supporting infrastructure.
//!
//! Provides the bit emitter, emulation prevention and error handling.

pub mod bitstream_io;
pub mod emulation;
pub mod errors;
