/// NAL unit assembly.
///
/// Provides the [`NalUnitWriter`](write::NalUnitWriter) that frames typed
/// syntax elements into one byte stream NAL unit.
pub mod write;

/// Parameter set serialization.
///
/// Provides the [`WriteRbsp`](export::WriteRbsp) capability shared by the
/// SPS and PPS builders.
pub mod export;

/// Baseline SPS, level 3, 512x512, 10 reference frames.
pub const EXAMPLE_SPS: &[u8] = &[
    0x00, 0x00, 0x00, 0x01, 0x67, 0x42, 0x00, 0x1E, 0xF1, 0x60, 0x40, 0x08, 0x32,
];

/// PPS with default settings.
pub const EXAMPLE_PPS: &[u8] = &[0x00, 0x00, 0x00, 0x01, 0x68, 0xC8, 0xA1, 0x43, 0x88];
