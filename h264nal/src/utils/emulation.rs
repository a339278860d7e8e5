//! Emulation prevention (clause 7.4.1).
//!
//! Within a NAL unit, any two consecutive zero bytes followed by a byte in
//! `0x00..=0x03` get an `emulation_prevention_three_byte` (0x03) inserted
//! before the third byte, so the payload never contains a start code prefix.

pub const EMULATION_PREVENTION_BYTE: u8 = 0x03;

/// Returns `payload` with emulation prevention bytes inserted, and how many
/// were added.
pub fn insert_emulation_prevention(payload: &[u8]) -> (Vec<u8>, usize) {
    let mut out = Vec::with_capacity(payload.len() + payload.len() / 2);
    let mut zeros = 0;
    let mut inserted = 0;

    for &byte in payload {
        if zeros >= 2 && byte <= EMULATION_PREVENTION_BYTE {
            out.push(EMULATION_PREVENTION_BYTE);
            inserted += 1;
            zeros = 0;
        }

        out.push(byte);

        if byte == 0 {
            zeros += 1;
        } else {
            zeros = 0;
        }
    }

    (out, inserted)
}
