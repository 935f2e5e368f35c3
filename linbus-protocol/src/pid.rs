//! Protected identifier encoding
//!
//! A LIN frame id is 6 bits wide. The two upper bits of the PID byte are
//! parity bits computed from the id:
//!
//! - P0 (bit 6) = ID0 ^ ID1 ^ ID2 ^ ID4
//! - P1 (bit 7) = !(ID1 ^ ID3 ^ ID4 ^ ID5)

use crate::frame::FrameError;

/// Mask selecting the 6 id bits of a PID
pub const ID_MASK: u8 = 0x3F;

#[inline]
const fn bit(id: u8, n: u8) -> u8 {
    (id >> n) & 1
}

/// Parity bits for a 6-bit id, already shifted into bits 6 and 7
const fn parity_bits(id: u8) -> u8 {
    let p0 = bit(id, 0) ^ bit(id, 1) ^ bit(id, 2) ^ bit(id, 4);
    let p1 = (bit(id, 1) ^ bit(id, 3) ^ bit(id, 4) ^ bit(id, 5)) ^ 1;
    (p1 << 7) | (p0 << 6)
}

/// Compute the protected identifier for a frame id
///
/// Only the low 6 bits of `id` are used.
pub const fn protected_id(id: u8) -> u8 {
    let id = id & ID_MASK;
    id | parity_bits(id)
}

/// Recover the frame id from a protected identifier
///
/// Fails if the parity bits do not match the id bits.
pub fn frame_id(pid: u8) -> Result<u8, FrameError> {
    let id = pid & ID_MASK;
    if protected_id(id) == pid {
        Ok(id)
    } else {
        Err(FrameError::ParityMismatch)
    }
}
