//! Classic LIN checksum
//!
//! The checksum seeds an accumulator with the PID, adds every payload byte
//! with end-around carry (a 9-bit sum of 256 or more has 255 subtracted)
//! and inverts the result. No identifier is treated specially.

/// Compute the classic checksum over a protected identifier and payload
///
/// An empty payload yields `pid ^ 0xFF`.
pub fn classic_checksum(pid: u8, payload: &[u8]) -> u8 {
    let mut acc = pid;
    for &byte in payload {
        let sum = acc as u16 + byte as u16;
        acc = if sum >= 256 { (sum - 255) as u8 } else { sum as u8 };
    }
    acc ^ 0xFF
}
