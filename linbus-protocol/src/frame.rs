//! Frame encoding and response validation
//!
//! Byte layout of a frame as it appears on the wire after the break:
//! - SYNC (1 byte): 0x55, lets slaves measure the bit rate
//! - PID (1 byte): frame id with parity bits
//! - PAYLOAD (0-8 bytes)
//! - CHECKSUM (1 byte): classic checksum over PID and payload

use heapless::Vec;

use crate::checksum::classic_checksum;
use crate::pid::{frame_id, protected_id, ID_MASK};

/// Frame synchronization byte
pub const SYNC_BYTE: u8 = 0x55;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 8;

/// Header size (SYNC + PID)
pub const HEADER_SIZE: usize = 2;

/// Maximum complete frame size (SYNC + PID + MAX_PAYLOAD + CHECKSUM)
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE + 1;

/// Position of the sync byte
pub const SYNC_INDEX: usize = 0;

/// Position of the protected identifier
pub const PID_INDEX: usize = 1;

/// Position of the first payload byte
pub const PAYLOAD_INDEX: usize = 2;

/// Errors that can occur during frame encoding or validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds 8 bytes
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
    /// Fewer bytes than a complete frame of the expected length
    Incomplete,
    /// More bytes than a complete frame of the expected length
    LengthMismatch,
    /// Valid PID, but for a different frame id
    IdMismatch,
    /// PID parity bits are wrong
    ParityMismatch,
    /// Checksum mismatch
    InvalidChecksum,
}

/// A LIN frame: id plus up to 8 payload bytes
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// 6-bit frame id
    pub id: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given id and payload
    ///
    /// Only the low 6 bits of `id` are kept.
    pub fn new(id: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self {
            id: id & ID_MASK,
            payload,
        })
    }

    /// Create a frame with no payload
    pub fn header(id: u8) -> Self {
        Self {
            id: id & ID_MASK,
            payload: Vec::new(),
        }
    }

    /// Protected identifier of this frame
    pub fn protected_id(&self) -> u8 {
        protected_id(self.id)
    }

    /// Classic checksum of this frame
    pub fn checksum(&self) -> u8 {
        classic_checksum(self.protected_id(), &self.payload)
    }

    /// Number of bytes `encode` writes
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.payload.len() + 1
    }

    /// Encode `[SYNC, PID]` into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode_header(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        if buffer.len() < HEADER_SIZE {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[SYNC_INDEX] = SYNC_BYTE;
        buffer[PID_INDEX] = self.protected_id();

        Ok(HEADER_SIZE)
    }

    /// Encode the complete frame `[SYNC, PID, PAYLOAD..., CHECKSUM]`
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        self.encode_header(buffer)?;
        let end = PAYLOAD_INDEX + self.payload.len();
        buffer[PAYLOAD_INDEX..end].copy_from_slice(&self.payload);
        buffer[end] = self.checksum();

        Ok(frame_len)
    }

    /// Encode the complete frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

/// Validate received bytes as a complete frame for `id` with `payload_len`
/// payload bytes
///
/// `received` must hold exactly the bytes that have arrived so far,
/// starting at the sync position. The frame is accepted only if the byte
/// count matches exactly, the PID equals the expected one and the trailing
/// checksum is correct. The sync byte itself is not checked.
pub fn validate_response(received: &[u8], id: u8, payload_len: usize) -> Result<Frame, FrameError> {
    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(FrameError::PayloadTooLarge);
    }

    let expected_len = PAYLOAD_INDEX + payload_len + 1;
    if received.len() < expected_len {
        return Err(FrameError::Incomplete);
    }
    if received.len() > expected_len {
        return Err(FrameError::LengthMismatch);
    }

    let pid = received[PID_INDEX];
    if pid != protected_id(id) {
        // Distinguish a corrupted PID from a well-formed one for another frame
        frame_id(pid)?;
        return Err(FrameError::IdMismatch);
    }

    let payload = &received[PAYLOAD_INDEX..PAYLOAD_INDEX + payload_len];
    if classic_checksum(pid, payload) != received[PAYLOAD_INDEX + payload_len] {
        return Err(FrameError::InvalidChecksum);
    }

    Frame::new(id, payload)
}
