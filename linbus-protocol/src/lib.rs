//! LIN frame codec
//!
//! Pure, stateless encoding and validation of master-initiated LIN frames.
//!
//! # Frame Layout
//!
//! ```text
//! ┌───────┬──────┬──────┬─────────────┬──────────┐
//! │ BREAK │ SYNC │ PID  │ PAYLOAD     │ CHECKSUM │
//! │ ≥13b  │ 0x55 │ 1B   │ 0–8B        │ 1B       │
//! └───────┴──────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The break is a line condition produced by the transport and is not part
//! of the byte stream. The protected identifier (PID) carries a 6-bit frame
//! id plus two parity bits. The checksum is the "classic" variant: an
//! end-around-carry sum over PID and payload, inverted.

#![no_std]
#![deny(unsafe_code)]

pub mod checksum;
pub mod frame;
pub mod pid;

pub use checksum::classic_checksum;
pub use frame::{
    validate_response, Frame, FrameError, HEADER_SIZE, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE,
    PAYLOAD_INDEX, PID_INDEX, SYNC_BYTE, SYNC_INDEX,
};
pub use pid::{frame_id, protected_id, ID_MASK};
