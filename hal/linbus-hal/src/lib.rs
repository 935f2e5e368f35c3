//! linbus Hardware Abstraction Layer
//!
//! This crate defines the boundary between the LIN master logic and the
//! chip-specific serial engine. A chip HAL implements [`LinTransport`] on
//! top of its USART and DMA channels; everything above that line is
//! board-agnostic and host-testable.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  linbus-core (LinMaster, RingBuffer)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  linbus-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chip HAL: USART + DMA implementation   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Contents
//!
//! - [`transport::LinTransport`] - Asynchronous break/transmit/receive engine
//! - [`uart::UartConfig`] - Line settings (bit rate, framing)
//! - [`gpio::PinBinding`] - TX/RX pin assignments

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod transport;
pub mod uart;

// Re-export key types at crate root for convenience
pub use gpio::{PinBinding, PinParseError, Port};
pub use transport::{LinTransport, TransportError};
pub use uart::{DataBits, Parity, StopBits, UartConfig};
