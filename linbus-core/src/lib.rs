//! Board-agnostic LIN master logic
//!
//! This crate contains everything above the serial transport:
//!
//! - Lock-free SPSC ring buffer for interrupt-to-foreground hand-off
//! - Bus binding configuration
//! - Request/response exchange state
//! - The LIN master frame engine

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod master;
#[allow(unsafe_code)]
pub mod ring;
pub mod state;

pub use config::{BusConfig, BusId, ConfigError};
pub use master::{Error, LinMaster};
pub use ring::{Consumer, Producer, RingBuffer};
pub use state::ExchangeState;
