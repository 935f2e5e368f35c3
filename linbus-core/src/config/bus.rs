//! Bus binding configuration
//!
//! One [`BusConfig`] describes one physical LIN bus: which serial
//! peripheral drives it, at what bit rate, and on which pins. It is handed
//! to [`LinMaster::new`](crate::master::LinMaster::new) and never changes
//! afterwards.

use linbus_hal::{PinBinding, UartConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Serial peripheral instance carrying the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BusId {
    Usart1,
    Usart2,
    Usart3,
    Uart4,
    Uart5,
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Bit rate outside 1-20 kbit/s
    BaudrateOutOfRange,
    /// Framing other than 8N1
    UnsupportedFraming,
    /// TX and RX bound to the same pin
    PinConflict,
}

/// Hardware binding of one LIN bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// Serial peripheral
    pub bus: BusId,
    /// Line settings
    pub uart: UartConfig,
    /// Transmit pin
    pub tx_pin: PinBinding,
    /// Receive pin
    pub rx_pin: PinBinding,
}

impl BusConfig {
    /// Create a binding with 8N1 framing at `baudrate`
    pub const fn new(bus: BusId, baudrate: u32, tx_pin: PinBinding, rx_pin: PinBinding) -> Self {
        Self {
            bus,
            uart: UartConfig::lin(baudrate),
            tx_pin,
            rx_pin,
        }
    }

    /// Check the binding for values a LIN bus cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.uart.baudrate_in_range() {
            return Err(ConfigError::BaudrateOutOfRange);
        }
        if !self.uart.is_8n1() {
            return Err(ConfigError::UnsupportedFraming);
        }
        if self.tx_pin == self.rx_pin {
            return Err(ConfigError::PinConflict);
        }
        Ok(())
    }
}
