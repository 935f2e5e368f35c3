//! UART line configuration
//!
//! LIN runs over a plain UART in 8N1 framing. The bit rate is the only
//! setting that normally varies between buses (9600 and 19200 are the
//! common choices).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lowest bit rate permitted on a LIN bus
pub const MIN_BAUDRATE: u32 = 1_000;

/// Highest bit rate permitted on a LIN bus
pub const MAX_BAUDRATE: u32 = 20_000;

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits per character
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::lin(19_200)
    }
}

impl UartConfig {
    /// LIN line settings (8N1) at the given bit rate
    pub const fn lin(baudrate: u32) -> Self {
        Self {
            baudrate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }

    /// Check whether the bit rate lies inside the LIN range
    pub fn baudrate_in_range(&self) -> bool {
        (MIN_BAUDRATE..=MAX_BAUDRATE).contains(&self.baudrate)
    }

    /// Check for 8N1 framing
    pub fn is_8n1(&self) -> bool {
        self.data_bits == DataBits::Eight
            && self.parity == Parity::None
            && self.stop_bits == StopBits::One
    }

    /// Duration of one bit in nanoseconds
    ///
    /// Useful to transports that time the break condition themselves
    /// (13 bit times is the minimum break length).
    pub fn bit_time_ns(&self) -> u32 {
        if self.baudrate == 0 {
            return 0;
        }
        1_000_000_000 / self.baudrate
    }
}

/// Number of data bits per character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopBits {
    One,
    Two,
}
