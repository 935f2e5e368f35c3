//! Pin bindings
//!
//! A bus instance is tied to one TX and one RX pin. The chip HAL puts
//! them into their alternate function; this crate only names them.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// GPIO port letter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Port {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Port::A),
            'B' => Some(Port::B),
            'C' => Some(Port::C),
            'D' => Some(Port::D),
            'E' => Some(Port::E),
            'F' => Some(Port::F),
            'G' => Some(Port::G),
            _ => None,
        }
    }

    /// Port letter as a character
    pub fn as_char(self) -> char {
        match self {
            Port::A => 'A',
            Port::B => 'B',
            Port::C => 'C',
            Port::D => 'D',
            Port::E => 'E',
            Port::F => 'F',
            Port::G => 'G',
        }
    }
}

/// Errors from parsing a pin name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinParseError {
    /// Name does not start with 'P'
    MissingPrefix,
    /// Port letter outside A-G
    InvalidPort,
    /// Pin number missing, not numeric, or above 15
    InvalidPin,
}

/// A single GPIO pin (port + number 0-15)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinBinding {
    /// GPIO port
    pub port: Port,
    /// Pin number within the port
    pub pin: u8,
}

impl PinBinding {
    /// Create a pin binding
    ///
    /// Returns `None` for pin numbers above 15.
    pub const fn new(port: Port, pin: u8) -> Option<Self> {
        if pin > 15 {
            return None;
        }
        Some(Self { port, pin })
    }

    /// Single-bit mask of this pin within its port
    pub fn mask(&self) -> u16 {
        1 << self.pin
    }
}

/// Parse a pin string from config
///
/// Supports the "PA9" / "PC10" format.
impl FromStr for PinBinding {
    type Err = PinParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let rest = s.strip_prefix('P').ok_or(PinParseError::MissingPrefix)?;

        let mut chars = rest.chars();
        let port = chars
            .next()
            .and_then(Port::from_char)
            .ok_or(PinParseError::InvalidPort)?;

        let pin: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| PinParseError::InvalidPin)?;

        PinBinding::new(port, pin).ok_or(PinParseError::InvalidPin)
    }
}

impl fmt::Display for PinBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port.as_char(), self.pin)
    }
}
