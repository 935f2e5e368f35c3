//! Asynchronous serial transport
//!
//! The LIN master never touches USART or DMA registers directly. It asks
//! the transport to emit a break, start a transmission and arm a
//! reception, then polls how much of the receive window has been filled.
//!
//! On a single-wire bus the transmitter's own bytes loop back into the
//! receiver, so a receive window armed before transmission starts sees
//! the master's header (and payload, if any) followed by the slave's
//! response.

use crate::uart::UartConfig;

/// Errors a transport implementation may report
///
/// Implementations are free to use their own error type; this one covers
/// the usual USART/DMA failure set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Framing error
    Framing,
    /// Noise error
    Noise,
    /// Overrun error
    Overrun,
    /// Requested reception exceeds the receive window
    WindowTooSmall,
    /// Transmission requested while the previous one is still shifting out
    Busy,
    /// Bit rate or framing not supported by the peripheral
    Unsupported,
}

/// Break/transmit/receive engine behind one LIN bus
///
/// All operations are non-blocking. `start_transmit` and `start_receive`
/// only set the transfer up; the bytes move in the background.
pub trait LinTransport {
    /// Error type for transport operations
    type Error;

    /// Apply line settings (bit rate, 8N1 framing, LIN break detection)
    fn configure(&mut self, config: &UartConfig) -> Result<(), Self::Error>;

    /// Emit the break condition that precedes a frame
    fn send_break(&mut self) -> Result<(), Self::Error>;

    /// Start transmitting `data`
    ///
    /// The bytes are copied into transport-owned memory before this
    /// returns, so the caller's buffer may be reused immediately. A
    /// transmission still in flight is aborted.
    fn start_transmit(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// (Re)arm reception of up to `capacity` bytes into the receive window
    ///
    /// Resets the remaining-byte counter to `capacity`. Bytes from any
    /// previous reception are discarded.
    fn start_receive(&mut self, capacity: usize) -> Result<(), Self::Error>;

    /// Number of bytes of the armed reception not yet filled
    fn bytes_remaining(&self) -> usize;

    /// Copy the first `out.len()` bytes of the receive window into `out`
    ///
    /// Callers only ask for bytes already reported as received, so an
    /// implementation never has to hand out a byte the DMA is still
    /// writing.
    fn read_received(&self, out: &mut [u8]);
}
