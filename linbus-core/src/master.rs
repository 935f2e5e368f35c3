//! LIN master frame engine
//!
//! Issues request frames and validates what lands in the receive window.
//! The engine never blocks and has no callbacks: the caller issues a
//! request, then polls [`LinMaster::has_received`] until it returns `true`
//! or the caller's own deadline passes.
//!
//! # Exchange
//!
//! ```text
//!  request(id, payload)
//!     │  start_receive(11)    receive window armed first
//!     │  send_break()
//!     │  start_transmit(..)   [SYNC, PID] or [SYNC, PID, DATA.., CHK]
//!     ▼
//!  window: SYNC PID ......   own bytes loop back on the single wire,
//!                            slave response (if any) follows
//!     │
//!  has_received(id, len)     true once exactly 2 + len + 1 bytes are in,
//!                            PID matches and the checksum is right
//! ```
//!
//! A request with an empty payload sends the header only, which is how
//! the master solicits a slave response. A request with a payload sends
//! the whole frame; polling for it confirms the frame went out intact.

use linbus_hal::LinTransport;
use linbus_protocol::{validate_response, Frame, FrameError, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};

use crate::config::{BusConfig, BusId, ConfigError};
use crate::state::ExchangeState;

/// Errors reported by [`LinMaster`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Bus binding rejected at construction
    Config(ConfigError),
    /// Frame could not be built (payload longer than 8 bytes)
    Frame(FrameError),
    /// Transport refused an operation
    Transport(E),
}

impl<E> From<FrameError> for Error<E> {
    fn from(e: FrameError) -> Self {
        Error::Frame(e)
    }
}

impl<E> From<ConfigError> for Error<E> {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

/// Master node on one LIN bus
pub struct LinMaster<T: LinTransport> {
    transport: T,
    config: BusConfig,
    state: ExchangeState,
}

impl<T: LinTransport> LinMaster<T> {
    /// Bind a transport to a bus and apply its bit rate
    pub fn new(mut transport: T, config: BusConfig) -> Result<Self, Error<T::Error>> {
        config.validate()?;
        transport.configure(&config.uart).map_err(Error::Transport)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("LIN master on {} at {} baud", config.bus, config.uart.baudrate);

        Ok(Self {
            transport,
            config,
            state: ExchangeState::Idle,
        })
    }

    /// Bus binding this master was created with
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Serial peripheral carrying the bus
    pub fn bus(&self) -> BusId {
        self.config.bus
    }

    /// Current exchange state
    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Give back the transport and binding
    pub fn release(self) -> (T, BusConfig) {
        (self.transport, self.config)
    }

    /// Send a request frame for `id`
    ///
    /// With an empty `payload` only the header `[SYNC, PID]` is sent;
    /// otherwise the full frame with checksum. Any earlier reception is
    /// discarded.
    ///
    /// A payload longer than 8 bytes is dropped: nothing is transmitted,
    /// the receive window and exchange state are left as they were, and
    /// `Err(Error::Frame(FrameError::PayloadTooLarge))` is returned.
    /// Callers that do not care may ignore the result.
    pub fn request(&mut self, id: u8, payload: &[u8]) -> Result<(), Error<T::Error>> {
        let frame = match Frame::new(id, payload) {
            Ok(frame) => frame,
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("LIN request {=u8:#x} dropped: {} byte payload", id, payload.len());
                return Err(e.into());
            }
        };

        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = if frame.payload.is_empty() {
            frame.encode_header(&mut buffer)?
        } else {
            frame.encode(&mut buffer)?
        };

        match self.start_exchange(&buffer[..len]) {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("LIN request {=u8:#x}: {} bytes", frame.id, len);

                self.state = self.state.start(frame.id, len);
                Ok(())
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("LIN request {=u8:#x}: transport error", frame.id);

                self.state = self.state.abort();
                Err(Error::Transport(e))
            }
        }
    }

    /// Arm reception, then break and transmit
    ///
    /// The window is sized for the largest frame whatever the expected
    /// response, because our own bytes loop back into it first.
    fn start_exchange(&mut self, bytes: &[u8]) -> Result<(), T::Error> {
        self.transport.start_receive(MAX_FRAME_SIZE)?;
        self.transport.send_break()?;
        self.transport.start_transmit(bytes)
    }

    /// Number of bytes that have landed in the receive window
    pub fn received_bytes(&self) -> usize {
        if self.state.is_idle() {
            return 0;
        }
        MAX_FRAME_SIZE.saturating_sub(self.transport.bytes_remaining())
    }

    /// Check whether a complete, valid frame for `id` with exactly
    /// `payload_len` payload bytes is in the receive window
    ///
    /// Returns `false` alike for nothing yet, partial frame, wrong id,
    /// wrong length and bad checksum. The sync byte is not checked.
    /// Idempotent; may be polled any number of times.
    pub fn has_received(&self, id: u8, payload_len: usize) -> bool {
        self.poll_response(id, payload_len).is_ok()
    }

    /// Like [`has_received`](Self::has_received), but tells why a frame
    /// was not accepted and returns it when it was
    ///
    /// `Incomplete` covers both "still arriving" and "never arrived".
    pub fn poll_response(&self, id: u8, payload_len: usize) -> Result<Frame, FrameError> {
        if payload_len > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }

        // Snapshot the count first; only bytes below it are known written
        let received = self.received_bytes();
        let mut window = [0u8; MAX_FRAME_SIZE];
        self.transport.read_received(&mut window[..received]);

        validate_response(&window[..received], id, payload_len)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use linbus_hal::{PinBinding, Port, TransportError, UartConfig};
    use linbus_protocol::{classic_checksum, protected_id, SYNC_BYTE};
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Configure(u32),
        StartReceive(usize),
        Break,
        Transmit(usize),
    }

    /// Single-wire transport model
    ///
    /// Transmitted bytes loop back into the receive window; slave bytes
    /// are appended with `respond`.
    struct MockTransport {
        window: [u8; 16],
        armed: usize,
        filled: usize,
        sent: Vec<u8>,
        calls: Vec<Call>,
        fail_receive: bool,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                window: [0; 16],
                armed: 0,
                filled: 0,
                sent: Vec::new(),
                calls: Vec::new(),
                fail_receive: false,
            }
        }

        fn respond(&mut self, bytes: &[u8]) {
            for &b in bytes {
                if self.filled < self.armed {
                    self.window[self.filled] = b;
                    self.filled += 1;
                }
            }
        }
    }

    impl LinTransport for MockTransport {
        type Error = TransportError;

        fn configure(&mut self, config: &UartConfig) -> Result<(), Self::Error> {
            self.calls.push(Call::Configure(config.baudrate));
            Ok(())
        }

        fn send_break(&mut self) -> Result<(), Self::Error> {
            self.calls.push(Call::Break);
            Ok(())
        }

        fn start_transmit(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            self.calls.push(Call::Transmit(data.len()));
            self.sent.clear();
            self.sent.extend_from_slice(data);
            self.respond(data);
            Ok(())
        }

        fn start_receive(&mut self, capacity: usize) -> Result<(), Self::Error> {
            if self.fail_receive {
                return Err(TransportError::Busy);
            }
            if capacity > self.window.len() {
                return Err(TransportError::WindowTooSmall);
            }
            self.calls.push(Call::StartReceive(capacity));
            self.armed = capacity;
            self.filled = 0;
            self.window = [0; 16];
            Ok(())
        }

        fn bytes_remaining(&self) -> usize {
            self.armed - self.filled
        }

        fn read_received(&self, out: &mut [u8]) {
            let n = out.len();
            out.copy_from_slice(&self.window[..n]);
        }
    }

    fn bus() -> BusConfig {
        BusConfig::new(
            BusId::Uart4,
            19_200,
            PinBinding::new(Port::C, 10).unwrap(),
            PinBinding::new(Port::C, 11).unwrap(),
        )
    }

    fn master() -> LinMaster<MockTransport> {
        LinMaster::new(MockTransport::new(), bus()).unwrap()
    }

    fn frame_bytes(id: u8, payload: &[u8]) -> Vec<u8> {
        let pid = protected_id(id);
        let mut bytes = Vec::new();
        bytes.push(SYNC_BYTE);
        bytes.push(pid);
        bytes.extend_from_slice(payload);
        bytes.push(classic_checksum(pid, payload));
        bytes
    }

    #[test]
    fn test_new_configures_transport() {
        let lin = master();
        assert_eq!(lin.transport.calls, [Call::Configure(19_200)]);
        assert_eq!(lin.bus(), BusId::Uart4);
        assert_eq!(lin.config().uart.baudrate, 19_200);
        assert!(lin.state().is_idle());
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let mut config = bus();
        config.uart.baudrate = 250_000;
        let result = LinMaster::new(MockTransport::new(), config);
        assert!(matches!(result, Err(Error::Config(ConfigError::BaudrateOutOfRange))));
    }

    #[test]
    fn test_request_frame_layout() {
        let mut lin = master();
        lin.request(0x05, &[0x10, 0x20, 0x30]).unwrap();

        assert_eq!(lin.transport.sent, [0x55, 0x85, 0x10, 0x20, 0x30, 0x1A]);
        assert_eq!(lin.state(), ExchangeState::AwaitingResponse { id: 0x05, sent: 6 });
    }

    #[test]
    fn test_header_only_request() {
        let mut lin = master();
        lin.request(0x3C, &[]).unwrap();

        assert_eq!(lin.transport.sent, [SYNC_BYTE, 0x3C]);
        assert_eq!(lin.state(), ExchangeState::AwaitingResponse { id: 0x3C, sent: 2 });
    }

    #[test]
    fn test_receive_armed_before_transmit() {
        let mut lin = master();
        lin.request(0x01, &[0xAA]).unwrap();

        assert_eq!(
            lin.transport.calls,
            [
                Call::Configure(19_200),
                Call::StartReceive(MAX_FRAME_SIZE),
                Call::Break,
                Call::Transmit(4),
            ]
        );
    }

    #[test]
    fn test_oversized_request_dropped() {
        let mut lin = master();
        let result = lin.request(0x05, &[0u8; 9]);

        assert_eq!(result, Err(Error::Frame(FrameError::PayloadTooLarge)));
        assert_eq!(lin.transport.calls, [Call::Configure(19_200)]);
        assert!(lin.transport.sent.is_empty());
        assert!(lin.state().is_idle());
    }

    #[test]
    fn test_oversized_request_keeps_previous_exchange() {
        let mut lin = master();
        lin.request(0x05, &[1, 2, 3]).unwrap();
        let _ = lin.request(0x06, &[0u8; 12]);

        assert_eq!(lin.state().pending_id(), Some(0x05));
        assert!(lin.has_received(0x05, 3));
    }

    #[test]
    fn test_loopback_roundtrip() {
        let mut lin = master();
        lin.request(0x05, &[0x10, 0x20, 0x30]).unwrap();

        assert!(lin.has_received(0x05, 3));
        assert!(!lin.has_received(0x05, 4));
        assert!(!lin.has_received(0x05, 2));
        assert!(!lin.has_received(0x06, 3));
    }

    #[test]
    fn test_slave_response() {
        let mut lin = master();
        lin.request(0x10, &[]).unwrap();

        assert!(!lin.has_received(0x10, 2));
        assert_eq!(lin.poll_response(0x10, 2), Err(FrameError::Incomplete));

        let pid = protected_id(0x10);
        lin.transport.respond(&[0xDE]);
        assert!(!lin.has_received(0x10, 2));

        lin.transport.respond(&[0xAD, classic_checksum(pid, &[0xDE, 0xAD])]);
        assert!(lin.has_received(0x10, 2));

        let frame = lin.poll_response(0x10, 2).unwrap();
        assert_eq!(frame.id, 0x10);
        assert_eq!(&frame.payload[..], &[0xDE, 0xAD]);
    }

    #[test]
    fn test_has_received_is_idempotent() {
        let mut lin = master();
        lin.request(0x05, &[7]).unwrap();

        for _ in 0..5 {
            assert!(lin.has_received(0x05, 1));
        }
        assert_eq!(lin.received_bytes(), 4);
    }

    #[test]
    fn test_nothing_received_before_request() {
        let lin = master();
        assert_eq!(lin.received_bytes(), 0);
        for len in 0..=MAX_PAYLOAD_SIZE {
            assert!(!lin.has_received(0x05, len));
        }
    }

    #[test]
    fn test_oversized_expected_length() {
        let mut lin = master();
        lin.request(0x05, &[0; 8]).unwrap();
        assert!(lin.has_received(0x05, 8));
        assert!(!lin.has_received(0x05, 9));
        assert_eq!(lin.poll_response(0x05, 9), Err(FrameError::PayloadTooLarge));
    }

    #[test]
    fn test_extra_bytes_rejected() {
        let mut lin = master();
        lin.request(0x05, &[1]).unwrap();
        lin.transport.respond(&[0x00]);

        assert_eq!(lin.poll_response(0x05, 1), Err(FrameError::LengthMismatch));
    }

    #[test]
    fn test_single_byte_corruption_rejected() {
        let payload = [0x11, 0x22, 0x33, 0x44];
        let good = frame_bytes(0x2A, &payload);

        // Position 0 is the sync byte, which is not validated
        for pos in 1..good.len() {
            let mut lin = master();
            lin.request(0x2A, &[]).unwrap();
            lin.transport.filled = 0;

            let mut bad = good.clone();
            bad[pos] ^= 0x01;
            lin.transport.respond(&bad);

            assert!(!lin.has_received(0x2A, payload.len()), "byte {} corrupted", pos);
        }
    }

    #[test]
    fn test_sync_byte_not_checked() {
        let mut lin = master();
        lin.request(0x2A, &[]).unwrap();
        lin.transport.filled = 0;

        let mut bytes = frame_bytes(0x2A, &[1, 2]);
        bytes[0] = 0x00;
        lin.transport.respond(&bytes);

        assert!(lin.has_received(0x2A, 2));
    }

    #[test]
    fn test_new_request_discards_previous_reception() {
        let mut lin = master();
        lin.request(0x05, &[1, 2, 3]).unwrap();
        assert!(lin.has_received(0x05, 3));

        lin.request(0x06, &[]).unwrap();
        assert!(!lin.has_received(0x05, 3));
        assert_eq!(lin.received_bytes(), 2);
        assert_eq!(lin.state().pending_id(), Some(0x06));
    }

    #[test]
    fn test_transport_error_aborts_exchange() {
        let mut lin = master();
        lin.request(0x05, &[1]).unwrap();

        lin.transport.fail_receive = true;
        let result = lin.request(0x06, &[2]);

        assert_eq!(result, Err(Error::Transport(TransportError::Busy)));
        assert!(lin.state().is_idle());
        assert!(!lin.has_received(0x05, 1));
    }

    #[test]
    fn test_release() {
        let lin = master();
        let (transport, config) = lin.release();
        assert_eq!(config, bus());
        assert_eq!(transport.calls.len(), 1);
    }
}
