//! Request/response exchange state
//!
//! At most one exchange is outstanding per bus. Starting a new request
//! replaces the previous one; there is no queue.

/// Exchange states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExchangeState {
    /// No request issued yet, or the last one failed to start
    #[default]
    Idle,
    /// Request on the wire; receive window armed
    AwaitingResponse {
        /// Frame id of the request
        id: u8,
        /// Bytes transmitted after the break
        sent: usize,
    },
}

impl ExchangeState {
    /// Check if no exchange is outstanding
    pub fn is_idle(&self) -> bool {
        matches!(self, ExchangeState::Idle)
    }

    /// Frame id of the outstanding exchange, if any
    pub fn pending_id(&self) -> Option<u8> {
        match self {
            ExchangeState::Idle => None,
            ExchangeState::AwaitingResponse { id, .. } => Some(*id),
        }
    }

    /// Process a request start and return the next state
    pub fn start(self, id: u8, sent: usize) -> Self {
        ExchangeState::AwaitingResponse { id, sent }
    }

    /// Process a transport failure and return the next state
    pub fn abort(self) -> Self {
        ExchangeState::Idle
    }
}
