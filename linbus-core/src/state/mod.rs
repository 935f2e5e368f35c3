//! Exchange state for the LIN master
//!
//! The master tracks explicitly whether a request is outstanding. Polling
//! never changes the state; only a new request or a transport failure
//! does.

pub mod exchange;

pub use exchange::ExchangeState;
