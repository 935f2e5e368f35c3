//! Configuration types
//!
//! Bus bindings are plain values passed at construction; there is no
//! global peripheral table.

pub mod bus;

pub use bus::*;
