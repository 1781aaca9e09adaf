//! Adapters — concrete implementations of the capability port traits.
//!
//! `sim` provides the in-memory hardware used by the host binary and the
//! test suite; `console` provides the diagnostic-output adapters. A real
//! target adds its own adapter module implementing the same traits over
//! MCU registers.

pub mod console;
pub mod sim;
