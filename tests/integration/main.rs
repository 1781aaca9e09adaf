//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a subsystem against
//! the in-memory simulation adapters.  All tests run on the host with
//! no real hardware required.

mod sim_rig;
mod supervisor_tests;
