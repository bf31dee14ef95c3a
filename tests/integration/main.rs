//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that drives the application core together
//! with the real host-side drivers and adapters.  No hardware required.

mod bridge_tests;
mod indicator_tests;
mod keypad_flow_tests;
mod mock_hw;
