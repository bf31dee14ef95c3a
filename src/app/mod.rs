//! Application core: pure domain logic, zero I/O.
//!
//! This module holds the keypad command pipeline orchestration and the
//! bridge-facing entry points.  All interaction with peripherals and the
//! network happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without hardware.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
