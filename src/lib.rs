//! Alarm keypad firmware library.
//!
//! Exposes the pure-logic modules for integration testing. All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]` within
//! each module and replaced by an in-memory simulation on the host.

#![deny(unused_must_use)]

pub mod alarm;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod keypad;
pub mod pins;
pub mod tones;
pub mod uptime;

pub mod adapters;
pub mod drivers;
