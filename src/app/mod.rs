//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the sampling rules: session lifecycle, liveness
//! tracking, and failure handling.  All interaction with the motion
//! facility, timers, and observers happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without a sensor.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
