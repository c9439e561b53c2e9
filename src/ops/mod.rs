//! High-level operations.
//!
//! This module contains the implementation of gangway commands.

pub mod doctor;

pub use doctor::{doctor, format_report, CheckResult, DoctorOptions, DoctorReport};
