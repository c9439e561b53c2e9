//! Command implementations

pub mod doctor;
pub mod layout;
pub mod targets;
