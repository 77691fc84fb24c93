//! CLI command implementations.

pub mod doctor;
pub mod identify;
pub mod programs;
