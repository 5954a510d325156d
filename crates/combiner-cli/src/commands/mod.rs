//! CLI command implementations.

pub mod audio;
pub mod combine;
pub mod project;
