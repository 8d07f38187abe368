//! CLI command implementations.

pub mod common;
pub mod cost;
pub mod simulate;
pub mod synth;
pub mod version;
