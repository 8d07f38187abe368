//! Library side of the `revsyn` binary.
//!
//! The command implementations live here so integration tests can drive
//! them without spawning a process.

pub mod commands;
