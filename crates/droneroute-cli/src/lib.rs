//! Drone routing CLI library.
//!
//! This crate provides the command-line utilities for the drone delivery
//! simulation: logging setup, terminal styling and output formatting.

pub mod logging;
pub mod output;
pub mod terminal;
