#![forbid(unsafe_code)]

//! Windowed list demo library.
//!
//! Exposes the application model and CLI parsing so integration tests can
//! drive the demo through the program simulator.

pub mod app;
pub mod cli;
