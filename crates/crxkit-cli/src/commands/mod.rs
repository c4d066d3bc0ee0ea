//! Command implementations for the crxkit CLI.
//!
//! - [`build`] - Production build and deploy
//! - [`dev`] - Development server with live reload
//!
//! Each command provides an `execute` function that takes the parsed command
//! arguments and returns a Result. This is the only layer that reads the
//! process environment.

pub mod build;
pub mod dev;
pub mod utils;

pub use build::execute as build_execute;
pub use dev::execute as dev_execute;
