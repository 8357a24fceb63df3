//! API layer - operator console entry point.

pub mod console;

pub use console::{parse, ConsoleCommand, ConsoleError};
