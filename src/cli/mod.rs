// Command-line layer
pub mod commands;

pub use commands::*;
