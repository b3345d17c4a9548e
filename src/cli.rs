//! Command line interface for the polarity binary.

pub mod args;
pub mod commands;
pub mod output;

pub use args::{Command, OutputFormat, PolarityArgs};
pub use commands::execute_command;
