//! Command-line interface module.

mod args;
pub mod base;
pub mod check;

pub use args::{CheckArgs, Cli, Commands};
