//! Command-line interface module.

mod args;
pub mod common;
pub mod convert;
pub mod transform;

pub use args::{Cli, Commands, ConvertArgs, TransformArgs};
