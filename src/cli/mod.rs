//! Command-line interface: clap definitions in [`commands`] and one handler module per
//! command group in [`handlers`].

pub mod commands;
pub mod handlers;

pub use commands::{Cli, Commands};
