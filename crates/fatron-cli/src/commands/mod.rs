//! CLI subcommands.

pub mod batch;
pub mod output;
pub mod process;
