//! Command line interface for minichain

pub mod commands;

pub use commands::run_cli;
