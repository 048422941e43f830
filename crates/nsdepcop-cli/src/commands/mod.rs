//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod input;
pub mod output;
pub mod show_config;
