//! login-e2e CLI library
//!
//! Argument parsing, configuration layering and report rendering for the
//! `login-e2e` binary.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
mod output;

pub use commands::{Cli, ColorArg, FormatArg};
pub use config::{resolve_suite_config, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::ReportRenderer;
