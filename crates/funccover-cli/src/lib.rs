//! funccover CLI library
//!
//! Command-line driver for the `funccover` instrumenter: argument parsing,
//! logging setup, and the `instrument` and `scan` subcommands.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod error;
pub mod handlers;
mod logging;

pub use commands::{Cli, Commands, InstrumentArgs, ScanArgs, ScanFormat};
pub use error::{CliError, CliResult};
pub use logging::{init_logging, Verbosity};
