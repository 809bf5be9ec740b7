//! Command-line front end for the `biography` binary.

pub mod args;
pub mod commands;
pub mod error;

pub use args::{Cli, Commands, ExportArgs};
pub use commands::{build_provider, build_repository, dispatch};
pub use error::{CliError, ExitCode};
