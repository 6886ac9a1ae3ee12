//! CLI module for entity-index
//!
//! Offline inspection of candidate selection:
//! - query: Resolve a predicate into candidate IDs and the query plan
//! - stats: Per-index statistics
//! - order: Ordered traversal of a number or date field

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, Source};
pub use commands::{load, order, parse_predicate, query, run, run_command, stats};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_response, ok_response, write_error, write_response};
