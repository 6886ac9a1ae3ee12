//! entity-index CLI entry point
//!
//! All logic is delegated to the CLI module, which has already printed the
//! error response when `run` fails.

use entity_index::cli;

fn main() {
    if cli::run().is_err() {
        std::process::exit(1);
    }
}
