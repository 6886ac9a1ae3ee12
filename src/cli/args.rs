//! CLI argument definitions using clap
//!
//! Commands:
//! - entity-index query --config <path> --data <path> --where <json>
//! - entity-index stats --config <path> --data <path>
//! - entity-index order --config <path> --data <path> --field <name>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// entity-index - inspect candidate selection over a JSON data set
#[derive(Parser, Debug)]
#[command(name = "entity-index")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Emit per-query TRACE log lines
    #[arg(long, global = true)]
    pub trace: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Index configuration and the entities to load into it
#[derive(Args, Debug, Clone)]
pub struct Source {
    /// Path to the index configuration file
    #[arg(long, default_value = "./indexes.json")]
    pub config: PathBuf,

    /// Path to a JSON array of entities
    #[arg(long)]
    pub data: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a predicate into candidate IDs
    Query {
        #[command(flatten)]
        source: Source,

        /// Predicate as a JSON object, e.g. '{"genre":{"in":["a","b"]}}'
        #[arg(long = "where")]
        predicate: String,

        /// Re-check candidates against the entities and report the true matches
        #[arg(long)]
        verify: bool,
    },

    /// Print per-index statistics
    Stats {
        #[command(flatten)]
        source: Source,
    },

    /// Print entity IDs in the order of a number or date field
    Order {
        #[command(flatten)]
        source: Source,

        /// Indexed number or date field
        #[arg(long)]
        field: String,

        /// Descending order
        #[arg(long)]
        desc: bool,

        #[arg(long, default_value_t = 0)]
        offset: usize,

        #[arg(long)]
        limit: Option<usize>,

        /// Only traverse entities that may match this predicate
        #[arg(long = "where")]
        predicate: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
