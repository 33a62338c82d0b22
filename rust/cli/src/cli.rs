//! Command-line argument definitions.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "pokerlab", version, about = "Texas Hold'em engine tools")]
pub struct PokerlabCli {
    /// Emit engine and session logs to stderr (RUST_LOG overrides the filter)
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Play an all-AI table through the session registry
    Sim {
        /// Number of hands to play
        #[arg(long, default_value_t = 100)]
        hands: u64,
        /// AI seats at the table (2-8); defaults to the configured value
        #[arg(long, value_parser = clap::value_parser!(u8).range(2..=8))]
        players: Option<u8>,
        /// Shuffle and decision seed
        #[arg(long)]
        seed: Option<u64>,
        /// Write completed hands to this JSONL file
        #[arg(long)]
        output: Option<String>,
    },
    /// Evaluate 2 to 7 cards, e.g. "Ah Kh Qh Jh Th"
    Eval {
        cards: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}
