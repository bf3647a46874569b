use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CONFIG_FILE;

#[derive(Parser, Debug)]
#[command(author, version, about = "Swiss-system chess tournament manager")]
pub struct Cli {
    /// Configuration file
    #[arg(long, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Log at debug level, whatever the configured filter
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Add a player to the club roster
    AddPlayer {
        /// National player id, e.g. AB12345
        id: String,
        surname: String,
        name: String,
        /// Birthdate (YYYY-MM-DD)
        birthdate: NaiveDate,
    },
    /// Change a roster entry; omitted fields are kept
    EditPlayer {
        id: String,
        #[arg(long)]
        surname: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// Birthdate (YYYY-MM-DD)
        #[arg(long)]
        birthdate: Option<NaiveDate>,
    },
    /// List the club roster
    Players,
    /// Create a tournament and select it
    New {
        /// Number of rounds (defaults to the configured value)
        #[arg(short, long)]
        rounds: Option<u32>,
        #[arg(short, long, default_value = "")]
        location: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Planned start date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,
    },
    /// List known tournaments
    Tournaments,
    /// Select the tournament the following commands apply to
    Select { id: String },
    /// Register roster players in the selected tournament
    Register {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Change the details of the selected tournament. Location and start
    /// date are locked once the first round has started.
    EditTournament {
        #[arg(short, long)]
        location: Option<String>,
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Change the number of rounds of the selected tournament
    SetRounds { rounds: u32 },
    /// Pair the players and start the next round
    NextRound,
    /// Start a match of the current round
    StartMatch { index: usize },
    /// End a match of the current round; a draw without --winner
    EndMatch {
        index: usize,
        #[arg(short, long)]
        winner: Option<String>,
    },
    /// Show the ranking of the selected tournament
    Standings,
    /// Show the selected tournament and its current round
    Status,
}
