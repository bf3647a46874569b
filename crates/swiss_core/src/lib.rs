//! Swiss-system tournament engine for chess clubs
//!
//! This crate provides:
//! - Matches and rounds with their start/end lifecycle
//! - A dense-rank score board computed from round history
//! - A pairing engine that follows the ranking and avoids repeat games
//! - The tournament state machine (open → running → ended)
//! - A serializable record form for persistence
//!
//! Everything here is synchronous and free of I/O; storing tournaments is up
//! to the caller.

pub mod error;
pub mod history;
pub mod matches;
pub mod metadata;
pub mod pairing;
pub mod record;
pub mod round;
pub mod scoreboard;
pub mod tournament;
pub mod types;

pub use error::{Result, SwissError};
pub use history::OpponentHistory;
pub use matches::{Match, MatchScores, DRAW, LOSS, WIN};
pub use metadata::{TournamentMetaData, TournamentStatus, DEFAULT_ROUND_COUNT};
pub use pairing::{random_pairs, Pair, PairingEngine};
pub use record::{MatchRecord, RoundRecord, TournamentRecord};
pub use round::Round;
pub use scoreboard::{ScoreBoard, Standing};
pub use tournament::Tournament;
pub use types::{is_valid_player_id, Player, PlayerId, PlayerLookup};
