//! Descriptive tournament data, also used for listing tournaments

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of rounds for a club tournament
pub const DEFAULT_ROUND_COUNT: u32 = 4;

/// Lifecycle state of a tournament, derived from its rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    #[default]
    Open,
    Running,
    Ended,
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TournamentStatus::Open => "open",
            TournamentStatus::Running => "running",
            TournamentStatus::Ended => "ended",
        };
        f.write_str(s)
    }
}

/// Identity and description of a tournament.
///
/// `status` and `end_date` are caches refreshed by the owning
/// [`Tournament`](crate::Tournament); they are stored so that tournaments can
/// be listed without loading their rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentMetaData {
    pub tournament_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location: String,
    pub description: String,
    pub round_count: u32,
    pub status: TournamentStatus,
}

impl TournamentMetaData {
    pub fn new(tournament_id: &str) -> Self {
        Self {
            tournament_id: tournament_id.to_string(),
            start_date: None,
            end_date: None,
            location: String::new(),
            description: String::new(),
            round_count: DEFAULT_ROUND_COUNT,
            status: TournamentStatus::Open,
        }
    }

    pub fn with_rounds(mut self, round_count: u32) -> Self {
        self.round_count = round_count;
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = location.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }
}
