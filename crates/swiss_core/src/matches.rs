//! A single game between two participants

use chrono::{Duration, Local, NaiveDateTime};

use crate::error::{Result, SwissError};
use crate::types::PlayerId;

/// Points for a won game
pub const WIN: f64 = 1.0;
/// Points each player receives for a drawn game
pub const DRAW: f64 = 0.5;
/// Points for a lost game (also the placeholder before the result is known)
pub const LOSS: f64 = 0.0;

/// Both participants with their score for this match, player 1 first
pub type MatchScores = [(PlayerId, f64); 2];

/// A match between two players of the same round.
///
/// Scores stay at `0.0` until [`Match::end`] records an outcome. A match that
/// has ended can be ended again to correct a wrongly entered result.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    players: MatchScores,
    start_time: Option<NaiveDateTime>,
    end_time: Option<NaiveDateTime>,
}

impl Match {
    /// Create an unstarted match with placeholder scores
    pub fn new(player1: PlayerId, player2: PlayerId) -> Self {
        Self {
            players: [(player1, LOSS), (player2, LOSS)],
            start_time: None,
            end_time: None,
        }
    }

    /// Rebuild a match from persisted state.
    ///
    /// Fails if the end time is set without a start time or is not later
    /// than the start time.
    pub fn restore(
        players: MatchScores,
        start_time: Option<NaiveDateTime>,
        end_time: Option<NaiveDateTime>,
    ) -> Result<Self> {
        match (start_time, end_time) {
            (None, Some(_)) => return Err(SwissError::NotStarted("match")),
            (Some(start), Some(end)) if end <= start => return Err(SwissError::InvalidTimeOrder),
            _ => {}
        }
        Ok(Self {
            players,
            start_time,
            end_time,
        })
    }

    pub fn player1(&self) -> &PlayerId {
        &self.players[0].0
    }

    pub fn player2(&self) -> &PlayerId {
        &self.players[1].0
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }

    /// Whether `player` is one of the two participants
    pub fn involves(&self, player: &PlayerId) -> bool {
        self.player1() == player || self.player2() == player
    }

    /// The participant facing `player`, if `player` plays in this match
    pub fn opponent_of(&self, player: &PlayerId) -> Option<&PlayerId> {
        if self.player1() == player {
            Some(self.player2())
        } else if self.player2() == player {
            Some(self.player1())
        } else {
            None
        }
    }

    /// Start the match now, or at `start_time` when given.
    pub fn start(&mut self, start_time: Option<NaiveDateTime>) -> Result<()> {
        if self.start_time.is_some() {
            return Err(SwissError::AlreadyStarted("match"));
        }
        self.start_time = Some(start_time.unwrap_or_else(now));
        Ok(())
    }

    /// Record the outcome and return both scores.
    ///
    /// `winner == None` records a draw. The end time defaults to now, but
    /// only the first time: correcting the outcome of an ended match keeps
    /// its recorded end time unless a new one is given.
    pub fn end(
        &mut self,
        winner: Option<&PlayerId>,
        end_time: Option<NaiveDateTime>,
    ) -> Result<&MatchScores> {
        let start = self.start_time.ok_or(SwissError::NotStarted("match"))?;
        if let Some(end) = end_time {
            if end <= start {
                return Err(SwissError::InvalidTimeOrder);
            }
        }
        let (score1, score2) = match winner {
            None => (DRAW, DRAW),
            Some(id) if id == self.player1() => (WIN, LOSS),
            Some(id) if id == self.player2() => (LOSS, WIN),
            Some(id) => return Err(SwissError::unknown(id)),
        };

        match end_time {
            Some(end) => self.end_time = Some(end),
            // Never earlier than one second after the start, even if the
            // start was entered ahead of the clock.
            None if self.end_time.is_none() => {
                self.end_time = Some(now().max(start + Duration::seconds(1)))
            }
            None => {}
        }
        self.players[0].1 = score1;
        self.players[1].1 = score2;
        Ok(&self.players)
    }

    /// Current score of one participant
    pub fn player_score(&self, player: &PlayerId) -> Result<f64> {
        self.players
            .iter()
            .find(|(id, _)| id == player)
            .map(|(_, score)| *score)
            .ok_or_else(|| SwissError::unknown(player))
    }

    /// Both participants with their current score
    pub fn scores(&self) -> &MatchScores {
        &self.players
    }

    pub fn has_started(&self) -> bool {
        self.start_time.is_some()
    }

    pub fn has_ended(&self) -> bool {
        self.end_time.is_some()
    }
}

/// Local wall-clock time
pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
#[path = "matches_tests.rs"]
mod matches_tests;
