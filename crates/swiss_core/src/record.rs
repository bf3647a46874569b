//! Persisted form of a tournament
//!
//! Players are reduced to their id string; rehydration goes through a
//! [`PlayerLookup`]. The rounds array keeps its fixed size with `null`
//! placeholders, and timestamps are ISO-8601 text so that they sort.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SwissError};
use crate::matches::{Match, LOSS};
use crate::metadata::TournamentMetaData;
use crate::round::Round;
use crate::tournament::Tournament;
use crate::types::{Player, PlayerId, PlayerLookup};

/// `[player_id, score]`; a missing score reads back as 0.0
pub type PlayerScoreRecord = (String, Option<f64>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub players: [PlayerScoreRecord; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub name: String,
    pub matches: Vec<MatchRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentRecord {
    pub tournament_id: String,
    pub metadata: TournamentMetaData,
    pub participants: Vec<String>,
    pub current_round_idx: Option<usize>,
    pub rounds: Vec<Option<RoundRecord>>,
}

impl From<&Match> for MatchRecord {
    fn from(m: &Match) -> Self {
        let [(p1, s1), (p2, s2)] = m.scores();
        Self {
            start_time: m.start_time(),
            end_time: m.end_time(),
            players: [
                (p1.to_string(), Some(*s1)),
                (p2.to_string(), Some(*s2)),
            ],
        }
    }
}

impl From<&Round> for RoundRecord {
    fn from(round: &Round) -> Self {
        Self {
            name: round.name.clone(),
            matches: round.matches.iter().map(MatchRecord::from).collect(),
        }
    }
}

impl MatchRecord {
    fn into_match(self, participants: &[Player]) -> Result<Match> {
        let [p1, p2] = self.players;
        let players = [resolve(p1, participants)?, resolve(p2, participants)?];
        Match::restore(players, self.start_time, self.end_time)
    }
}

fn resolve((id, score): PlayerScoreRecord, participants: &[Player]) -> Result<(PlayerId, f64)> {
    let player = participants
        .iter()
        .find(|p| p.id == id.as_str())
        .ok_or(SwissError::UnknownPlayer(id))?;
    Ok((player.id.clone(), score.unwrap_or(LOSS)))
}

impl Tournament {
    /// Snapshot of everything needed to rebuild this tournament
    pub fn to_record(&self) -> TournamentRecord {
        TournamentRecord {
            tournament_id: self.id().to_string(),
            metadata: self.metadata.clone(),
            participants: self
                .participants()
                .iter()
                .map(|p| p.id.to_string())
                .collect(),
            current_round_idx: self.current_round_idx(),
            rounds: self
                .rounds()
                .iter()
                .map(|slot| slot.as_ref().map(RoundRecord::from))
                .collect(),
        }
    }

    /// Rebuild a tournament, resolving every participant through `players`.
    ///
    /// Fails with `UnknownPlayer` as soon as one participant id cannot be
    /// resolved: a tournament is loaded entirely or not at all.
    pub fn from_record(record: TournamentRecord, players: &dyn PlayerLookup) -> Result<Self> {
        if record.tournament_id != record.metadata.tournament_id {
            return Err(SwissError::InvalidRecord(format!(
                "tournament id {} does not match its metadata ({})",
                record.tournament_id, record.metadata.tournament_id
            )));
        }

        let participants = record
            .participants
            .iter()
            .map(|id| {
                players
                    .find_player(id)
                    .ok_or_else(|| SwissError::UnknownPlayer(id.clone()))
            })
            .collect::<Result<Vec<Player>>>()?;

        let rounds = record
            .rounds
            .into_iter()
            .map(|slot| {
                slot.map(|round| -> Result<Round> {
                    let matches = round
                        .matches
                        .into_iter()
                        .map(|m| m.into_match(&participants))
                        .collect::<Result<Vec<Match>>>()?;
                    Ok(Round::with_matches(&round.name, matches))
                })
                .transpose()
            })
            .collect::<Result<Vec<Option<Round>>>>()?;

        Tournament::restore(
            record.metadata,
            participants,
            rounds,
            record.current_round_idx,
        )
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod record_tests;
