//! One round of a tournament: a fixed list of matches

use crate::matches::Match;
use crate::types::PlayerId;

/// A round of the tournament.
///
/// A round is created empty and filled once by [`Round::setup`]; it has
/// started as soon as it holds matches and ended when all of them have.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub name: String,
    pub matches: Vec<Match>,
}

impl Round {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            matches: Vec::new(),
        }
    }

    /// Rebuild a round from already existing matches
    pub fn with_matches(name: &str, matches: Vec<Match>) -> Self {
        Self {
            name: name.to_string(),
            matches,
        }
    }

    /// Create one unstarted match per pair, in pair order.
    pub fn setup(&mut self, pairs: &[(PlayerId, PlayerId)]) {
        self.matches = pairs
            .iter()
            .map(|(a, b)| Match::new(a.clone(), b.clone()))
            .collect();
    }

    pub fn has_started(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn has_ended(&self) -> bool {
        self.matches.iter().all(Match::has_ended)
    }

    /// The match `player` takes part in, if any
    pub fn find_player_match(&self, player: &PlayerId) -> Option<&Match> {
        self.matches.iter().find(|m| m.involves(player))
    }
}

#[cfg(test)]
#[path = "round_tests.rs"]
mod round_tests;
