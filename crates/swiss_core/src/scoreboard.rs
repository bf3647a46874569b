//! Cumulative scores and dense ranking

use std::collections::HashMap;

use crate::round::Round;
use crate::types::PlayerId;

/// One line of the ranking list
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub player: PlayerId,
    pub rank: u32,
    pub score: f64,
}

/// Cached rank table.
///
/// Players are grouped by cumulative score; distinct scores are sorted in
/// descending order and each score tier gets the next dense rank starting
/// at 1. Inside a tier players keep their registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBoard {
    standings: Vec<Standing>,
    index: HashMap<PlayerId, usize>,
}

impl ScoreBoard {
    /// Rank `players` (registration order) from the scores recorded in `rounds`
    pub fn compute<'a>(
        players: impl IntoIterator<Item = &'a PlayerId>,
        rounds: &[Option<Round>],
    ) -> Self {
        let mut scored: Vec<(PlayerId, f64)> = players
            .into_iter()
            .map(|p| (p.clone(), player_score(p, rounds)))
            .collect();
        // Stable sort keeps registration order within a tier
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut standings = Vec::with_capacity(scored.len());
        let mut rank = 0;
        let mut previous: Option<f64> = None;
        for (player, score) in scored {
            if previous != Some(score) {
                rank += 1;
                previous = Some(score);
            }
            standings.push(Standing {
                player,
                rank,
                score,
            });
        }

        let index = standings
            .iter()
            .enumerate()
            .map(|(i, s)| (s.player.clone(), i))
            .collect();
        Self { standings, index }
    }

    /// Every ranked player, best first
    pub fn standings(&self) -> &[Standing] {
        &self.standings
    }

    pub fn get(&self, player: &PlayerId) -> Option<&Standing> {
        self.index.get(player).map(|&i| &self.standings[i])
    }

    pub fn rank(&self, player: &PlayerId) -> Option<u32> {
        self.get(player).map(|s| s.rank)
    }

    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }
}

/// Sum of a player's scores over every started round.
///
/// Rounds not played yet, and unfinished matches, count for 0.
pub fn player_score(player: &PlayerId, rounds: &[Option<Round>]) -> f64 {
    rounds
        .iter()
        .flatten()
        .filter(|round| round.has_started())
        .filter_map(|round| round.find_player_match(player))
        .filter_map(|m| m.player_score(player).ok())
        .sum()
}

#[cfg(test)]
#[path = "scoreboard_tests.rs"]
mod scoreboard_tests;
