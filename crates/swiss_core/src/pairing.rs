//! Pairing engine: who plays whom in the next round
//!
//! The first round is drawn at random. Later rounds follow the ranking list
//! (rank-adjacent players meet) and then try to undo repeat pairings with
//! local swaps between neighbouring pairs. This is a greedy heuristic, not a
//! minimum-repeat perfect matching: a repeat that no neighbouring swap can fix
//! is left in place.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::{Result, SwissError};
use crate::history::OpponentHistory;
use crate::scoreboard::ScoreBoard;
use crate::types::PlayerId;

/// Two players facing each other, player 1 first
pub type Pair = (PlayerId, PlayerId);

/// Offsets of the pairs considered when repairing a repeat pairing
const SWAP_NEIGHBOURS: [isize; 4] = [-1, 1, -2, 2];

/// Shuffle `players` and pair them in order (0-1, 2-3, ...).
pub fn random_pairs<R: Rng + ?Sized>(players: &[PlayerId], rng: &mut R) -> Result<Vec<Pair>> {
    if players.len() % 2 != 0 {
        return Err(SwissError::OddParticipants(players.len()));
    }
    let mut order = players.to_vec();
    order.shuffle(rng);
    Ok(consecutive_pairs(&order))
}

fn consecutive_pairs(order: &[PlayerId]) -> Vec<Pair> {
    order
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}

/// Pairs players by rank while avoiding players who already met.
pub struct PairingEngine<'a> {
    ranking: &'a ScoreBoard,
    history: &'a OpponentHistory,
}

impl<'a> PairingEngine<'a> {
    pub fn new(ranking: &'a ScoreBoard, history: &'a OpponentHistory) -> Self {
        Self { ranking, history }
    }

    /// Playability of a pairing.
    ///
    /// 0 when the ranks differ by more than one tier (or a player is not
    /// ranked), otherwise `1 / (1 + encounters)`: a first meeting scores 1.0
    /// and every previous game between the two lowers the score.
    pub fn can_play(&self, a: &PlayerId, b: &PlayerId) -> f64 {
        match (self.ranking.rank(a), self.ranking.rank(b)) {
            (Some(rank_a), Some(rank_b)) if rank_a.abs_diff(rank_b) <= 1 => {
                1.0 / (1.0 + self.history.encounters(a, b) as f64)
            }
            _ => 0.0,
        }
    }

    /// Pair every ranked player for the next round.
    pub fn make_pairs(&self) -> Result<Vec<Pair>> {
        let order: Vec<PlayerId> = self
            .ranking
            .standings()
            .iter()
            .map(|s| s.player.clone())
            .collect();
        if order.len() % 2 != 0 {
            return Err(SwissError::OddParticipants(order.len()));
        }

        // Naive pass: follow the ranking list
        let mut pairs = consecutive_pairs(&order);
        let mut recurring = Vec::new();
        for (i, (a, b)) in pairs.iter().enumerate() {
            debug!(
                "Match {}: {} vs {}, quality = {:.2}",
                i,
                a,
                b,
                self.can_play(a, b)
            );
            if self.history.have_met(a, b) {
                debug!("  recurring pair at match {}: ({}, {})", i, a, b);
                recurring.push(i);
            }
        }

        if !recurring.is_empty() {
            debug!("Trying to solve {} recurring matches", recurring.len());
        }
        // Latest discovered first
        while let Some(i) = recurring.pop() {
            self.repair(&mut pairs, i);
        }

        debug!(
            "Pairs = {}",
            pairs
                .iter()
                .map(|(a, b)| format!("({}, {})", a, b))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(pairs)
    }

    /// Swap players of pair `i` with a neighbouring pair when both new pairs
    /// are strictly more playable than pair `i` is now.
    fn repair(&self, pairs: &mut [Pair], i: usize) -> bool {
        let (p1, p2) = pairs[i].clone();
        let current = self.can_play(&p1, &p2);
        if current >= 1.0 {
            debug!("Match {} is already resolved", i);
            return true;
        }

        let neighbours = SWAP_NEIGHBOURS
            .iter()
            .filter_map(|&offset| i.checked_add_signed(offset))
            .filter(|&j| j != i && j < pairs.len());
        for j in neighbours {
            let (p3, p4) = pairs[j].clone();
            if self.can_play(&p1, &p3) > current && self.can_play(&p2, &p4) > current {
                debug!("  swap with match {}: ({}, {}) + ({}, {})", j, p1, p3, p2, p4);
                pairs[i] = (p1, p3);
                pairs[j] = (p2, p4);
                return true;
            }
            if self.can_play(&p1, &p4) > current && self.can_play(&p2, &p3) > current {
                debug!("  swap with match {}: ({}, {}) + ({}, {})", j, p1, p4, p2, p3);
                pairs[i] = (p1, p4);
                pairs[j] = (p2, p3);
                return true;
            }
        }

        warn!("Could not avoid repeat pairing {} vs {}", p1, p2);
        false
    }
}

#[cfg(test)]
#[path = "pairing_tests.rs"]
mod pairing_tests;
