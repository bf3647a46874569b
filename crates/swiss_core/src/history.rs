//! Opponents met so far, per player

use std::collections::HashMap;

use crate::round::Round;
use crate::types::PlayerId;

/// Derived index of past opponents.
///
/// Rounds are the source of truth: the index is rebuilt from them when a
/// tournament is loaded and appended to when a round is set up. It is never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpponentHistory {
    opponents: HashMap<PlayerId, Vec<PlayerId>>,
}

impl OpponentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay every materialized round
    pub fn rebuild<'a>(
        players: impl IntoIterator<Item = &'a PlayerId>,
        rounds: &[Option<Round>],
    ) -> Self {
        let mut history = Self::new();
        for player in players {
            history.register(player);
        }
        for round in rounds.iter().flatten() {
            for m in &round.matches {
                history.record(m.player1(), m.player2());
            }
        }
        history
    }

    /// Start tracking a player with no opponents yet
    pub fn register(&mut self, player: &PlayerId) {
        self.opponents.entry(player.clone()).or_default();
    }

    pub fn is_registered(&self, player: &PlayerId) -> bool {
        self.opponents.contains_key(player)
    }

    /// Record one game between `a` and `b`
    pub fn record(&mut self, a: &PlayerId, b: &PlayerId) {
        self.opponents.entry(a.clone()).or_default().push(b.clone());
        self.opponents.entry(b.clone()).or_default().push(a.clone());
    }

    /// Opponents of `player`, in the order they were met
    pub fn opponents(&self, player: &PlayerId) -> &[PlayerId] {
        self.opponents.get(player).map(Vec::as_slice).unwrap_or(&[])
    }

    /// How many times `a` and `b` have been paired together
    pub fn encounters(&self, a: &PlayerId, b: &PlayerId) -> usize {
        self.opponents(b).iter().filter(|id| *id == a).count()
    }

    pub fn have_met(&self, a: &PlayerId, b: &PlayerId) -> bool {
        self.opponents(a).contains(b)
    }
}
