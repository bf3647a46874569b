//! Tournament lifecycle: registration, rounds, matches and standings
//!
//! ```text
//! open ──start_next_round()──▶ running ──last round ended──▶ ended
//! ```
//!
//! The status is a pure function of the rounds; `metadata.status` only caches
//! it for listings.

use chrono::{NaiveDate, NaiveDateTime};
use rand::{thread_rng, Rng};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::error::{Result, SwissError};
use crate::history::OpponentHistory;
use crate::matches::{now, Match, MatchScores};
use crate::metadata::{TournamentMetaData, TournamentStatus};
use crate::pairing::{random_pairs, Pair, PairingEngine};
use crate::round::Round;
use crate::scoreboard::{player_score, ScoreBoard, Standing};
use crate::types::{Player, PlayerId};

/// A Swiss-system tournament.
///
/// Owns its participants (in registration order) and a fixed array of
/// `round_count` round slots, filled one by one as rounds start.
#[derive(Debug, Clone)]
pub struct Tournament {
    pub metadata: TournamentMetaData,
    participants: Vec<Player>,
    rounds: Vec<Option<Round>>,
    current_round_idx: Option<usize>,
    history: OpponentHistory,
    score_board: ScoreBoard,
}

impl Tournament {
    /// Create an open tournament with `metadata.round_count` empty round slots.
    pub fn new(metadata: TournamentMetaData) -> Result<Self> {
        if metadata.round_count == 0 {
            return Err(SwissError::InvalidRoundCount);
        }
        let rounds = vec![None; metadata.round_count as usize];
        let mut tournament = Self {
            metadata,
            participants: Vec::new(),
            rounds,
            current_round_idx: None,
            history: OpponentHistory::new(),
            score_board: ScoreBoard::default(),
        };
        tournament.metadata.status = tournament.status();
        Ok(tournament)
    }

    /// Rebuild a tournament from its persisted parts.
    ///
    /// Started rounds must fill the first slots up to `current_round_idx`, and
    /// each must pair every participant exactly once. The opponent history is
    /// replayed from the rounds, then the score board, end date and status are
    /// recomputed.
    pub fn restore(
        metadata: TournamentMetaData,
        participants: Vec<Player>,
        rounds: Vec<Option<Round>>,
        current_round_idx: Option<usize>,
    ) -> Result<Self> {
        if rounds.len() != metadata.round_count as usize {
            return Err(SwissError::InvalidRecord(format!(
                "{} round slots for a {} round tournament",
                rounds.len(),
                metadata.round_count
            )));
        }
        if metadata.round_count == 0 {
            return Err(SwissError::InvalidRoundCount);
        }

        let mut registered = HashSet::new();
        for player in &participants {
            if !registered.insert(&player.id) {
                return Err(SwissError::InvalidRecord(format!(
                    "duplicate participant {}",
                    player.id
                )));
            }
        }
        for m in rounds.iter().flatten().flat_map(|r| r.matches.iter()) {
            for id in [m.player1(), m.player2()] {
                if !registered.contains(id) {
                    return Err(SwissError::unknown(id));
                }
            }
        }

        // Started rounds form a prefix of the slots, ending at the current round
        let filled = rounds.iter().take_while(|slot| slot.is_some()).count();
        if rounds[filled..].iter().any(Option::is_some) {
            return Err(SwissError::InvalidRecord(format!(
                "round {} is missing before a later started round",
                filled + 1
            )));
        }
        if current_round_idx != filled.checked_sub(1) {
            return Err(SwissError::InvalidRecord(
                "current round index does not match the started rounds".to_string(),
            ));
        }
        for round in rounds.iter().flatten() {
            let mut paired = HashSet::new();
            for id in round.matches.iter().flat_map(|m| [m.player1(), m.player2()]) {
                if !paired.insert(id) {
                    return Err(SwissError::InvalidRecord(format!(
                        "{} is paired twice in {}",
                        id, round.name
                    )));
                }
            }
            if paired.len() != participants.len() || round.matches.is_empty() {
                return Err(SwissError::InvalidRecord(format!(
                    "{} does not pair every participant",
                    round.name
                )));
            }
        }

        let history = OpponentHistory::rebuild(participants.iter().map(|p| &p.id), &rounds);
        let mut tournament = Self {
            metadata,
            participants,
            rounds,
            current_round_idx,
            history,
            score_board: ScoreBoard::default(),
        };
        tournament.update_score_board();
        tournament.update_end_date();
        Ok(tournament)
    }

    pub fn id(&self) -> &str {
        &self.metadata.tournament_id
    }

    pub fn participants(&self) -> &[Player] {
        &self.participants
    }

    pub fn participant(&self, id: &PlayerId) -> Option<&Player> {
        self.participants.iter().find(|p| &p.id == id)
    }

    pub fn player_is_registered(&self, id: &PlayerId) -> bool {
        self.history.is_registered(id)
    }

    /// Every round slot; `None` for rounds not started yet
    pub fn rounds(&self) -> &[Option<Round>] {
        &self.rounds
    }

    pub fn current_round_idx(&self) -> Option<usize> {
        self.current_round_idx
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.metadata.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.metadata.end_date
    }

    // ------------------------------------------------------------------
    // Registration and configuration (open tournaments only)
    // ------------------------------------------------------------------

    /// Register a player. Returns `false` if the player was already registered.
    pub fn add_participant(&mut self, player: Player) -> Result<bool> {
        if self.has_started() {
            return Err(SwissError::AlreadyStarted("tournament"));
        }
        if self.player_is_registered(&player.id) {
            return Ok(false);
        }
        debug!("Registering {} in tournament {}", player.id, self.id());
        self.history.register(&player.id);
        self.participants.push(player);
        Ok(true)
    }

    /// Change how many rounds the tournament lasts
    pub fn set_rounds(&mut self, round_count: u32) -> Result<()> {
        if self.has_started() {
            return Err(SwissError::AlreadyStarted("tournament"));
        }
        if round_count == 0 {
            return Err(SwissError::InvalidRoundCount);
        }
        self.metadata.round_count = round_count;
        self.rounds = vec![None; round_count as usize];
        Ok(())
    }

    pub fn set_start_date(&mut self, start_date: NaiveDate) -> Result<()> {
        if self.has_started() {
            return Err(SwissError::AlreadyStarted("tournament"));
        }
        self.metadata.start_date = Some(start_date);
        Ok(())
    }

    pub fn set_location(&mut self, location: &str) -> Result<()> {
        if self.has_started() {
            return Err(SwissError::AlreadyStarted("tournament"));
        }
        self.metadata.location = location.to_string();
        Ok(())
    }

    /// The description can be edited at any time
    pub fn set_description(&mut self, description: &str) {
        self.metadata.description = description.to_string();
    }

    // ------------------------------------------------------------------
    // State machine
    // ------------------------------------------------------------------

    pub fn has_started(&self) -> bool {
        matches!(self.rounds.first(), Some(Some(round)) if round.has_started())
    }

    pub fn has_ended(&self) -> bool {
        matches!(self.rounds.last(), Some(Some(round)) if round.has_started() && round.has_ended())
    }

    pub fn status(&self) -> TournamentStatus {
        if !self.has_started() {
            TournamentStatus::Open
        } else if self.has_ended() {
            TournamentStatus::Ended
        } else {
            TournamentStatus::Running
        }
    }

    /// The round being played: `None` before the first round and once the
    /// tournament has ended.
    pub fn current_round(&self) -> Option<&Round> {
        if self.has_ended() || !self.has_started() {
            return None;
        }
        self.current_round_idx
            .and_then(|idx| self.rounds.get(idx))
            .and_then(Option::as_ref)
    }

    /// Whether [`Tournament::start_next_round`] would succeed
    pub fn can_start(&self) -> bool {
        self.check_transition().is_ok()
    }

    fn check_transition(&self) -> Result<()> {
        if self.current_round_idx == Some(self.rounds.len() - 1) {
            return Err(SwissError::InvalidTransition("last round already reached"));
        }
        if let Some(round) = self
            .current_round_idx
            .and_then(|idx| self.rounds.get(idx))
            .and_then(Option::as_ref)
        {
            if !round.has_ended() {
                return Err(SwissError::InvalidTransition("current round has not ended"));
            }
        }
        if self.has_ended() {
            return Err(SwissError::InvalidTransition("tournament has ended"));
        }
        if self.participants.is_empty() {
            return Err(SwissError::NoParticipants);
        }
        if self.participants.len() % 2 != 0 {
            return Err(SwissError::OddParticipants(self.participants.len()));
        }
        Ok(())
    }

    /// Start the next round, with the given pairs or with pairs from the
    /// pairing engine.
    pub fn start_next_round(&mut self, pairs: Option<Vec<Pair>>) -> Result<&Round> {
        self.start_next_round_with_rng(pairs, &mut thread_rng())
    }

    /// Same as [`Tournament::start_next_round`], drawing the first round
    /// from `rng`.
    pub fn start_next_round_with_rng<R: Rng + ?Sized>(
        &mut self,
        pairs: Option<Vec<Pair>>,
        rng: &mut R,
    ) -> Result<&Round> {
        self.check_transition()?;
        let pairs = match pairs {
            Some(pairs) => {
                self.validate_pairs(&pairs)?;
                pairs
            }
            None => self.make_player_pairs(rng)?,
        };

        let idx = self.current_round_idx.map_or(0, |idx| idx + 1);
        let mut round = Round::new(&format!("Round {}", idx + 1));
        round.setup(&pairs);
        for (a, b) in &pairs {
            self.history.record(a, b);
        }
        self.current_round_idx = Some(idx);
        if idx == 0 && self.metadata.start_date.is_none() {
            self.metadata.start_date = Some(now().date());
        }
        self.metadata.status = TournamentStatus::Running;
        info!(
            "Tournament {}: {} started with {} matches",
            self.metadata.tournament_id,
            round.name,
            round.matches.len()
        );
        Ok(&*self.rounds[idx].insert(round))
    }

    /// Every participant exactly once, nobody unknown
    fn validate_pairs(&self, pairs: &[Pair]) -> Result<()> {
        let mut seen = HashSet::new();
        for id in pairs.iter().flat_map(|(a, b)| [a, b]) {
            if !self.player_is_registered(id) {
                return Err(SwissError::unknown(id));
            }
            if !seen.insert(id) {
                return Err(SwissError::InvalidPairing(format!("{} is paired twice", id)));
            }
        }
        if seen.len() != self.participants.len() {
            return Err(SwissError::InvalidPairing(format!(
                "{} of {} participants paired",
                seen.len(),
                self.participants.len()
            )));
        }
        Ok(())
    }

    /// Pairs for the next round: a random draw for the first round, then
    /// rank-based pairing avoiding repeat games.
    pub fn make_player_pairs<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<Pair>> {
        if !self.has_started() {
            let ids: Vec<PlayerId> = self.participants.iter().map(|p| p.id.clone()).collect();
            return random_pairs(&ids, rng);
        }
        debug!(
            "Making player pairs for round {}",
            self.current_round_idx.map_or(1, |idx| idx + 2)
        );
        self.update_score_board();
        PairingEngine::new(&self.score_board, &self.history).make_pairs()
    }

    /// Playability of a pairing between `a` and `b`, from the cached ranks
    pub fn can_play(&self, a: &PlayerId, b: &PlayerId) -> f64 {
        PairingEngine::new(&self.score_board, &self.history).can_play(a, b)
    }

    // ------------------------------------------------------------------
    // Matches of the current round
    // ------------------------------------------------------------------

    /// Index of the current round while it is in play
    fn playing_round_idx(&self) -> Option<usize> {
        let round = self.current_round()?;
        if !round.has_started() || round.has_ended() {
            return None;
        }
        self.current_round_idx
    }

    /// Matches of the current round that have not started, with their index
    pub fn pending_matches(&self) -> Vec<(usize, &Match)> {
        self.current_matches(|m| !m.has_started())
    }

    /// Matches of the current round that started but have not ended
    pub fn running_matches(&self) -> Vec<(usize, &Match)> {
        self.current_matches(|m| m.has_started() && !m.has_ended())
    }

    pub fn has_pending_matches(&self) -> bool {
        !self.pending_matches().is_empty()
    }

    pub fn has_running_matches(&self) -> bool {
        !self.running_matches().is_empty()
    }

    fn current_matches(&self, keep: impl Fn(&Match) -> bool) -> Vec<(usize, &Match)> {
        let Some(round) = self.playing_round_idx().and_then(|idx| self.rounds[idx].as_ref())
        else {
            return Vec::new();
        };
        round
            .matches
            .iter()
            .enumerate()
            .filter(|(_, m)| keep(*m))
            .collect()
    }

    /// Start match `index` of the current round.
    ///
    /// Returns `None` when no round is in play. On the first round the
    /// tournament start date follows the date the match actually started.
    pub fn start_a_match(
        &mut self,
        index: usize,
        start_time: Option<NaiveDateTime>,
    ) -> Result<Option<&Match>> {
        let Some(idx) = self.playing_round_idx() else {
            return Ok(None);
        };
        let Some(round) = self.rounds[idx].as_mut() else {
            return Ok(None);
        };
        let m = round
            .matches
            .get_mut(index)
            .ok_or(SwissError::NoSuchMatch(index))?;
        m.start(start_time)?;
        let started = m.start_time().map(|t| t.date());
        debug!("Match {} of {} started", index, round.name);

        if idx == 0 && started.is_some() && self.metadata.start_date != started {
            self.metadata.start_date = started;
        }
        Ok(self.rounds[idx].as_ref().and_then(|r| r.matches.get(index)))
    }

    /// Record the outcome of match `index` of the current round
    /// (`winner == None` for a draw) and refresh the standings.
    ///
    /// Returns `None` when no round is in play.
    pub fn end_a_match(
        &mut self,
        index: usize,
        winner: Option<&PlayerId>,
        end_time: Option<NaiveDateTime>,
    ) -> Result<Option<MatchScores>> {
        let Some(idx) = self.playing_round_idx() else {
            return Ok(None);
        };
        let Some(round) = self.rounds[idx].as_mut() else {
            return Ok(None);
        };
        let m = round
            .matches
            .get_mut(index)
            .ok_or(SwissError::NoSuchMatch(index))?;
        let scores = m.end(winner, end_time)?.clone();
        debug!(
            "Match {} of {} ended: {} {} - {} {}",
            index, round.name, scores[0].0, scores[0].1, scores[1].1, scores[1].0
        );

        self.update_end_date();
        self.update_score_board();
        Ok(Some(scores))
    }

    // ------------------------------------------------------------------
    // Scores and ranks
    // ------------------------------------------------------------------

    /// Recompute and cache the rank table; returns the full ranking, best first.
    pub fn update_score_board(&mut self) -> &[Standing] {
        self.score_board =
            ScoreBoard::compute(self.participants.iter().map(|p| &p.id), &self.rounds);
        self.score_board.standings()
    }

    /// Cumulative score of a player over every started round
    pub fn player_score(&self, id: &PlayerId) -> f64 {
        player_score(id, &self.rounds)
    }

    /// Cached dense rank, 1 being the best
    pub fn player_rank(&self, id: &PlayerId) -> Option<u32> {
        self.score_board.rank(id)
    }

    /// Cached ranking list; before the first round everyone is tied first.
    pub fn ranking_list(&self) -> Vec<Standing> {
        if !self.has_started() {
            return self
                .participants
                .iter()
                .map(|p| Standing {
                    player: p.id.clone(),
                    rank: 1,
                    score: 0.0,
                })
                .collect();
        }
        self.score_board.standings().to_vec()
    }

    /// Fix the end date once the last round is over and refresh the cached
    /// status.
    ///
    /// The end date is the date of the *earliest* match end of the final round.
    pub fn update_end_date(&mut self) {
        if self.has_ended() && self.metadata.end_date.is_none() {
            self.metadata.end_date = self
                .rounds
                .last()
                .and_then(Option::as_ref)
                .and_then(|round| round.matches.iter().filter_map(Match::end_time).min())
                .map(|end| end.date());
            info!(
                "Tournament {} ended on {:?}",
                self.metadata.tournament_id, self.metadata.end_date
            );
        }
        self.metadata.status = self.status();
    }
}

#[cfg(test)]
#[path = "tournament_tests.rs"]
mod tournament_tests;
