//! Command handlers behind the `tournament` binary
//!
//! Each handler returns the text to show the user. Commands that change a
//! tournament store it before returning.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tracing::info;

use swiss_core::{Player, PlayerId, Round, Tournament, TournamentMetaData};

use crate::cli::Command;
use crate::config::Config;
use crate::players::PlayerRepository;
use crate::session::SessionContext;
use crate::tournaments::TournamentRepository;

pub struct App {
    pub config: Config,
    pub players: PlayerRepository,
    pub tournaments: TournamentRepository,
    pub session: SessionContext,
}

impl App {
    pub fn open(config: Config) -> Result<Self> {
        let data_dir = config.data_dir.clone();
        Ok(Self {
            players: PlayerRepository::open(&data_dir).context("Failed to load players")?,
            tournaments: TournamentRepository::open(&data_dir)
                .context("Failed to load tournament index")?,
            session: SessionContext::load(&data_dir).context("Failed to load session")?,
            config,
        })
    }

    pub fn run(&mut self, command: Command) -> Result<String> {
        match command {
            Command::AddPlayer {
                id,
                surname,
                name,
                birthdate,
            } => self.add_player(&id, &surname, &name, birthdate),
            Command::EditPlayer {
                id,
                surname,
                name,
                birthdate,
            } => self.edit_player(&id, surname, name, birthdate),
            Command::Players => Ok(self.list_players()),
            Command::New {
                rounds,
                location,
                description,
                start_date,
            } => self.new_tournament(rounds, &location, &description, start_date),
            Command::Tournaments => Ok(self.list_tournaments()),
            Command::Select { id } => self.select(&id),
            Command::Register { ids } => self.register(&ids),
            Command::EditTournament {
                location,
                start_date,
                description,
            } => self.edit_tournament(location.as_deref(), start_date, description.as_deref()),
            Command::SetRounds { rounds } => self.set_rounds(rounds),
            Command::NextRound => self.next_round(),
            Command::StartMatch { index } => self.start_match(index),
            Command::EndMatch { index, winner } => self.end_match(index, winner.as_deref()),
            Command::Standings => self.standings(),
            Command::Status => self.status(),
        }
    }

    fn add_player(
        &mut self,
        id: &str,
        surname: &str,
        name: &str,
        birthdate: NaiveDate,
    ) -> Result<String> {
        let player = Player::new(PlayerId::parse(id)?, surname, name, birthdate);
        let line = format!("Added {} ({})", player.display_name(), player.id);
        self.players.add(player)?;
        self.players.commit()?;
        Ok(line)
    }

    fn edit_player(
        &mut self,
        id: &str,
        surname: Option<String>,
        name: Option<String>,
        birthdate: Option<NaiveDate>,
    ) -> Result<String> {
        let id = PlayerId::parse(id)?;
        let Some(mut player) = self.players.find_by_id(&id).cloned() else {
            bail!("Player {} is not in the roster", id);
        };
        if let Some(surname) = surname {
            player.surname = surname;
        }
        if let Some(name) = name {
            player.name = name;
        }
        if let Some(birthdate) = birthdate {
            player.birthdate = birthdate;
        }
        let line = format!("Updated {} ({})", player.display_name(), player.id);
        self.players.update(player);
        self.players.commit()?;
        Ok(line)
    }

    fn list_players(&self) -> String {
        if self.players.is_empty() {
            return "No players yet. Add one with `tournament add-player`.".to_string();
        }
        let mut out = format!("{:<10} {:<30} {:>10}\n", "Id", "Name", "Born");
        out.push_str(&"-".repeat(52));
        out.push('\n');
        for p in self.players.list_all() {
            out.push_str(&format!(
                "{:<10} {:<30} {:>10}\n",
                p.id.as_str(),
                p.display_name(),
                p.birthdate
            ));
        }
        out
    }

    fn new_tournament(
        &mut self,
        rounds: Option<u32>,
        location: &str,
        description: &str,
        start_date: Option<NaiveDate>,
    ) -> Result<String> {
        let mut metadata = TournamentMetaData::new(&TournamentRepository::generate_id())
            .with_rounds(rounds.unwrap_or(self.config.default_rounds))
            .with_location(location)
            .with_description(description);
        metadata.start_date = start_date;

        let tournament = self.tournaments.create(metadata)?;
        self.session.current_tournament = Some(tournament.id().to_string());
        self.session.save(&self.config.data_dir)?;
        Ok(format!(
            "Created tournament {} ({} rounds), now selected",
            tournament.id(),
            tournament.metadata.round_count
        ))
    }

    fn list_tournaments(&self) -> String {
        let all = self.tournaments.list_metadata();
        if all.is_empty() {
            return "No tournaments yet. Create one with `tournament new`.".to_string();
        }
        let mut out = String::new();
        for m in all {
            let selected =
                self.session.current_tournament.as_deref() == Some(m.tournament_id.as_str());
            out.push_str(&format!(
                "{} {}  {:<8} {:<10} {:<16} {}\n",
                if selected { "*" } else { " " },
                m.tournament_id,
                m.status,
                m.start_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                m.location,
                m.description
            ));
        }
        out
    }

    fn select(&mut self, id: &str) -> Result<String> {
        if self.tournaments.find_by_id(id).is_none() {
            bail!("Unknown tournament {}", id);
        }
        self.session.current_tournament = Some(id.to_string());
        self.session.save(&self.config.data_dir)?;
        Ok(format!("Selected tournament {}", id))
    }

    fn current(&self) -> Result<Tournament> {
        let Some(id) = self.session.current_tournament.as_deref() else {
            bail!("No tournament selected; run `tournament new` or `tournament select <id>`");
        };
        self.tournaments
            .load(id, &self.players)
            .with_context(|| format!("Failed to load tournament {}", id))
    }

    fn store(&mut self, tournament: &mut Tournament) -> Result<()> {
        self.tournaments
            .store(tournament)
            .with_context(|| format!("Failed to store tournament {}", tournament.id()))
    }

    fn register(&mut self, ids: &[String]) -> Result<String> {
        let mut tournament = self.current()?;
        let mut out = String::new();
        for id in ids {
            let id = PlayerId::parse(id)?;
            let Some(player) = self.players.find_by_id(&id).cloned() else {
                bail!("Player {} is not in the roster", id);
            };
            let name = player.display_name();
            if tournament.add_participant(player)? {
                out.push_str(&format!("Registered {}\n", name));
            } else {
                out.push_str(&format!("{} was already registered\n", name));
            }
        }
        self.store(&mut tournament)?;
        out.push_str(&format!("{} participants", tournament.participants().len()));
        Ok(out)
    }

    fn edit_tournament(
        &mut self,
        location: Option<&str>,
        start_date: Option<NaiveDate>,
        description: Option<&str>,
    ) -> Result<String> {
        let mut tournament = self.current()?;
        if let Some(location) = location {
            tournament.set_location(location)?;
        }
        if let Some(start_date) = start_date {
            tournament.set_start_date(start_date)?;
        }
        if let Some(description) = description {
            tournament.set_description(description);
        }
        self.store(&mut tournament)?;
        Ok(format!("Updated tournament {}", tournament.id()))
    }

    fn set_rounds(&mut self, rounds: u32) -> Result<String> {
        let mut tournament = self.current()?;
        tournament.set_rounds(rounds)?;
        self.store(&mut tournament)?;
        Ok(format!("Tournament {} now has {} rounds", tournament.id(), rounds))
    }

    fn next_round(&mut self) -> Result<String> {
        let mut tournament = self.current()?;
        tournament.start_next_round(None)?;
        self.store(&mut tournament)?;
        let Some(round) = tournament.current_round() else {
            bail!("Tournament {} has no round in play", tournament.id());
        };
        info!("{} of tournament {} started", round.name, tournament.id());
        Ok(self.describe_round(&tournament, round))
    }

    fn start_match(&mut self, index: usize) -> Result<String> {
        let mut tournament = self.current()?;
        let Some(m) = tournament.start_a_match(index, None)?.cloned() else {
            bail!("No round is being played");
        };
        let out = format!(
            "Match {} started: {} vs {}",
            index,
            self.name_of(&tournament, m.player1()),
            self.name_of(&tournament, m.player2())
        );
        self.store(&mut tournament)?;
        Ok(out)
    }

    fn end_match(&mut self, index: usize, winner: Option<&str>) -> Result<String> {
        let mut tournament = self.current()?;
        let winner = winner.map(PlayerId::parse).transpose()?;
        let Some(scores) = tournament.end_a_match(index, winner.as_ref(), None)? else {
            bail!("No round is being played");
        };
        self.store(&mut tournament)?;

        let [(p1, s1), (p2, s2)] = &scores;
        let mut out = format!(
            "Match {} ended: {} {} - {} {}",
            index,
            self.name_of(&tournament, p1),
            s1,
            s2,
            self.name_of(&tournament, p2)
        );
        if tournament.has_ended() {
            out.push_str(&format!("\nTournament {} is over", tournament.id()));
        } else if let Some(round) = tournament.current_round() {
            if round.has_ended() {
                out.push_str(&format!("\n{} is complete", round.name));
            }
        }
        Ok(out)
    }

    fn standings(&mut self) -> Result<String> {
        let mut tournament = self.current()?;
        tournament.update_score_board();
        let mut out = format!("{:>4}  {:<10} {:<30} {:>5}\n", "Rank", "Id", "Name", "Score");
        out.push_str(&"-".repeat(53));
        out.push('\n');
        for standing in tournament.ranking_list() {
            out.push_str(&format!(
                "{:>4}  {:<10} {:<30} {:>5.1}\n",
                standing.rank,
                standing.player.as_str(),
                self.name_of(&tournament, &standing.player),
                standing.score
            ));
        }
        Ok(out)
    }

    fn status(&self) -> Result<String> {
        let tournament = self.current()?;
        let m = &tournament.metadata;
        let mut out = format!("Tournament {} ({})\n", m.tournament_id, tournament.status());
        if !m.location.is_empty() {
            out.push_str(&format!("Location: {}\n", m.location));
        }
        if !m.description.is_empty() {
            out.push_str(&format!("{}\n", m.description));
        }
        out.push_str(&format!(
            "Dates: {} to {}\n",
            date_or_dash(tournament.start_date()),
            date_or_dash(tournament.end_date())
        ));
        out.push_str(&format!(
            "Participants: {}, rounds: {}\n",
            tournament.participants().len(),
            m.round_count
        ));
        match tournament.current_round() {
            Some(round) => out.push_str(&self.describe_round(&tournament, round)),
            None if tournament.can_start() => {
                out.push_str("Ready for the next round\n");
            }
            None => {}
        }
        Ok(out)
    }

    fn describe_round(&self, tournament: &Tournament, round: &Round) -> String {
        let mut out = format!("{}\n", round.name);
        for (i, m) in round.matches.iter().enumerate() {
            let state = if m.has_ended() {
                let [(_, s1), (_, s2)] = m.scores();
                format!("{} - {}", s1, s2)
            } else if m.has_started() {
                "playing".to_string()
            } else {
                "pending".to_string()
            };
            out.push_str(&format!(
                "  {:>2}. {:<30} vs {:<30} {}\n",
                i,
                self.name_of(tournament, m.player1()),
                self.name_of(tournament, m.player2()),
                state
            ));
        }
        out
    }

    fn name_of(&self, tournament: &Tournament, id: &PlayerId) -> String {
        tournament
            .participant(id)
            .map(Player::display_name)
            .unwrap_or_else(|| id.to_string())
    }
}

fn date_or_dash(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}
