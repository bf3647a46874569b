//! Tournament persistence
//!
//! ```text
//! <data_dir>/tournaments/metadata.json              index of every tournament
//! <data_dir>/tournaments/tournament_<id>.json       participants, rounds, matches
//! ```
//!
//! A tournament listed in the index without a data file is a fresh one that
//! was created but never stored since.

use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use swiss_core::{PlayerLookup, SwissError, Tournament, TournamentMetaData, TournamentRecord};

use crate::storage::{read_json, write_json, Entity, JsonStore, Result, StorageError};

pub const TOURNAMENTS_DIR: &str = "tournaments";
pub const METADATA_FILE: &str = "metadata.json";

impl Entity for TournamentMetaData {
    fn entity_id(&self) -> String {
        self.tournament_id.clone()
    }
}

#[derive(Debug)]
pub struct TournamentRepository {
    dir: PathBuf,
    metadata: JsonStore<TournamentMetaData>,
}

impl TournamentRepository {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let dir = data_dir.join(TOURNAMENTS_DIR);
        let metadata = JsonStore::open(dir.join(METADATA_FILE))?;
        Ok(Self { dir, metadata })
    }

    /// Fresh tournament id (UUID v4)
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn data_file(&self, tournament_id: &str) -> PathBuf {
        self.dir.join(format!("tournament_{}.json", tournament_id))
    }

    /// Register a new tournament in the index. An empty id is replaced by a
    /// generated one.
    pub fn create(&mut self, mut metadata: TournamentMetaData) -> Result<Tournament> {
        if metadata.tournament_id.is_empty() {
            metadata.tournament_id = Self::generate_id();
        }
        let tournament = Tournament::new(metadata)?;
        self.metadata.add(tournament.metadata.clone())?;
        self.metadata.commit()?;
        info!("Created tournament {}", tournament.id());
        Ok(tournament)
    }

    /// Write the tournament's full state to its data file, then its metadata
    /// to the index. The index is left untouched when the data file cannot be
    /// written.
    pub fn store(&mut self, tournament: &mut Tournament) -> Result<()> {
        tournament.update_end_date();
        write_json(&self.data_file(tournament.id()), &tournament.to_record())?;
        self.metadata.update(tournament.metadata.clone());
        self.metadata.commit()?;
        debug!(
            "Stored tournament {} ({})",
            tournament.id(),
            tournament.status()
        );
        Ok(())
    }

    /// Load a tournament, resolving its participants through `players`.
    ///
    /// The index entry is authoritative for the metadata.
    pub fn load(&self, tournament_id: &str, players: &dyn PlayerLookup) -> Result<Tournament> {
        let metadata = self
            .metadata
            .find_by_id(tournament_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(tournament_id.to_string()))?;

        let path = self.data_file(tournament_id);
        let Some(mut record) = read_json::<TournamentRecord>(&path)? else {
            debug!("No data file for tournament {}, starting fresh", tournament_id);
            return Ok(Tournament::new(metadata)?);
        };
        if record.tournament_id != tournament_id {
            return Err(SwissError::InvalidRecord(format!(
                "{} holds tournament {}",
                path.display(),
                record.tournament_id
            ))
            .into());
        }
        record.metadata = metadata;
        let tournament = Tournament::from_record(record, players)?;
        debug!(
            "Loaded tournament {} with {} participants",
            tournament.id(),
            tournament.participants().len()
        );
        Ok(tournament)
    }

    pub fn find_by_id(&self, tournament_id: &str) -> Option<&TournamentMetaData> {
        self.metadata.find_by_id(tournament_id)
    }

    /// Index entries, most recent start date first; unscheduled ones last.
    pub fn list_metadata(&self) -> Vec<&TournamentMetaData> {
        let mut all = self.metadata.list_all();
        all.sort_by(|a, b| match (a.start_date, b.start_date) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        all
    }

    pub fn find_metadata<F>(&self, predicate: F) -> Vec<&TournamentMetaData>
    where
        F: Fn(&TournamentMetaData) -> bool,
    {
        self.metadata.find_many(predicate)
    }
}

#[cfg(test)]
#[path = "tournaments_tests.rs"]
mod tournaments_tests;
