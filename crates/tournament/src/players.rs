//! Club player roster, stored in `players.json`

use std::path::Path;
use tracing::info;

use swiss_core::{Player, PlayerId, PlayerLookup};

use crate::storage::{Entity, JsonStore, Result};

pub const PLAYERS_FILE: &str = "players.json";

impl Entity for Player {
    fn entity_id(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Debug)]
pub struct PlayerRepository {
    store: JsonStore<Player>,
}

impl PlayerRepository {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let store = JsonStore::open(data_dir.join(PLAYERS_FILE))?;
        info!("Loaded {} players from {}", store.len(), store.path().display());
        Ok(Self { store })
    }

    /// Register a new player; fails if the id is already taken.
    pub fn add(&mut self, player: Player) -> Result<()> {
        self.store.add(player)
    }

    pub fn update(&mut self, player: Player) {
        self.store.update(player);
    }

    pub fn delete(&mut self, id: &PlayerId) -> Result<Player> {
        self.store.delete(id.as_str())
    }

    pub fn find_by_id(&self, id: &PlayerId) -> Option<&Player> {
        self.store.find_by_id(id.as_str())
    }

    /// Players sorted by surname, then name
    pub fn list_all(&self) -> Vec<&Player> {
        let mut players = self.store.list_all();
        players.sort_by(|a, b| {
            (a.surname.to_lowercase(), a.name.to_lowercase())
                .cmp(&(b.surname.to_lowercase(), b.name.to_lowercase()))
        });
        players
    }

    pub fn find_many<F>(&self, predicate: F) -> Vec<&Player>
    where
        F: Fn(&Player) -> bool,
    {
        self.store.find_many(predicate)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn commit(&mut self) -> Result<()> {
        self.store.commit()
    }
}

impl PlayerLookup for PlayerRepository {
    fn find_player(&self, id: &str) -> Option<Player> {
        self.store.find_by_id(id).cloned()
    }
}

#[cfg(test)]
#[path = "players_tests.rs"]
mod players_tests;
