//! Player identity shared by the engine and its collaborators.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::SwissError;

/// National player id: two uppercase ASCII letters followed by five digits,
/// e.g. `FR12345`.
///
/// The engine only relies on equality, hashing and ordering; the format
/// check happens once, when the id enters the system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    /// Parse and validate a national player id.
    pub fn parse(s: &str) -> Result<Self, SwissError> {
        if is_valid_player_id(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(SwissError::InvalidPlayerId(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Two ASCII uppercase letters followed by five digits, e.g. `AB12345`
pub fn is_valid_player_id(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 7
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..].iter().all(u8::is_ascii_digit)
}

impl TryFrom<String> for PlayerId {
    type Error = SwissError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_valid_player_id(&value) {
            Ok(Self(value))
        } else {
            Err(SwissError::InvalidPlayerId(value))
        }
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for PlayerId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PlayerId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A registered club player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub surname: String,
    pub name: String,
    pub birthdate: NaiveDate,
}

impl Player {
    pub fn new(id: PlayerId, surname: &str, name: &str, birthdate: NaiveDate) -> Self {
        Self {
            id,
            surname: surname.to_string(),
            name: name.to_string(),
            birthdate,
        }
    }

    /// "SURNAME Name", the way score sheets list players
    pub fn display_name(&self) -> String {
        format!("{} {}", self.surname.to_uppercase(), self.name)
    }
}

// Identity is the id; names and birthdates may be corrected over time.
impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

/// Resolves a player id string into a full player record.
///
/// Only used when a persisted tournament is rehydrated.
pub trait PlayerLookup {
    fn find_player(&self, id: &str) -> Option<Player>;
}

impl PlayerLookup for HashMap<PlayerId, Player> {
    fn find_player(&self, id: &str) -> Option<Player> {
        let key = PlayerId::parse(id).ok()?;
        self.get(&key).cloned()
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
