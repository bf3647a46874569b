//! State carried between CLI invocations, kept in `session.json`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::storage::{read_json, write_json, Result};

pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Tournament the tournament commands apply to
    pub current_tournament: Option<String>,
}

impl SessionContext {
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(SESSION_FILE)
    }

    pub fn load(data_dir: &Path) -> Result<Self> {
        Ok(read_json(&Self::path(data_dir))?.unwrap_or_default())
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        write_json(&Self::path(data_dir), self)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
