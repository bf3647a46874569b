//! Chess club tournament manager
//!
//! This crate wraps the `swiss_core` engine with:
//! - A club player roster and tournament storage in JSON files
//! - TOML configuration and a small session file remembering the
//!   selected tournament
//! - The command handlers of the `tournament` binary
//!
//! # Usage
//!
//! ```bash
//! cargo run -p tournament -- add-player FR12345 Dupont Marie 1990-04-02
//! cargo run -p tournament -- new --rounds 4 --location Lyon
//! cargo run -p tournament -- register FR12345 FR12346
//! cargo run -p tournament -- next-round
//! cargo run -p tournament -- end-match 0 --winner FR12345
//! cargo run -p tournament -- standings
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod players;
pub mod session;
pub mod storage;
pub mod tournaments;

pub use cli::{Cli, Command};
pub use commands::App;
pub use config::{Config, ConfigError};
pub use players::PlayerRepository;
pub use session::SessionContext;
pub use storage::{Entity, JsonStore, StorageError};
pub use tournaments::TournamentRepository;
