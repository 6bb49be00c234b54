//! Console settings from environment variables.

use std::path::PathBuf;

use thiserror::Error;

pub const ACTOR_VAR: &str = "STOCKLEDGER_ACTOR";
pub const RECENT_MOVEMENTS_VAR: &str = "STOCKLEDGER_RECENT_MOVEMENTS";
pub const REPORT_DIR_VAR: &str = "STOCKLEDGER_REPORT_DIR";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("STOCKLEDGER_RECENT_MOVEMENTS must be a positive integer, got {0:?}")]
    InvalidRecentMovements(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Operator recorded as the actor of every movement.
    pub actor: String,
    /// How many movements the inventory report lists.
    pub recent_movements: usize,
    /// Where exported report files go.
    pub report_dir: PathBuf,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            actor: "admin".to_string(),
            recent_movements: 10,
            report_dir: PathBuf::from("."),
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let actor = lookup(ACTOR_VAR)
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or(defaults.actor);

        let recent_movements = match lookup(RECENT_MOVEMENTS_VAR) {
            None => defaults.recent_movements,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidRecentMovements(raw)),
            },
        };

        let report_dir = lookup(REPORT_DIR_VAR)
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.report_dir);

        Ok(Self {
            actor,
            recent_movements,
            report_dir,
        })
    }
}
