//! Deployment configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_RECENT_GAMES, DEFAULT_TITLE};
use crate::daily::SeedFormat;

const MAX_TITLE_CHARS: usize = 64;
const MAX_RECENT_GAMES: usize = 366;

/// Per-deployment settings. Every field may be omitted from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Header line of the share text.
    #[serde(default = "GameConfig::default_title")]
    pub title: String,
    /// Date rendering fed to the daily hash. Changing it changes every answer.
    #[serde(default)]
    pub seed_format: SeedFormat,
    /// How many games the recent-games list shows.
    #[serde(default = "GameConfig::default_recent_games_limit")]
    pub recent_games_limit: usize,
}

impl GameConfig {
    #[must_use]
    pub fn default_title() -> String {
        DEFAULT_TITLE.to_string()
    }

    #[must_use]
    pub const fn default_recent_games_limit() -> usize {
        DEFAULT_RECENT_GAMES
    }

    /// Parse and validate a configuration document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the JSON is malformed or a field is out of bounds.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ConfigError::BlankTitle);
        }
        let chars = title.chars().count();
        if chars > MAX_TITLE_CHARS {
            return Err(ConfigError::TitleTooLong {
                max: MAX_TITLE_CHARS,
                len: chars,
            });
        }
        if !(1..=MAX_RECENT_GAMES).contains(&self.recent_games_limit) {
            return Err(ConfigError::RangeViolation {
                field: "recent_games_limit",
                min: 1,
                max: MAX_RECENT_GAMES,
                value: self.recent_games_limit,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: Self::default_title(),
            seed_format: SeedFormat::default(),
            recent_games_limit: Self::default_recent_games_limit(),
        }
    }
}

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config JSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("title must not be blank")]
    BlankTitle,
    #[error("title must be at most {max} characters (got {len})")]
    TitleTooLong { max: usize, len: usize },
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: usize,
        max: usize,
        value: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = GameConfig::from_json("{}").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.title, "Wizarding Worldle");
        assert_eq!(config.seed_format, SeedFormat::Iso);
        assert_eq!(config.recent_games_limit, 10);
    }

    #[test]
    fn legacy_seed_format_parses() {
        let config = GameConfig::from_json(r#"{"seed_format":"legacy","title":"Owl Post"}"#).unwrap();
        assert_eq!(config.seed_format, SeedFormat::Legacy);
        assert_eq!(config.title, "Owl Post");
    }

    #[test]
    fn validation_rejects_bad_fields() {
        assert!(matches!(
            GameConfig::from_json(r#"{"title":"  "}"#),
            Err(ConfigError::BlankTitle)
        ));
        let long = format!(r#"{{"title":"{}"}}"#, "a".repeat(65));
        assert!(matches!(
            GameConfig::from_json(&long),
            Err(ConfigError::TitleTooLong { len: 65, .. })
        ));
        let err = GameConfig::from_json(r#"{"recent_games_limit":0}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "recent_games_limit must be between 1 and 366 (got 0)"
        );
        assert!(matches!(
            GameConfig::from_json(r#"{"seed_format":"rfc2822"}"#),
            Err(ConfigError::Json(_))
        ));
    }
}
