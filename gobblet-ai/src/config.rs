//! AI configuration, loaded from TOML.
//!
//! ```toml
//! mode = "pvai"
//! ai_player = "Two"
//!
//! [algorithm_two]
//! kind = "iterative_deepening"
//! max_depth = 2
//! time_limit_ms = 2000
//!
//! [weights]
//! line_bonus = 15
//! ```
//!
//! Every field is optional; missing ones take the defaults below.

use std::path::Path;
use std::time::Duration;

use gobblet_core::Player;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agent::SearchRequest;
use crate::eval::EvalWeights;

pub const DEFAULT_MINIMAX_DEPTH: u32 = 1;
pub const DEFAULT_ALPHA_BETA_DEPTH: u32 = 2;
pub const DEFAULT_ID_MAX_DEPTH: u32 = 2;
pub const DEFAULT_TIME_LIMIT_MS: u64 = 2000;

/// Errors loading or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Who the AI plays for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Two humans; no AI
    PvP,
    /// One human against the AI seat `ai_player`
    #[default]
    PvAI,
    /// The AI plays both sides
    AIvAI,
}

/// Move selection strategy for one seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Algorithm {
    /// Uniform choice among legal moves
    Random,
    Minimax {
        #[serde(default = "default_minimax_depth")]
        depth: u32,
    },
    AlphaBeta {
        #[serde(default = "default_alpha_beta_depth")]
        depth: u32,
    },
    IterativeDeepening {
        #[serde(default = "default_id_max_depth")]
        max_depth: u32,
        #[serde(default = "default_time_limit_ms")]
        time_limit_ms: u64,
    },
}

fn default_minimax_depth() -> u32 {
    DEFAULT_MINIMAX_DEPTH
}

fn default_alpha_beta_depth() -> u32 {
    DEFAULT_ALPHA_BETA_DEPTH
}

fn default_id_max_depth() -> u32 {
    DEFAULT_ID_MAX_DEPTH
}

fn default_time_limit_ms() -> u64 {
    DEFAULT_TIME_LIMIT_MS
}

impl Algorithm {
    pub fn minimax() -> Self {
        Algorithm::Minimax {
            depth: DEFAULT_MINIMAX_DEPTH,
        }
    }

    pub fn alpha_beta() -> Self {
        Algorithm::AlphaBeta {
            depth: DEFAULT_ALPHA_BETA_DEPTH,
        }
    }

    pub fn iterative_deepening() -> Self {
        Algorithm::IterativeDeepening {
            max_depth: DEFAULT_ID_MAX_DEPTH,
            time_limit_ms: DEFAULT_TIME_LIMIT_MS,
        }
    }

    /// Wall-clock budget, for the time-bounded variant only.
    pub fn time_limit(&self) -> Option<Duration> {
        match *self {
            Algorithm::IterativeDeepening { time_limit_ms, .. } => {
                Some(Duration::from_millis(time_limit_ms))
            }
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Algorithm::Random => Ok(()),
            Algorithm::Minimax { depth: 0 } | Algorithm::AlphaBeta { depth: 0 } => {
                Err(ConfigError::Invalid(format!("{:?}: depth must be at least 1", self)))
            }
            Algorithm::IterativeDeepening { max_depth: 0, .. } => Err(ConfigError::Invalid(
                format!("{:?}: max_depth must be at least 1", self),
            )),
            Algorithm::IterativeDeepening { time_limit_ms: 0, .. } => Err(ConfigError::Invalid(
                format!("{:?}: time_limit_ms must be positive", self),
            )),
            _ => Ok(()),
        }
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::alpha_beta()
    }
}

/// Complete AI setup for a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub mode: GameMode,
    /// The AI seat in [`GameMode::PvAI`]
    pub ai_player: Player,
    pub algorithm_one: Algorithm,
    pub algorithm_two: Algorithm,
    pub weights: EvalWeights,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            ai_player: Player::Two,
            algorithm_one: Algorithm::default(),
            algorithm_two: Algorithm::default(),
            weights: EvalWeights::default(),
        }
    }
}

impl AiConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<AiConfig, ConfigError> {
        let config: AiConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<AiConfig, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.algorithm_one.validate()?;
        self.algorithm_two.validate()
    }

    /// Is `player` driven by the AI in this mode?
    pub fn is_ai(&self, player: Player) -> bool {
        match self.mode {
            GameMode::PvP => false,
            GameMode::PvAI => player == self.ai_player,
            GameMode::AIvAI => true,
        }
    }

    pub fn algorithm(&self, player: Player) -> Algorithm {
        match player {
            Player::One => self.algorithm_one,
            Player::Two => self.algorithm_two,
        }
    }

    /// Search parameters for `player`, or None if a human plays that seat.
    pub fn request_for(&self, player: Player) -> Option<SearchRequest> {
        self.is_ai(player).then(|| SearchRequest {
            algorithm: self.algorithm(player),
            ai_player: player,
            weights: self.weights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AiConfig::from_toml_str("").unwrap();
        assert_eq!(config, AiConfig::default());
        assert_eq!(config.mode, GameMode::PvAI);
        assert_eq!(config.ai_player, Player::Two);
        assert_eq!(config.algorithm_two, Algorithm::AlphaBeta { depth: 2 });
        assert_eq!(config.weights, EvalWeights::default());
        assert!(config.is_ai(Player::Two));
        assert!(!config.is_ai(Player::One));
    }

    #[test]
    fn test_parse_full() {
        let config = AiConfig::from_toml_str(
            r#"
            mode = "aivai"

            [algorithm_one]
            kind = "minimax"

            [algorithm_two]
            kind = "iterative_deepening"
            time_limit_ms = 500

            [weights]
            line_bonus = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, GameMode::AIvAI);
        assert_eq!(config.algorithm_one, Algorithm::Minimax { depth: 1 });
        assert_eq!(
            config.algorithm_two,
            Algorithm::IterativeDeepening {
                max_depth: 2,
                time_limit_ms: 500
            }
        );
        assert_eq!(config.algorithm_two.time_limit(), Some(Duration::from_millis(500)));
        assert_eq!(config.weights.line_bonus, 20);
        assert_eq!(config.weights.line_penalty, 10);
        assert!(config.is_ai(Player::One) && config.is_ai(Player::Two));
    }

    #[test]
    fn test_random_and_seat() {
        let config = AiConfig::from_toml_str(
            r#"
            ai_player = "One"
            algorithm_one = { kind = "random" }
            "#,
        )
        .unwrap();
        let request = config.request_for(Player::One).unwrap();
        assert_eq!(request.algorithm, Algorithm::Random);
        assert_eq!(request.ai_player, Player::One);
        assert!(config.request_for(Player::Two).is_none());
    }

    #[test]
    fn test_pvp_has_no_ai() {
        let config = AiConfig::from_toml_str(r#"mode = "pvp""#).unwrap();
        for player in Player::all() {
            assert!(config.request_for(player).is_none());
        }
    }

    #[test]
    fn test_rejects_zero_depth() {
        let err = AiConfig::from_toml_str(
            r#"
            [algorithm_one]
            kind = "alpha_beta"
            depth = 0
            "#,
        );
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_time_limit() {
        let err = AiConfig::from_toml_str(
            r#"algorithm_two = { kind = "iterative_deepening", time_limit_ms = 0 }"#,
        );
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            AiConfig::from_toml_str(r#"mode = "online""#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AiConfig::from_toml_str("algorithm_one = { kind = \"mcts\" }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("gobblet_ai_no_such_config.toml");
        assert!(matches!(AiConfig::load(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join("gobblet_ai_test_config.toml");
        std::fs::write(&path, "mode = \"pvp\"\n").unwrap();
        let config = AiConfig::load(&path).unwrap();
        assert_eq!(config.mode, GameMode::PvP);
        let _ = std::fs::remove_file(&path);
    }
}
