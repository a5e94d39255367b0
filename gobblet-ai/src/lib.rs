//! Gobblet AI: static evaluation and game-tree search.
//!
//! Three searchers share one contract: given a position, a depth and the
//! player the AI is playing for, return a score, a best move and node
//! statistics.
//!
//! - [`minimax`]: exhaustive to a fixed depth
//! - [`alpha_beta`]: the same score with pruning, optionally under a deadline
//! - [`iterative_deepening`]: alpha-beta at increasing depth within a time budget
//!
//! [`AiConfig`] selects an [`Algorithm`] per seat, and [`SearchWorker`] runs
//! searches in the background so the game loop never blocks.

mod agent;
mod config;
mod eval;
mod search;
mod stats;
mod worker;

pub use agent::{choose_move, SearchRequest};
pub use config::{
    AiConfig, Algorithm, ConfigError, GameMode, DEFAULT_ALPHA_BETA_DEPTH, DEFAULT_ID_MAX_DEPTH,
    DEFAULT_MINIMAX_DEPTH, DEFAULT_TIME_LIMIT_MS,
};
pub use eval::{evaluate, EvalWeights};
pub use search::{alpha_beta, iterative_deepening, minimax, SearchResult, INF};
pub use stats::SearchStats;
pub use worker::{SearchHandle, SearchWorker, WorkerError};
