//! Background search: run a search off the caller's thread and hand back a
//! handle to await its result.
//!
//! Each request works on its own snapshot of the position, so the live game
//! can keep changing while a search is in flight. A search started with
//! [`SearchWorker::submit_session`] remembers the session's generation, and
//! [`SearchHandle::resolve`] drops its result once that session has been
//! restarted or ended. [`SearchWorker::invalidate`] drops every outstanding
//! search at once. Dropped results come back as `Ok(None)` instead of a move
//! for a game that no longer exists.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gobblet_core::{GameSession, GameState};
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info};

use crate::agent::SearchRequest;
use crate::search::SearchResult;

#[derive(Error, Debug)]
pub enum WorkerError {
    /// The search task panicked or was cancelled
    #[error("search task failed: {0}")]
    Join(#[from] JoinError),
}

/// Hands out background searches stamped with the current generation.
#[derive(Debug, Default, Clone)]
pub struct SearchWorker {
    generation: Arc<AtomicU64>,
}

impl SearchWorker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Mark every outstanding search stale. Returns the new generation.
    pub fn invalidate(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "outstanding searches invalidated");
        generation
    }

    /// Start searching a snapshot of `state` on the blocking thread pool.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit(&self, state: &GameState, request: SearchRequest) -> SearchHandle {
        let snapshot = state.clone();
        let generation = self.generation();
        debug!(generation, algorithm = ?request.algorithm, "search submitted");

        let task = tokio::task::spawn_blocking(move || request.run(&snapshot));
        SearchHandle {
            task,
            generation,
            game: None,
            current: Arc::clone(&self.generation),
        }
    }

    /// Search the session's current position, stamped with its generation.
    pub fn submit_session(&self, session: &GameSession, request: SearchRequest) -> SearchHandle {
        SearchHandle {
            game: Some(session.generation()),
            ..self.submit(session.state(), request)
        }
    }
}

/// A search in flight.
#[derive(Debug)]
pub struct SearchHandle {
    task: JoinHandle<SearchResult>,
    generation: u64,
    /// Session generation, for searches started from a session
    game: Option<u64>,
    current: Arc<AtomicU64>,
}

impl SearchHandle {
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True once the worker has been invalidated since this search started.
    pub fn is_stale(&self) -> bool {
        self.current.load(Ordering::SeqCst) != self.generation
    }

    /// Wait for the search. Stale results are dropped and come back as `None`.
    pub async fn join(self) -> Result<Option<SearchResult>, WorkerError> {
        self.finish(None).await
    }

    /// Wait for the search and keep its result only if `session` is still
    /// the game it was started for.
    pub async fn resolve(self, session: &GameSession) -> Result<Option<SearchResult>, WorkerError> {
        self.finish(Some(session.generation())).await
    }

    async fn finish(self, session_now: Option<u64>) -> Result<Option<SearchResult>, WorkerError> {
        let SearchHandle {
            task,
            generation,
            game,
            current,
        } = self;
        let result = task.await?;

        let current = current.load(Ordering::SeqCst);
        if current != generation {
            info!(generation, current, "discarding stale search result");
            return Ok(None);
        }
        if let (Some(game), Some(now)) = (game, session_now) {
            if game != now {
                info!(game, now, "discarding search result for a restarted game");
                return Ok(None);
            }
        }
        result.stats.log();
        Ok(Some(result))
    }
}
