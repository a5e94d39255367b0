//! Drive whole games through the session reducer with background searches.

use gobblet_ai::{AiConfig, Algorithm, GameMode, SearchWorker};
use gobblet_core::{GameAction, GameSession, Player};

fn ai_vs_ai(one: Algorithm, two: Algorithm) -> AiConfig {
    AiConfig {
        mode: GameMode::AIvAI,
        algorithm_one: one,
        algorithm_two: two,
        ..AiConfig::default()
    }
}

#[tokio::test]
async fn test_ai_plays_full_game() {
    let config = ai_vs_ai(Algorithm::alpha_beta(), Algorithm::Random);
    let worker = SearchWorker::new();
    let mut session = GameSession::new();
    session.dispatch(GameAction::StartGame).unwrap();

    for _ in 0..60 {
        if session.state().is_game_over() {
            break;
        }
        let turn = session.state().turn();
        let request = config.request_for(turn).unwrap();
        let handle = worker.submit_session(&session, request);
        let result = handle.resolve(&session).await.unwrap().unwrap();
        let mov = result.best_move.unwrap();
        session.dispatch(GameAction::Move(mov)).unwrap();
    }

    let state = session.state();
    assert_eq!(state.pieces().count(), 24);
    if state.is_game_over() {
        assert!(state.outcome().is_some());
        assert!(state.possible_moves().is_empty());
    }
}

#[tokio::test]
async fn test_restart_discards_outstanding_search() {
    let config = ai_vs_ai(Algorithm::minimax(), Algorithm::minimax());
    let worker = SearchWorker::new();
    let mut session = GameSession::new();
    session.dispatch(GameAction::StartGame).unwrap();

    let request = config.request_for(Player::One).unwrap();
    let handle = worker.submit_session(&session, request);

    session.dispatch(GameAction::Restart).unwrap();

    assert_eq!(handle.resolve(&session).await.unwrap(), None);
    assert_eq!(session.generation(), 1);
    assert_eq!(session.state().possible_moves().len(), 48);
    assert!(session.state().board().pieces().next().is_none());
}

#[tokio::test]
async fn test_invalidate_discards_every_search() {
    let config = ai_vs_ai(Algorithm::minimax(), Algorithm::minimax());
    let worker = SearchWorker::new();
    let mut session = GameSession::new();
    session.dispatch(GameAction::StartGame).unwrap();

    let request = config.request_for(Player::One).unwrap();
    let stamped = worker.submit_session(&session, request);
    let plain = worker.submit(session.state(), request);
    worker.invalidate();

    assert_eq!(stamped.resolve(&session).await.unwrap(), None);
    assert_eq!(plain.join().await.unwrap(), None);
}

#[tokio::test]
async fn test_human_seat_gets_no_request() {
    let config = AiConfig::default();
    assert_eq!(config.mode, GameMode::PvAI);
    assert!(config.request_for(Player::One).is_none());

    let worker = SearchWorker::new();
    let session = GameSession::new();
    let request = config.request_for(Player::Two).unwrap();
    // Searching for Player Two from the initial position still works: the
    // search is from the AI's point of view whoever is to move.
    let result = worker.submit(session.state(), request).join().await.unwrap().unwrap();
    assert_eq!(result.best_move.map(|mov| mov.player), Some(Player::One));
}
