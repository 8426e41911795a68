use spyfall::protocol::ServerEvent;
use spyfall::state::AppState;
use spyfall::types::{GameStatus, SPY_ROLE};

/// End-to-end test of a complete game: lobby, role dealing, chat,
/// unanimous vote, result and stats.
#[tokio::test]
async fn test_full_game_flow() {
    let state = AppState::new();

    // 1. Alice creates the game
    let game = state.create_game("Alice").await.expect("create");
    assert_eq!(game.status, GameStatus::Lobby);
    assert_eq!(game.players.len(), 1);
    assert!(game.players[0].is_host);

    let session = state.session(&game.id).await.expect("session exists");

    // An observer connects before anyone else joins
    let mut observer = session.subscribe();

    // 2. Bob and Carol join
    let (bob, _) = session.join("Bob").await.expect("Bob joins");
    let (carol, lobby) = session.join("Carol").await.expect("Carol joins");
    assert_eq!(lobby.players.len(), 3);
    assert_eq!(lobby.players.iter().filter(|p| p.is_host).count(), 1);

    for expected in ["Bob", "Carol"] {
        match observer.recv().await.expect("join event") {
            ServerEvent::PlayerJoined { player, game_state } => {
                assert_eq!(player.name, expected);
                assert!(game_state.player(&player.id).is_some());
            }
            other => panic!("expected playerJoined, got {:?}", other),
        }
    }

    // 3. The host starts: one spy, everyone else roled from one location
    let started = session.start().await.expect("start");
    assert_eq!(started.status, GameStatus::Playing);
    let location = started.location.clone().expect("location assigned");

    let spies: Vec<_> = started.players.iter().filter(|p| p.is_spy).collect();
    assert_eq!(spies.len(), 1);
    assert_eq!(spies[0].role.as_deref(), Some(SPY_ROLE));
    for player in started.players.iter().filter(|p| !p.is_spy) {
        assert!(location.roles.contains(player.role.as_ref().unwrap()));
    }

    // The broadcast projection must not leak roles
    match observer.recv().await.expect("start event") {
        ServerEvent::GameStarted { game_state } => {
            let json = serde_json::to_value(&game_state).unwrap();
            for player in json["players"].as_array().unwrap() {
                assert!(player.get("role").is_none());
                assert!(player.get("isSpy").is_none());
            }
        }
        other => panic!("expected gameStarted, got {:?}", other),
    }

    // Each player retrieves their own role through the privileged read
    let private = session.state().await.expect("state");
    assert!(private.player(&bob.id).unwrap().role.is_some());
    assert!(private.player(&carol.id).unwrap().role.is_some());

    // 4. Chat without a hint provider configured
    let (message, ai) = session
        .post_message(&bob.id, "What's the dress code here?", true)
        .await
        .expect("post");
    assert_eq!(message.player_name.as_deref(), Some("Bob"));
    assert!(ai.is_none(), "no provider, no hint");

    match observer.recv().await.expect("message event") {
        ServerEvent::NewMessage {
            message,
            ai_response,
        } => {
            assert_eq!(message.text, "What's the dress code here?");
            assert!(ai_response.is_none());
        }
        other => panic!("expected newMessage, got {:?}", other),
    }

    // 5. Everyone votes for the spy
    let spy_id = started.spy().unwrap().id.clone();
    let mut final_state = None;
    for player in &started.players {
        final_state = Some(session.vote(&player.id, &spy_id).await.expect("vote"));
    }

    let ended = final_state.unwrap();
    assert_eq!(ended.status, GameStatus::Ended);
    let result = ended.result.expect("result resolved");
    assert_eq!(result.accused_player.id, spy_id);
    assert_eq!(result.spy_player.id, spy_id);
    assert!(result.non_spies_win);
    assert_eq!(result.vote_counts[&spy_id], 3);

    // One voteUpdate per vote; the last one carries the result
    let mut last = None;
    for _ in 0..3 {
        match observer.recv().await.expect("vote event") {
            ServerEvent::VoteUpdate { game_state } => last = Some(game_state),
            other => panic!("expected voteUpdate, got {:?}", other),
        }
    }
    let broadcast_end = last.unwrap();
    assert_eq!(broadcast_end.status, GameStatus::Ended);
    assert!(broadcast_end.result.is_some());

    // 6. Aggregates were recorded for every player
    let stats = state.stats_store();
    let spy_name = &started.spy().unwrap().name;
    let spy_stats = stats.player_stats(spy_name).await.unwrap();
    assert_eq!(spy_stats.games_played, 1);
    assert_eq!(spy_stats.times_was_spy, 1);
    assert_eq!(spy_stats.games_won, 0);

    for player in started.players.iter().filter(|p| !p.is_spy) {
        let s = stats.player_stats(&player.name).await.unwrap();
        assert_eq!(s.games_played, 1);
        assert_eq!(s.games_won, 1);
    }
}

/// A new observer gets the current state as a snapshot semantics check:
/// subscribing late must not change what mutations it sees afterwards.
#[tokio::test]
async fn test_late_observer_sees_only_subsequent_events() {
    let state = AppState::new();
    let game = state.create_game("Alice").await.unwrap();
    let session = state.session(&game.id).await.unwrap();

    session.join("Bob").await.unwrap();

    // Late subscription: Bob's join is history, available via state()
    let mut observer = session.subscribe();
    let snapshot = session.state().await.unwrap();
    assert_eq!(snapshot.players.len(), 2);

    session.join("Carol").await.unwrap();
    match observer.recv().await.unwrap() {
        ServerEvent::PlayerJoined { player, .. } => assert_eq!(player.name, "Carol"),
        other => panic!("expected playerJoined, got {:?}", other),
    }
}

/// Two games never interleave: operations against one are invisible to
/// the other.
#[tokio::test]
async fn test_sessions_are_isolated() {
    let state = AppState::new();
    let game_a = state.create_game("Alice").await.unwrap();
    let game_b = state.create_game("Xavier").await.unwrap();
    assert_ne!(game_a.id, game_b.id);

    let session_a = state.session(&game_a.id).await.unwrap();
    let session_b = state.session(&game_b.id).await.unwrap();
    let mut observer_b = session_b.subscribe();

    session_a.join("Bob").await.unwrap();

    let state_a = session_a.state().await.unwrap();
    let state_b = session_b.state().await.unwrap();
    assert_eq!(state_a.players.len(), 2);
    assert_eq!(state_b.players.len(), 1);

    // Nothing was fanned out to the other game's observers
    assert!(matches!(
        observer_b.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Empty)
    ));
}
