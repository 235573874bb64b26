// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token persistence through the full application wiring.

use setoran_dosen::models::Tokens;
use setoran_dosen::store::{FileTokenStore, MemoryTokenStore, TokenStore};
use setoran_dosen::AppState;
use std::sync::Arc;

mod common;
use common::{MockServer, MockState, PASSWORD, USERNAME};

#[tokio::test]
async fn test_sign_in_survives_restart() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let mut config = server.config();
    config.token_store_path = dir.path().join("tokens.json");
    config.token_store_secret = Some("device-secret".to_string());

    let app = AppState::from_config(config.clone()).unwrap();
    app.session.sign_in(USERNAME, PASSWORD).await.unwrap();
    drop(app);

    // New process: same file, same secret.
    let restarted = AppState::from_config(config).unwrap();
    let advisor = restarted.session.advisor().await.unwrap();
    assert_eq!(advisor.data.nama, "Dr. Siti Aminah");
    assert_eq!(MockState::count(&server.state.login_calls), 1);
    assert_eq!(MockState::count(&server.state.refresh_calls), 0);

    let raw = std::fs::read_to_string(dir.path().join("tokens.json")).unwrap();
    assert!(!raw.contains("access_token"), "Tokens must be sealed on disk");
}

#[tokio::test]
async fn test_refresh_is_persisted_to_file() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokens.json");

    let tokens = server.state.issue(1);
    server.state.expire_access();
    let store = FileTokenStore::new(&path);
    store.save(&tokens).unwrap();

    let session = server.session(Arc::new(store));
    session.advisor().await.unwrap();

    let reopened = FileTokenStore::new(&path);
    assert_eq!(reopened.access_token().as_deref(), Some("a2"));
    assert_eq!(reopened.refresh_token().as_deref(), Some("r2"));
}

#[test]
fn test_clear_then_get_is_absent_for_any_prior_value() {
    let dir = tempfile::tempdir().unwrap();
    let stores: Vec<Box<dyn TokenStore>> = vec![
        Box::new(MemoryTokenStore::new()),
        Box::new(FileTokenStore::new(dir.path().join("plain.json"))),
        Box::new(FileTokenStore::sealed(dir.path().join("sealed.json"), "k").unwrap()),
    ];

    let samples = [
        Tokens::new("a1", "r1", "i1"),
        Tokens::new("", "", ""),
        Tokens::new("ey.J.long-token-with-dots", "r", ""),
    ];

    for store in &stores {
        for tokens in &samples {
            store.save(tokens).unwrap();
            store.clear().unwrap();
            assert!(store.access_token().is_none());
            assert!(store.refresh_token().is_none());
            assert!(store.id_token().is_none());
        }
        // Clearing an empty store is a no-op.
        store.clear().unwrap();
        assert!(store.access_token().is_none());
    }
}

#[test]
fn test_concurrent_saves_leave_a_whole_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileTokenStore::new(dir.path().join("tokens.json")));

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let store = store.clone();
            std::thread::spawn(move || {
                let t = Tokens::new(format!("a{}", n), format!("r{}", n), format!("i{}", n));
                store.save(&t).unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    // Last write wins, but the triple always belongs to a single save.
    let tokens = store.load().unwrap().unwrap();
    let n = tokens.access_token.trim_start_matches('a');
    assert_eq!(tokens.refresh_token, format!("r{}", n));
    assert_eq!(tokens.id_token, format!("i{}", n));
}
