//! Integration tests for session lifecycle and backend client behavior.
//!
//! Exercises the library pieces directly (the CLI crate links them) plus the
//! `session` subcommands end to end.

use std::time::Duration;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use taxchat_core::backend::Backend;
use taxchat_core::session::{SessionManager, SessionState, new_session_id};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// A localhost URL nothing is listening on.
fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[tokio::test]
async fn test_start_posts_session_id() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let session = SessionState::new(None, None);
    let id = session.id.clone();

    Mock::given(method("POST"))
        .and(path("/start-session"))
        .and(body_partial_json(json!({"session_id": id})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"session_id": id})))
        .expect(1)
        .mount(&server)
        .await;

    let manager = SessionManager::new(Backend::new(&server.uri()).unwrap(), session);
    assert!(manager.start().await);
}

#[tokio::test]
async fn test_start_against_dead_backend_is_optimistic() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let manager = SessionManager::new(
        Backend::new(&dead_url()).unwrap(),
        SessionState::new(None, None),
    );

    // Not acknowledged, but the id survives and send would still be issued.
    assert!(!manager.start().await);
    assert!(manager.id().starts_with("session_"));
}

#[tokio::test]
async fn test_reset_yields_new_id_and_round_trips() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let session = SessionState::new(None, None);
    let old_id = session.id.clone();

    Mock::given(method("POST"))
        .and(path("/clear-session"))
        .and(body_partial_json(json!({"session_id": old_id})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "cleared"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/start-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut manager = SessionManager::new(Backend::new(&server.uri()).unwrap(), session);
    let new_id = manager.reset().await;

    assert_ne!(new_id, old_id);
    assert!(new_id.starts_with("session_"));
    assert_eq!(manager.id(), new_id);
}

#[tokio::test]
async fn test_reset_proceeds_when_clear_fails() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let session = SessionState::new(None, None);
    let old_id = session.id.clone();

    Mock::given(method("POST"))
        .and(path("/clear-session"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/start-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut manager = SessionManager::new(Backend::new(&server.uri()).unwrap(), session);
    let new_id = manager.reset().await;
    assert_ne!(new_id, old_id);
}

#[tokio::test]
async fn test_overlapping_sends_have_no_client_guard() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send-message"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "reply"}))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let backend = Backend::new(&server.uri()).unwrap();
    let (a, b) = tokio::join!(
        backend.send_message("session_x", "first", None),
        backend.send_message("session_x", "second", None),
    );

    // Both in-flight at once; both complete.
    assert_eq!(a.unwrap(), "reply");
    assert_eq!(b.unwrap(), "reply");
}

#[tokio::test]
async fn test_wait_until_ready_succeeds_when_listening() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    let backend = Backend::new(&server.uri()).unwrap();
    assert!(
        backend
            .wait_until_ready(3, Duration::from_millis(10))
            .await
    );
}

#[tokio::test]
async fn test_wait_until_ready_exhausts_bounded_attempts() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let backend = Backend::new(&dead_url()).unwrap();
    assert!(
        !backend
            .wait_until_ready(2, Duration::from_millis(10))
            .await
    );
}

#[test]
fn test_username_derived_ids_embed_username() {
    let id = new_session_id(Some("alice"));
    assert!(id.starts_with("session_alice_"));
    let other = new_session_id(None);
    assert!(other.starts_with("session_"));
    assert_ne!(id, other);
}

#[tokio::test]
async fn test_session_start_command_prints_id() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/start-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("taxchat")
        .env("TAXCHAT_HOME", home.path())
        .args([
            "--base-url",
            &server.uri(),
            "--username",
            "alice",
            "session",
            "start",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Started session session_alice_"));
}

#[tokio::test]
async fn test_session_clear_command_reports_result() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/clear-session"))
        .and(body_partial_json(json!({"session_id": "session_gone"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "cleared"})))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("taxchat")
        .env("TAXCHAT_HOME", home.path())
        .args([
            "--base-url",
            &server.uri(),
            "session",
            "clear",
            "session_gone",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared session session_gone"));
}

#[tokio::test]
async fn test_session_reset_command_prints_new_id() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/clear-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "cleared"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/start-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("taxchat")
        .env("TAXCHAT_HOME", home.path())
        .args([
            "--base-url",
            &server.uri(),
            "session",
            "reset",
            "session_old",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("New session session_"))
        .stdout(predicate::str::contains("session_old").not());
}
