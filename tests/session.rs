mod support;

use axum::routing::post;
use axum::{ Json, Router };
use chrono::Local;
use minime_chat::clock::Clock;
use minime_chat::history::MemoryConversationStore;
use minime_chat::models::chat::display_date;
use minime_chat::repl::run_session;
use serde_json::json;
use std::sync::Arc;
use support::{ controller, spawn_backend, FixedClock };

#[tokio::test]
async fn scripted_session_sends_and_manages_conversations() {
    let app = Router::new().route(
        "/chat",
        post(|| async { Json(json!({ "answer": "Hi there" })) })
    );
    let base = spawn_backend(app).await;
    let store = Arc::new(MemoryConversationStore::default());
    let mut ctl = controller(&base, store.clone());

    let script: &[u8] = b"Hello\n/new\n/list\n/select id-1\n/delete id-4\n/select nope\n/bogus\n/quit\nnever sent\n";
    let mut out: Vec<u8> = Vec::new();
    run_session(&mut ctl, script, &mut out).await.expect("session");
    let out = String::from_utf8(out).expect("utf8");

    assert!(out.contains("thinking...\n"));
    assert!(out.contains("Bot: Hi there"));
    assert!(out.contains("* id-4  New Chat"));
    let created = display_date(FixedClock.now().with_timezone(&Local));
    assert!(out.contains(&format!("  id-1  Hello  ({}, 2 messages)", created)));
    assert!(out.contains("== Hello =="));
    assert!(out.contains("Deleted id-4"));
    assert!(out.contains("No conversation with id nope"));
    assert!(out.contains("unknown command /bogus"));
    assert!(!out.contains("never sent"));

    let saved = store.snapshot();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, "id-1");
    assert_eq!(ctl.current_id(), Some("id-1"));
}

#[tokio::test]
async fn session_ends_at_end_of_input() {
    let base = spawn_backend(Router::new()).await;
    let mut ctl = controller(&base, Arc::new(MemoryConversationStore::default()));
    let mut out: Vec<u8> = Vec::new();
    run_session(&mut ctl, &b"/show\n"[..], &mut out).await.expect("session");

    let out = String::from_utf8(out).expect("utf8");
    assert!(out.contains("No conversation selected."));
    assert!(ctl.conversations().is_empty());
}
