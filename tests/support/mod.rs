#![allow(dead_code)]

use axum::Router;
use chrono::{ DateTime, TimeZone, Utc };
use minime_chat::chat::{ ChatClient, HttpChatClient };
use minime_chat::clock::{ Clock, IdGenerator };
use minime_chat::controller::ConversationController;
use minime_chat::history::ConversationStore;
use std::sync::atomic::{ AtomicU64, Ordering };
use std::sync::Arc;

pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 14, 9, 30, 0).unwrap()
    }
}

#[derive(Default)]
pub struct SequentialIds(AtomicU64);

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        format!("id-{}", self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind stub backend");
    let addr = listener.local_addr().expect("stub backend addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub backend");
    });
    format!("http://{}", addr)
}

/// A base URL nothing is listening on.
pub async fn dead_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{}", addr)
}

pub fn controller(base_url: &str, store: Arc<dyn ConversationStore>) -> ConversationController {
    let client: Arc<dyn ChatClient> = Arc::new(HttpChatClient::new(base_url).expect("client"));
    ConversationController::load(
        store,
        client,
        Arc::new(FixedClock),
        Arc::new(SequentialIds::default())
    )
}
