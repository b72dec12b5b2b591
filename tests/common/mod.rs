#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use quiz_studio::storage::{FileStore, MemoryStore, SharedStore};
use quiz_studio::{routes, AppState};
use tokio::net::TcpListener;

const TEST_BODY_LIMIT: usize = 1024 * 1024;

pub fn temp_dir(tag: &str) -> PathBuf {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!("quiz_studio_{}_{}_{}", tag, std::process::id(), id));
    // Clean up leftovers from previous runs
    let _ = std::fs::remove_dir_all(&path);
    path
}

pub fn file_store(tag: &str) -> SharedStore {
    Arc::new(FileStore::open(temp_dir(tag)).expect("open file store"))
}

pub fn test_app() -> axum::Router {
    routes::app(AppState::new(MemoryStore::shared()), TEST_BODY_LIMIT)
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn(app: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{}", addr)
}

pub async fn spawn_api() -> String {
    spawn(test_app()).await
}

/// A base URL nothing listens on.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}
