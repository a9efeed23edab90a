//! Stub backend for tests across the workspace.
//!
//! Other crates reach it through the `test-support` feature.

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves `router` on an ephemeral local port and returns its base URL.
///
/// The stub runs until the test runtime shuts down. Abort the returned
/// handle to stop it earlier.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn spawn_stub(router: Router) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub backend");
    let addr = listener.local_addr().expect("Failed to get local addr");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Stub backend failed");
    });

    (format!("http://{addr}"), handle)
}
