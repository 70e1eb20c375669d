//! Shared test helpers: canned messages and an in-process archive API

use crate::api::types::{Message, MessagePage};
use crate::api::ArchiveClient;
use crate::tui::{App, Fetcher};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Message with id `id`, author `user{id}` and body `message {id}`
pub fn msg(id: u32) -> Message {
    Message::new(
        id.to_string(),
        format!("user{}", id),
        format!("message {}", id),
        "2024-01-01T12:00:00Z",
    )
}

/// API page holding `ids` in the given (newest-first) order
pub fn page(number: u32, ids: &[u32]) -> MessagePage {
    MessagePage {
        page: number,
        messages: ids.iter().map(|&id| msg(id)).collect(),
    }
}

/// Ids of messages in order
pub fn ids(messages: &[Message]) -> Vec<String> {
    messages.iter().map(|m| m.id.to_string()).collect()
}

/// Ids as strings, for comparisons
pub fn expect_ids(ids: &[u32]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

/// Archive API stub answering canned JSON per path and query
pub struct FixtureServer {
    /// Bound address
    pub addr: SocketAddr,
    hits: Arc<Mutex<Vec<String>>>,
}

impl FixtureServer {
    /// Serve `routes` (path-and-query -> (status, body)); unknown paths get 404
    pub async fn start(routes: Vec<(&str, u16, &str)>) -> Self {
        let routes: HashMap<String, (u16, String)> = routes
            .into_iter()
            .map(|(path, status, body)| (path.to_string(), (status, body.to_string())))
            .collect();
        let routes = Arc::new(routes);
        let hits = Arc::new(Mutex::new(Vec::new()));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fixture server");
        let addr = listener.local_addr().expect("Failed to get local address");

        let server_hits = hits.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let io = TokioIo::new(stream);
                let routes = routes.clone();
                let hits = server_hits.clone();

                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let routes = routes.clone();
                        let hits = hits.clone();
                        async move {
                            let key = req
                                .uri()
                                .path_and_query()
                                .map(|pq| pq.as_str().to_string())
                                .unwrap_or_default();
                            hits.lock().unwrap().push(key.clone());

                            let (status, body) = routes.get(&key).cloned().unwrap_or((
                                404,
                                r#"{"error": "Guild database not found"}"#.to_string(),
                            ));

                            Ok::<_, hyper::Error>(
                                Response::builder()
                                    .status(status)
                                    .header("Content-Type", "application/json")
                                    .body(Full::new(Bytes::from(body)))
                                    .unwrap(),
                            )
                        }
                    });
                    let _ = http1::Builder::new().serve_connection(io, service).await;
                });
            }
        });

        Self { addr, hits }
    }

    /// Base URL to hand to the client
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client pointed at this server
    pub fn client(&self) -> ArchiveClient {
        ArchiveClient::new(&self.base_url(), Duration::from_secs(5)).expect("Failed to build client")
    }

    /// Paths requested so far
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

/// App wired to `client`; must be called inside a tokio runtime
pub fn app_with_client(client: ArchiveClient) -> App {
    let (fetcher, outcomes) = Fetcher::new(client, tokio::runtime::Handle::current());
    App::new(fetcher, outcomes)
}

/// App whose requests can never succeed (nothing listens on the discard port)
pub fn offline_app() -> App {
    let client = ArchiveClient::new("http://127.0.0.1:9", Duration::from_millis(500))
        .expect("Failed to build client");
    app_with_client(client)
}

/// Apply the next `count` finished requests, failing the test on a stall
pub async fn drain(app: &mut App, count: usize) {
    for _ in 0..count {
        let applied = tokio::time::timeout(Duration::from_secs(5), app.next_fetch())
            .await
            .expect("Timed out waiting for a fetch to finish");
        assert!(applied, "Fetch channel closed");
    }
}
