//! Legacy HTTP+SSE transport
//!
//! `GET /sse` opens an event stream whose first `endpoint` event names the
//! URL to POST messages to; replies arrive on the stream as `message` events.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Response, Sse,
    },
    routing::{get, post},
    Router,
};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::handler::McpHandler;
use super::http::{health_check, HttpState};

const CHANNEL_CAPACITY: usize = 64;
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);
/// How long a reply may wait for room in a session's queue
const REPLY_TIMEOUT: Duration = Duration::from_secs(10);

/// Open SSE sessions, keyed by session id
#[derive(Clone)]
pub struct SseSessions {
    inner: Arc<RwLock<HashMap<String, mpsc::Sender<Value>>>>,
    reply_timeout: Duration,
}

impl Default for SseSessions {
    fn default() -> Self {
        Self {
            inner: Arc::default(),
            reply_timeout: REPLY_TIMEOUT,
        }
    }
}

impl SseSessions {
    async fn insert(&self, id: String, tx: mpsc::Sender<Value>) {
        self.inner.write().await.insert(id, tx);
    }

    async fn get(&self, id: &str) -> Option<mpsc::Sender<Value>> {
        self.inner.read().await.get(id).cloned()
    }

    async fn remove(&self, id: &str) {
        if self.inner.write().await.remove(id).is_some() {
            info!("SSE session {} closed", id);
        }
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// Removes its session once the event stream is dropped
struct SessionGuard {
    id: String,
    sessions: SseSessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let id = std::mem::take(&mut self.id);
        let sessions = self.sessions.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move { sessions.remove(&id).await });
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    session_id: String,
}

/// Router for the SSE transport
pub fn router(handler: McpHandler) -> Router {
    Router::new()
        .route("/sse", get(sse_connect))
        .route("/messages", post(post_message))
        .route("/health", get(health_check))
        .with_state(HttpState::new(handler))
        .layer(CorsLayer::permissive())
}

async fn sse_connect(
    State(state): State<HttpState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = Uuid::new_v4().simple().to_string();
    let (tx, rx) = mpsc::channel::<Value>(CHANNEL_CAPACITY);
    state.sessions.insert(session_id.clone(), tx).await;

    info!("SSE session {} opened", session_id);

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("/messages?session_id={}", session_id));

    let guard = SessionGuard {
        id: session_id,
        sessions: state.sessions.clone(),
    };

    let messages = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        rx.recv().await.map(|message| {
            let event = Event::default().event("message").data(message.to_string());
            (Ok::<_, Infallible>(event), (rx, guard))
        })
    });

    let events = stream::once(async move { Ok::<_, Infallible>(endpoint) }).chain(messages);

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(KEEPALIVE_INTERVAL)
            .text("keepalive"),
    )
}

async fn post_message(
    State(state): State<HttpState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> Response {
    let Some(tx) = state.sessions.get(&query.session_id).await else {
        debug!("Message for unknown session {}", query.session_id);
        return (StatusCode::NOT_FOUND, "Session not found").into_response();
    };

    if let Some(reply) = state.handler.handle_message(&body).await {
        // A client that stops reading fills the queue; drop it rather than wait
        if let Err(e) = tx.send_timeout(reply, state.sessions.reply_timeout).await {
            warn!("SSE session {} dropped: {}", query.session_id, e);
            state.sessions.remove(&query.session_id).await;
            return (StatusCode::GONE, "Session closed").into_response();
        }
    }

    StatusCode::ACCEPTED.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolRegistry;
    use axum::body::{Body, Bytes};
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    fn handler() -> McpHandler {
        McpHandler::new(ToolRegistry::new())
    }

    async fn next_chunk(body: &mut axum::body::BodyDataStream) -> String {
        let chunk: Bytes = body.next().await.unwrap().unwrap();
        String::from_utf8(chunk.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_stalled_session_is_dropped() {
        let sessions = SseSessions {
            reply_timeout: Duration::from_millis(50),
            ..SseSessions::default()
        };
        let (tx, _rx) = mpsc::channel::<Value>(1);
        tx.try_send(json!({"queued": true})).unwrap();
        sessions.insert("stalled".to_string(), tx).await;

        let app = Router::new()
            .route("/messages", post(post_message))
            .with_state(HttpState {
                handler: handler(),
                sessions: sessions.clone(),
            });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/messages?session_id=stalled")
                    .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GONE);
        assert_eq!(sessions.count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let response = router(handler())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/messages?session_id=nope")
                    .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let state = HttpState::new(handler());
        let app = Router::new()
            .route("/sse", get(sse_connect))
            .route("/messages", post(post_message))
            .with_state(state.clone());

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/sse").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let mut body = response.into_body().into_data_stream();
        let first = next_chunk(&mut body).await;
        assert!(first.contains("event: endpoint"));
        let endpoint = first
            .lines()
            .find_map(|l| l.strip_prefix("data: "))
            .unwrap()
            .trim()
            .to_string();
        assert!(endpoint.starts_with("/messages?session_id="));
        assert_eq!(state.sessions.count().await, 1);

        let msg = json!({"jsonrpc": "2.0", "id": 7, "method": "ping"});
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(endpoint)
                    .body(Body::from(msg.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let event = next_chunk(&mut body).await;
        assert!(event.contains("event: message"));
        assert!(event.contains(r#""id":7"#));
    }
}
