//! Local stand-in for a hosted image classifier
//!
//! Routes:
//! - `/artificial` → `[{"label": "artificial", "score": 0.8}]`
//! - `/human` → `[{"label": "human", "score": 0.9}]`
//! - `/loading` → `{"error": "model loading"}` (200, not a list)
//! - `/broken` → 500
//! - `/private` → 401 unless `Authorization: Bearer secret`

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;

pub struct ClassifierStub {
    pub addr: SocketAddr,
}

impl ClassifierStub {
    /// Bind to an ephemeral port and serve in the background
    pub async fn start() -> Self {
        let app = Router::new()
            .route(
                "/artificial",
                post(|| async { Json(json!([{"label": "artificial", "score": 0.8}])) }),
            )
            .route(
                "/human",
                post(|| async { Json(json!([{"label": "human", "score": 0.9}])) }),
            )
            .route(
                "/loading",
                post(|| async { Json(json!({"error": "model loading"})) }),
            )
            .route(
                "/broken",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
            )
            .route("/private", post(private));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr }
    }

    pub fn url(&self, route: &str) -> String {
        format!("http://{}/{}", self.addr, route.trim_start_matches('/'))
    }
}

async fn private(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer secret");
    if authorized {
        (
            StatusCode::OK,
            Json(json!([{"label": "artificial", "score": 0.7}])),
        )
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"error": "unauthorized"})))
    }
}
