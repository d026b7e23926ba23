//! HTTP surface for DigiFacts
//!
//! Serves a demo host page with the `[digifacts]` placeholder expanded, the
//! bare fragment for embedding, and the asynchronous refresh endpoint the page
//! calls to swap in a new fact.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::{DigiFacts, RefreshOutcome, RefreshPayload};
use crate::data::FactSource;
use crate::render::{self, escape_html};

/// Pipeline shared by all handlers
pub type SharedApp<S> = Arc<DigiFacts<S>>;

/// Demo host page; `__STYLES__` and `__TOKEN__` are filled in per request
const HOST_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>DigiByte DigiFacts</title>
<style>
__STYLES__</style>
</head>
<body>
<main>
[digifacts]
<button type="button" id="digifact-refresh">Show another DigiFact</button>
</main>
<script>
(function () {
  var nonce = "__TOKEN__";
  document.getElementById("digifact-refresh").addEventListener("click", function () {
    var body = new URLSearchParams({ nonce: nonce });
    fetch("/refresh", { method: "POST", body: body })
      .then(function (r) { return r.json(); })
      .then(function (res) {
        var box = document.querySelector(".digibyte-digifact");
        if (!box) { return; }
        if (res.success) {
          box.querySelector(".digifact-title").innerHTML = res.data.title;
          box.querySelector(".digifact-content").innerHTML = res.data.content;
        } else {
          box.querySelector(".digifact-content").textContent = res.message;
        }
      });
  });
})();
</script>
</body>
</html>
"#;

/// Form body of a refresh request
#[derive(Debug, Deserialize)]
struct RefreshRequest {
    nonce: Option<String>,
}

/// Builds the router for the given pipeline
pub fn build_router<S>(app: SharedApp<S>) -> Router
where
    S: FactSource + 'static,
{
    Router::new()
        .route("/", get(host_page::<S>))
        .route("/fragment", get(fragment::<S>))
        .route("/refresh", post(refresh::<S>))
        .route("/languages", get(languages::<S>))
        .route("/healthz", get(health))
        .with_state(app)
        .layer(TraceLayer::new_for_http())
}

/// Binds `addr` and serves until ctrl-c or SIGTERM
pub async fn serve<S>(app: SharedApp<S>, addr: SocketAddr) -> std::io::Result<()>
where
    S: FactSource + 'static,
{
    let router = build_router(app);
    info!(%addr, "Binding HTTP listener");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server exited");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn host_page<S: FactSource>(State(app): State<SharedApp<S>>) -> Html<String> {
    let token = app.tokens().issue();
    let page = HOST_PAGE
        .replace("__STYLES__", &render::stylesheet(app.display()))
        .replace("__TOKEN__", &escape_html(&token));
    Html(app.expand_shortcodes(&page).await)
}

async fn fragment<S: FactSource>(State(app): State<SharedApp<S>>) -> Html<String> {
    Html(app.render_fragment().await)
}

async fn refresh<S: FactSource>(
    State(app): State<SharedApp<S>>,
    Form(request): Form<RefreshRequest>,
) -> Response {
    let outcome = app.refresh(request.nonce.as_deref()).await;
    let status = match outcome {
        RefreshOutcome::Rejected => StatusCode::FORBIDDEN,
        _ => StatusCode::OK,
    };
    (status, Json(RefreshPayload::from(outcome))).into_response()
}

async fn languages<S: FactSource>(State(app): State<SharedApp<S>>) -> Response {
    match app.catalog().supported().await {
        Some(set) => Json(set.iter().cloned().collect::<Vec<_>>()).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "Unable to fetch languages from the API" })),
        )
            .into_response(),
    }
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
