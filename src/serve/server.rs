// src/serve/server.rs

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, error, info};

/// Script injected into served HTML pages. Listens on the SSE endpoint and
/// refreshes the page whenever a pipeline run completes.
const RELOAD_SNIPPET: &str =
    "<script>new EventSource(\"/__reload\").onmessage = () => location.reload();</script>";

/// Capacity of the reload broadcast channel; laggy SSE clients just miss a
/// reload and catch the next one.
const RELOAD_CHANNEL_CAPACITY: usize = 16;

/// Cheap, cloneable handle used by the pipeline to push reloads.
///
/// A disabled handle (no server running) turns `reload()` into a no-op.
#[derive(Debug, Clone)]
pub struct ReloadHandle {
    tx: Option<broadcast::Sender<()>>,
}

impl ReloadHandle {
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Instruct all connected clients to refresh.
    pub fn reload(&self) {
        match &self.tx {
            Some(tx) => {
                // Send fails when no client is subscribed; that's fine.
                let _ = tx.send(());
                debug!(clients = tx.receiver_count(), "reload broadcast");
            }
            None => debug!("reload requested but no server is running"),
        }
    }
}

/// Handle for a running dev server. The server task lives for the rest of
/// the process; there is no partial-shutdown path.
#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    reload: ReloadHandle,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn reload_handle(&self) -> ReloadHandle {
        self.reload.clone()
    }
}

#[derive(Clone)]
struct ServeState {
    root: Arc<PathBuf>,
    tx: broadcast::Sender<()>,
}

/// Bind the address, spawn the server task and return its handle.
pub async fn start(root: PathBuf, addr: SocketAddr) -> Result<ServerHandle> {
    let (tx, _) = broadcast::channel(RELOAD_CHANNEL_CAPACITY);

    let state = ServeState {
        root: Arc::new(root.clone()),
        tx: tx.clone(),
    };

    let app = Router::new()
        .route("/__reload", get(reload_events))
        .fallback(get(serve_file))
        .with_state(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding dev server to {addr}"))?;
    let local_addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            error!(error = %err, "dev server terminated");
        }
    });

    info!(addr = %local_addr, root = %root.display(), "dev server started");

    Ok(ServerHandle {
        addr: local_addr,
        reload: ReloadHandle { tx: Some(tx) },
    })
}

async fn reload_events(
    State(state): State<ServeState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.tx.subscribe())
        .filter_map(|msg| msg.ok().map(|_| Ok::<_, Infallible>(Event::default().data("reload"))));

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn serve_file(State(state): State<ServeState>, uri: Uri) -> Response {
    let rel = uri.path().trim_start_matches('/');

    let Some(mut path) = resolve_request_path(&state.root, rel) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if tokio::fs::metadata(&path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        path.push("index.html");
    }

    let body = match tokio::fs::read(&path).await {
        Ok(body) => body,
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    if mime.essence_str() == "text/html" {
        let html = inject_reload_script(body);
        return (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8".to_string())],
            html,
        )
            .into_response();
    }

    ([(header::CONTENT_TYPE, mime.to_string())], body).into_response()
}

/// Map a request path onto the dist tree, rejecting traversal outside it.
fn resolve_request_path(root: &Path, rel: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for comp in rel.split('/') {
        match comp {
            "" | "." => {}
            ".." => return None,
            comp => path.push(comp),
        }
    }
    Some(path)
}

/// Insert the live-reload snippet before `</body>`, or append it when the
/// page has no closing body tag (or is not valid UTF-8, in which case the
/// body is passed through untouched).
fn inject_reload_script(body: Vec<u8>) -> Vec<u8> {
    match String::from_utf8(body) {
        Ok(mut text) => {
            match text.rfind("</body>") {
                Some(idx) => text.insert_str(idx, RELOAD_SNIPPET),
                None => text.push_str(RELOAD_SNIPPET),
            }
            text.into_bytes()
        }
        Err(err) => err.into_bytes(),
    }
}
