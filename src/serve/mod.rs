// src/serve/mod.rs

//! Static dev server with live reload.
//!
//! [`server`] owns the axum app: it serves the dist tree, injects a small
//! event-listener script into HTML responses, and exposes `/__reload` as an
//! SSE stream that connected pages subscribe to. The rest of the pipeline
//! only ever sees a [`ReloadHandle`]; `reload()` on a disabled handle is a
//! no-op so `--once` runs and tests need no server.

pub mod server;

pub use server::{start, ReloadHandle, ServerHandle};
