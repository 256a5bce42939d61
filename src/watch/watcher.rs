// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::assets::resolve::relative_str;
use crate::pipeline::PipelineEvent;
use crate::watch::profiles::{WatchProfile, WatchRoot};

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher observing both the source and dist trees and
/// sending `PipelineEvent::BindingTriggered` for bindings whose patterns
/// match a changed path.
///
/// Source-rooted profiles are matched against source-relative paths, the
/// HTML profile against dist-relative paths; pipeline outputs landing in the
/// dist tree therefore never re-trigger a transform binding.
pub fn spawn_watcher(
    source_root: impl Into<PathBuf>,
    dist_root: impl Into<PathBuf>,
    profiles: Vec<WatchProfile>,
    events_tx: mpsc::Sender<PipelineEvent>,
) -> Result<WatcherHandle> {
    let source_root = canonical_or_self(source_root.into());
    let dist_root = canonical_or_self(dist_root.into());

    let profiles = Arc::new(profiles);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        {
            let event_tx = event_tx.clone();
            move |res: notify::Result<Event>| {
                match res {
                    Ok(event) => {
                        if let Err(err) = event_tx.send(event) {
                            // We can't log via tracing here easily, so fall back to stderr.
                            eprintln!("assetpipe: failed to forward notify event: {err}");
                        }
                    }
                    Err(err) => {
                        eprintln!("assetpipe: file watch error: {err}");
                    }
                }
            }
        },
        Config::default(),
    )?;

    watcher.watch(&source_root, RecursiveMode::Recursive)?;
    if dist_root != source_root {
        watcher.watch(&dist_root, RecursiveMode::Recursive)?;
    }

    info!(source = ?source_root, dist = ?dist_root, "file watcher started");

    // Async task that consumes notify events and forwards binding triggers.
    let async_profiles = Arc::clone(&profiles);
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!("received notify event: {:?}", event);

            for path in &event.paths {
                for profile in async_profiles.iter() {
                    let root = match profile.root {
                        WatchRoot::Source => &source_root,
                        WatchRoot::Dist => &dist_root,
                    };

                    let Some(rel_str) = relative_str(root, path) else {
                        continue;
                    };

                    if profile.matches(&rel_str) {
                        debug!(
                            binding = %profile.class,
                            path = %rel_str,
                            "watch match -> triggering binding"
                        );
                        if let Err(err) = events_tx
                            .send(PipelineEvent::BindingTriggered {
                                class: profile.class,
                            })
                            .await
                        {
                            warn!("failed to send BindingTriggered: {err}");
                            // If the runtime channel is closed, there's no
                            // point keeping the watcher loop alive.
                            return;
                        }
                    }
                }
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}

fn canonical_or_self(path: PathBuf) -> PathBuf {
    Path::canonicalize(&path).unwrap_or(path) // best-effort
}
