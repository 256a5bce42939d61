// src/pipeline/exec.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::assets::{AssetClass, PathResolver};
use crate::config::model::PipelineConfig;
use crate::pipeline::runtime::{BindingRun, PipelineEvent, RunOutcome};
use crate::serve::ReloadHandle;
use crate::tasks;
use crate::watch::hash;

/// Everything a binding run needs, cheap to clone into spawned tasks.
#[derive(Debug, Clone)]
pub struct ExecutorContext {
    pub config: Arc<PipelineConfig>,
    pub resolver: Arc<PathResolver>,
    pub reload: ReloadHandle,
    /// Directory holding the `.assetpipe/hashes` store.
    pub project_root: PathBuf,
    pub use_hash: bool,
}

/// Spawn the background executor loop.
///
/// The returned `mpsc::Sender<BindingRun>` is what the runtime uses as
/// `exec_tx`. Each run executes in its own Tokio task, so different bindings
/// can run in parallel; the runtime never dispatches the same binding twice
/// concurrently.
pub fn spawn_executor(
    ctx: ExecutorContext,
    runtime_tx: mpsc::Sender<PipelineEvent>,
) -> mpsc::Sender<BindingRun> {
    let (tx, mut rx) = mpsc::channel::<BindingRun>(32);

    tokio::spawn(async move {
        info!("executor loop started");
        while let Some(run) = rx.recv().await {
            let ctx = ctx.clone();
            let runtime_tx = runtime_tx.clone();
            tokio::spawn(async move {
                run_binding(ctx, run.class, runtime_tx).await;
            });
        }
        info!("executor loop finished (channel closed)");
    });

    tx
}

/// Run a single binding: transform (if any), then reload notification, then
/// report completion to the runtime.
///
/// Infrastructure errors are converted into a degraded completion; they are
/// also logged. Nothing here can stop the watch loop.
async fn run_binding(
    ctx: ExecutorContext,
    class: AssetClass,
    runtime_tx: mpsc::Sender<PipelineEvent>,
) {
    let outcome = match execute(&ctx, class).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(binding = %class, error = %err, "binding run error");
            RunOutcome::Degraded { failures: 1 }
        }
    };

    // Transform strictly before reload, within one binding. A skipped run
    // changed nothing, so connected clients have nothing to refresh.
    if outcome != RunOutcome::Skipped {
        ctx.reload.reload();
    }

    let _ = runtime_tx
        .send(PipelineEvent::BindingFinished { class, outcome })
        .await;
}

async fn execute(ctx: &ExecutorContext, class: AssetClass) -> Result<RunOutcome> {
    // The HTML binding is reload-only.
    if class == AssetClass::Html {
        return Ok(RunOutcome::Success);
    }

    let ctx = ctx.clone();
    tokio::task::spawn_blocking(move || run_transform(&ctx, class))
        .await
        .context("joining transform task")?
}

fn run_transform(ctx: &ExecutorContext, class: AssetClass) -> Result<RunOutcome> {
    let current_hash = if ctx.use_hash {
        let paths: Vec<PathBuf> = ctx
            .resolver
            .matched_files(class)?
            .into_iter()
            .map(|m| m.path)
            .collect();
        let hash = hash::compute_hash_for_paths(paths)?;

        if hash::load_class_hash(&ctx.project_root, class.name())?.as_deref() == Some(hash.as_str()) {
            debug!(binding = %class, "content unchanged, skipping run");
            return Ok(RunOutcome::Skipped);
        }
        Some(hash)
    } else {
        None
    };

    let report = tasks::run_class(&ctx.config, &ctx.resolver, class)?;
    report.notify();

    if let Some(hash) = current_hash {
        hash::save_class_hash(&ctx.project_root, class.name(), &hash)?;
    }

    Ok(report.outcome())
}
