// src/lib.rs

pub mod assets;
pub mod cli;
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod serve;
pub mod tasks;
pub mod watch;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::info;

use crate::assets::{AssetClass, PathResolver};
use crate::cli::CliArgs;
use crate::config::loader::{config_root_dir, load_and_validate};
use crate::config::model::PipelineConfig;
use crate::pipeline::{
    spawn_executor, ExecutorContext, PipelineEvent, Runtime, RuntimeOptions,
};
use crate::watch::build_watch_profiles;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the initial build (clean, then every transform in order)
/// - dev server + reload notifier
/// - runtime / executor / file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let resolver = PathResolver::from_config(&cfg)?;

    // Initial build: clean strictly first, then each transform to completion
    // before the next starts. The fixed order keeps writers out of each
    // other's destinations and makes notifications reproducible.
    let cleaned = tasks::clean_dist(&cfg)?;
    info!(removed = cleaned.removed, "cleaned dist tree");

    for class in AssetClass::TRANSFORMS {
        let report = tasks::run_class(&cfg, &resolver, class)?;
        report.notify();
    }

    if args.once {
        info!("initial build complete (--once), exiting");
        return Ok(());
    }

    // Dist root must exist before serving and watching it.
    std::fs::create_dir_all(&cfg.paths.dist_root)
        .with_context(|| format!("creating dist root {:?}", cfg.paths.dist_root))?;

    // Validated at startup, so this parse cannot fail here.
    let addr: SocketAddr = cfg
        .server
        .addr
        .parse()
        .with_context(|| format!("invalid server address {}", cfg.server.addr))?;
    let server = serve::start(cfg.paths.dist_root.clone(), addr).await?;

    // Runtime event channel.
    let (events_tx, events_rx) = mpsc::channel::<PipelineEvent>(64);

    // Binding executor.
    let ctx = ExecutorContext {
        config: Arc::new(cfg.clone()),
        resolver: Arc::new(resolver),
        reload: server.reload_handle(),
        project_root: config_root_dir(&config_path),
        use_hash: cfg.watch.use_hash,
    };
    let exec_tx = spawn_executor(ctx, events_tx.clone());

    // File watcher over the source and dist trees.
    let profiles = build_watch_profiles(&cfg)?;
    let _watcher_handle = watch::spawn_watcher(
        cfg.paths.source_root.clone(),
        cfg.paths.dist_root.clone(),
        profiles,
        events_tx.clone(),
    )?;

    // Ctrl-C -> graceful shutdown.
    {
        let tx = events_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(PipelineEvent::ShutdownRequested).await;
        });
    }

    let runtime = Runtime::new(
        AssetClass::BINDINGS,
        Duration::from_millis(cfg.watch.debounce_ms),
        RuntimeOptions::default(),
        events_tx,
        events_rx,
        exec_tx,
    );
    runtime.run().await
}

/// Simple dry-run output: print the resolved plan without touching anything.
fn print_dry_run(cfg: &PipelineConfig) {
    println!("assetpipe dry-run");
    println!("  source_root = {:?}", cfg.paths.source_root);
    println!("  dist_root   = {:?}", cfg.paths.dist_root);
    println!();

    println!("bindings:");
    println!(
        "  - styles: {:?} -> {}/ (browserslist {:?})",
        cfg.styles.watch, cfg.styles.dest, cfg.styles.browserslist
    );
    println!(
        "  - images: {:?} -> {}/ (jpeg quality {})",
        cfg.images.watch, cfg.images.dest, cfg.images.jpeg_quality
    );
    println!(
        "  - scripts: {:?} (excluding {:?}) -> {}/",
        cfg.scripts.watch, cfg.scripts.exclude, cfg.scripts.dest
    );
    println!("  - vendor: {:?} -> {}/", cfg.vendor.files, cfg.vendor.dest);
    println!("  - html (reload only): {:?}", cfg.server.html);
    println!();

    println!("clean:");
    println!("  delete: {:?}", tasks::clean::delete_patterns(cfg));
    println!("  protect: {:?}", tasks::clean::protected_patterns(cfg));
    println!();

    println!("server: http://{}", cfg.server.addr);
    println!(
        "watch: debounce {}ms, use_hash = {}",
        cfg.watch.debounce_ms, cfg.watch.use_hash
    );
}
