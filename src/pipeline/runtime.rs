// src/pipeline/runtime.rs

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::assets::AssetClass;

/// Result of one binding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    /// The run completed but some files failed to transform.
    Degraded { failures: usize },
    /// Content hash unchanged; the transform (and reload) were skipped.
    Skipped,
}

/// Events sent into the runtime from the watcher, executor, debounce timers
/// or external signals.
///
/// - the watcher sends `BindingTriggered`
/// - the runtime's own timers send `DebounceElapsed`
/// - the executor sends `BindingFinished`
/// - Ctrl-C handling sends `ShutdownRequested`
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    BindingTriggered { class: AssetClass },
    DebounceElapsed { class: AssetClass },
    BindingFinished { class: AssetClass, outcome: RunOutcome },
    ShutdownRequested,
}

/// A binding run the runtime wants the executor to start now.
#[derive(Debug, Clone, Copy)]
pub struct BindingRun {
    pub class: AssetClass,
}

/// Options that influence how the runtime behaves.
#[derive(Debug, Clone, Default)]
pub struct RuntimeOptions {
    /// If true, exit as soon as every binding is idle. In watch mode this
    /// should be `false`; it exists for tests driving the loop manually.
    pub exit_when_idle: bool,
}

/// Per-binding lifecycle.
///
/// `Idle -> Debouncing -> Running -> Idle`, with `rerun_pending` coalescing
/// every trigger that arrives mid-run into exactly one follow-up run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Debouncing,
    Running { rerun_pending: bool },
}

/// The watch coordinator's event loop.
///
/// Responsibilities:
/// - Consume `PipelineEvent`s from the watcher, timers and executor.
/// - Enforce per-binding ordering: one run at a time per binding, transform
///   before reload; different bindings overlap freely.
/// - Debounce rapid repeated triggers for the same binding.
pub struct Runtime {
    states: HashMap<AssetClass, Phase>,
    debounce: Duration,
    options: RuntimeOptions,

    /// Cloned into debounce timer tasks.
    events_tx: mpsc::Sender<PipelineEvent>,
    /// Unified event stream from all producers.
    events_rx: mpsc::Receiver<PipelineEvent>,
    /// Channel to the executor: one message per dispatched binding run.
    exec_tx: mpsc::Sender<BindingRun>,
}

impl Runtime {
    pub fn new(
        classes: impl IntoIterator<Item = AssetClass>,
        debounce: Duration,
        options: RuntimeOptions,
        events_tx: mpsc::Sender<PipelineEvent>,
        events_rx: mpsc::Receiver<PipelineEvent>,
        exec_tx: mpsc::Sender<BindingRun>,
    ) -> Self {
        let states = classes.into_iter().map(|c| (c, Phase::Idle)).collect();
        Self {
            states,
            debounce,
            options,
            events_tx,
            events_rx,
            exec_tx,
        }
    }

    /// Main event loop. Runs until shutdown is requested (or, with
    /// `exit_when_idle`, until every binding settles).
    pub async fn run(mut self) -> Result<()> {
        info!("assetpipe runtime started");

        while let Some(event) = self.events_rx.recv().await {
            debug!(?event, "runtime received event");

            let keep_running = match event {
                PipelineEvent::BindingTriggered { class } => self.handle_trigger(class),
                PipelineEvent::DebounceElapsed { class } => self.handle_debounce(class).await?,
                PipelineEvent::BindingFinished { class, outcome } => {
                    self.handle_finished(class, outcome)
                }
                PipelineEvent::ShutdownRequested => {
                    info!("shutdown requested, stopping runtime");
                    false
                }
            };

            if !keep_running {
                break;
            }
        }

        info!("assetpipe runtime exiting");
        Ok(())
    }

    /// Handle a trigger from the watcher.
    fn handle_trigger(&mut self, class: AssetClass) -> bool {
        let Some(phase) = self.states.get_mut(&class) else {
            warn!(binding = %class, "trigger for unbound asset class; ignoring");
            return true;
        };

        match *phase {
            Phase::Idle => {
                debug!(binding = %class, "binding triggered; debouncing");
                *phase = Phase::Debouncing;
                self.start_debounce_timer(class);
            }
            Phase::Debouncing => {
                // Rapid repeated changes; the pending timer covers this one.
                debug!(binding = %class, "trigger absorbed by debounce window");
            }
            Phase::Running { ref mut rerun_pending } => {
                debug!(binding = %class, "trigger during run; queued for rerun");
                *rerun_pending = true;
            }
        }

        true
    }

    /// A debounce window closed; dispatch the binding to the executor.
    async fn handle_debounce(&mut self, class: AssetClass) -> Result<bool> {
        let Some(phase) = self.states.get_mut(&class) else {
            return Ok(true);
        };

        if *phase != Phase::Debouncing {
            // Stale timer from a previous cycle.
            debug!(binding = %class, ?phase, "ignoring stale debounce event");
            return Ok(true);
        }

        *phase = Phase::Running {
            rerun_pending: false,
        };

        info!(binding = %class, "dispatching binding run");
        if let Err(err) = self.exec_tx.send(BindingRun { class }).await {
            error!(error = %err, "failed to send run to executor");
            // If the executor channel is closed, there's not much we can do.
            return Err(err.into());
        }

        Ok(true)
    }

    /// A binding run completed; settle it or start the coalesced rerun.
    fn handle_finished(&mut self, class: AssetClass, outcome: RunOutcome) -> bool {
        match outcome {
            RunOutcome::Success => info!(binding = %class, "binding run completed"),
            RunOutcome::Degraded { failures } => {
                warn!(binding = %class, failures, "binding run completed with failures");
            }
            RunOutcome::Skipped => debug!(binding = %class, "binding run skipped (unchanged)"),
        }

        match self.states.get_mut(&class) {
            Some(phase) if *phase == (Phase::Running { rerun_pending: true }) => {
                debug!(binding = %class, "starting coalesced rerun");
                *phase = Phase::Debouncing;
                self.start_debounce_timer(class);
            }
            Some(phase) => {
                *phase = Phase::Idle;
            }
            None => {
                warn!(binding = %class, "completion for unbound asset class; ignoring");
            }
        }

        if self.options.exit_when_idle && self.all_idle() {
            info!("all bindings idle and exit_when_idle=true, stopping");
            return false;
        }

        true
    }

    fn all_idle(&self) -> bool {
        self.states.values().all(|phase| *phase == Phase::Idle)
    }

    fn start_debounce_timer(&self, class: AssetClass) {
        let tx = self.events_tx.clone();
        let delay = self.debounce;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(PipelineEvent::DebounceElapsed { class }).await;
        });
    }
}
