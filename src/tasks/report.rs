// src/tasks/report.rs

use std::fmt::Display;
use std::path::PathBuf;

use tracing::{error, info};

use crate::assets::AssetClass;
use crate::pipeline::RunOutcome;

/// One source file that could not be transformed in this run.
#[derive(Debug, Clone)]
pub struct TaskFailure {
    pub source: PathBuf,
    pub message: String,
}

/// Outcome of one transform task run.
///
/// Failures are isolated per file: a broken input leaves the rest of the
/// run's artifacts intact and never stops the watch loop.
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub class: AssetClass,
    /// Number of artifacts written.
    pub written: usize,
    pub failures: Vec<TaskFailure>,
}

impl TaskReport {
    pub fn new(class: AssetClass) -> Self {
        Self {
            class,
            written: 0,
            failures: Vec::new(),
        }
    }

    pub fn record_failure(&mut self, source: impl Into<PathBuf>, err: impl Display) {
        self.failures.push(TaskFailure {
            source: source.into(),
            message: err.to_string(),
        });
    }

    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn outcome(&self) -> RunOutcome {
        if self.failures.is_empty() {
            RunOutcome::Success
        } else {
            RunOutcome::Degraded {
                failures: self.failures.len(),
            }
        }
    }

    /// Emit the operator-facing notification lines for this run.
    pub fn notify(&self) {
        for failure in &self.failures {
            error!(
                task = %self.class,
                source = %failure.source.display(),
                "transform failed: {}",
                failure.message
            );
        }

        info!(
            task = %self.class,
            artifacts = self.written,
            failed = self.failures.len(),
            "task finished"
        );
    }
}
