// src/pipeline/mod.rs

//! Orchestration engine for the watch phase.
//!
//! This module ties together:
//! - the per-binding state machine that serialises runs of one binding while
//!   letting different bindings overlap
//! - debounce/coalescing of rapid repeated triggers
//! - the executor that runs transforms on blocking threads and fires the
//!   reload notifier afterwards
//! - the main runtime event loop that reacts to:
//!   - file-watch triggers
//!   - debounce expirations
//!   - binding completion events
//!   - shutdown signals

pub mod exec;
pub mod runtime;

pub use exec::{spawn_executor, ExecutorContext};
pub use runtime::{BindingRun, PipelineEvent, RunOutcome, Runtime, RuntimeOptions};
