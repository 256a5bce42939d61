// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling the per-binding watch profiles (asset class + root + globs).
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - (Optionally) supporting content hashing to avoid re-running a binding
//!   when the watched files haven't actually changed.
//!
//! It does **not** know about transforms or debouncing; it only turns
//! filesystem changes into binding-level triggers.

pub mod hash;
pub mod profiles;
pub mod watcher;

pub use hash::{compute_hash_for_paths, load_class_hash, save_class_hash};
pub use profiles::{build_watch_profiles, WatchProfile, WatchRoot};
pub use watcher::{spawn_watcher, WatcherHandle};
