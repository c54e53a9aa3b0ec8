//! # CLI Layer
//!
//! This module is **one possible UI client** for vbasync, not the application
//! itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, prompts)
//! - Installs a logger
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! Containers are driven through [`SnapshotHost`](vbasync::host::snapshot::SnapshotHost).
//! Write operations (export, import, remove) run on the worker thread from
//! [`vbasync::runner`] and their events are printed as they arrive.
//!
//! ## Structure
//!
//! - `setup`: clap definitions and version string
//! - `commands`: `run()` plus one `handle_*()` per subcommand
//! - `render`: output formatting

mod commands;
mod render;
mod setup;

pub use commands::run;
