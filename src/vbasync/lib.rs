//! # vbasync Architecture
//!
//! vbasync keeps the macro code of office documents in a folder of plain text
//! files, so it can live under version control. It is a **library that happens
//! to have a CLI client**: everything the binary does goes through [`api`].
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prompts, renders output                │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, owns host and config          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - list / export / import / remove / init / config          │
//! │  - Returns CmdResult, reports progress to a Listener        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine                                                     │
//! │  - model, resolve, scan, sync, export, upgrade              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host Layer (host/)                                         │
//! │  - HostAdapter trait, Session lifecycle, per-family data    │
//! │  - SnapshotHost (files), MemoryHost (testing)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//!
//! Reading is lenient, writing is not. A folder file that cannot be decoded or
//! a live component of an unknown type is reported and left out. The first
//! failure while writing files or changing a project aborts the rest of the
//! batch, and an import that failed is never saved.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per operation
//! - [`host`]: Host abstraction, sessions and implementations
//! - [`model`]: `Component` and `ComponentKind`
//! - [`resolve`]: Type codes and file-name keyword rules
//! - [`scan`]: Folder → components
//! - [`sync`]: Components → live project
//! - [`export`]: Components → folder or archive
//! - [`upgrade`]: Macro-enabled save target
//! - [`listener`]: Progress events
//! - [`runner`]: Worker-thread execution
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and terminal output for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod host;
pub mod listener;
pub mod model;
pub mod resolve;
pub mod runner;
pub mod scan;
pub mod sync;
pub mod upgrade;
