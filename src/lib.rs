//! tt - Task Tracker Library
//!
//! This library provides the core functionality for the tt CLI tool: an
//! ordered collection of tasks persisted in a local key-value store.
//!
//! # Core Concepts
//!
//! - **Tasks**: title, description, priority, creation time and an order number
//! - **Display order**: higher order first, newer creation time breaks ties
//! - **Reorder**: moving one task renumbers the whole collection densely
//! - **View**: priority filter and case-insensitive search over the collection
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `output`: Human and JSON output for commands
//! - `reorder`: Drag gesture arithmetic and displayed-to-full index mapping
//! - `storage`: Key-value persistence (file-backed and in-memory)
//! - `store`: The task store, sole mutator of the collection
//! - `task`: Task records, priorities and the stored format
//! - `view`: Filtered and sorted view over the collection

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod reorder;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;

pub use error::{Error, Result};
